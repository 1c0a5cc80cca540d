use std::{error::Error, fmt::Debug, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub mod booking;
pub mod booking_session;
pub mod child;
pub mod coach;
pub mod offering;
pub mod schedule;
pub mod vendor;

#[derive(Error, Debug)]
pub enum DaoError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] Box<dyn Error + Send + Sync>),

    #[error("Transaction aborted by the database due to concurrent access: {0}")]
    SerializationFailure(Box<dyn Error + Send + Sync>),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(Arc<str>),

    #[error("Enum value not found: {0}")]
    EnumValueNotFound(Arc<str>),

    #[error("Date conversion failed: {0}")]
    DateUtilsError(#[from] kidbook_utils::DateUtilsError),

    #[error("Could not parse timestamp: {0}")]
    TimestampParseError(#[from] time::error::Parse),
}

impl DaoError {
    /// True if the database rejected the operation because of contention
    /// with another transaction. Repeating the transaction may succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            DaoError::SerializationFailure(_) | DaoError::UniqueViolation(_)
        )
    }
}

pub trait Transaction: Clone + Debug + Send + Sync + 'static {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockTransaction;
impl Transaction for MockTransaction {}

#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait TransactionDao {
    type Transaction: Transaction;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError>;
    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError>;

    /// Commits the transaction if `transaction` is the last handle to it.
    async fn commit(&self, transaction: Self::Transaction) -> Result<(), DaoError>;

    /// Rolls the transaction back if `transaction` is the last handle to it.
    /// Dropping every handle has the same effect.
    async fn rollback(&self, transaction: Self::Transaction) -> Result<(), DaoError>;
}
