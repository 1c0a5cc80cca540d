use std::{error::Error, sync::Arc};

use async_trait::async_trait;
use dao::{DaoError, Transaction};
use sqlx::SqlitePool;
use time::{format_description::well_known::Iso8601, PrimitiveDateTime};
use tokio::sync::Mutex;

pub mod booking;
pub mod booking_session;
pub mod child;
pub mod coach;
pub mod offering;
pub mod schedule;
pub mod vendor;

#[cfg(test)]
mod test_util;

// Primary and extended result codes reported when another connection holds
// a conflicting lock: SQLITE_BUSY, SQLITE_LOCKED, SQLITE_LOCKED_SHAREDCACHE
// and SQLITE_BUSY_SNAPSHOT.
const SQLITE_BUSY_CODES: [&str; 4] = ["5", "6", "262", "517"];

pub trait ResultDbErrorExt<T, E> {
    fn map_db_error(self) -> Result<T, DaoError>;
}
impl<T, E: Error + Send + Sync + 'static> ResultDbErrorExt<T, E> for Result<T, E> {
    fn map_db_error(self) -> Result<T, DaoError> {
        self.map_err(|err| classify_db_error(Box::new(err)))
    }
}

/// Sorts driver errors into lock contention, unique violations and
/// everything else.
fn classify_db_error(err: Box<dyn Error + Send + Sync>) -> DaoError {
    let (busy, unique_violation) = match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => (
            db_err
                .code()
                .is_some_and(|code| SQLITE_BUSY_CODES.contains(&code.as_ref())),
            db_err
                .is_unique_violation()
                .then(|| Arc::<str>::from(db_err.message())),
        ),
        _ => (false, None),
    };
    if let Some(message) = unique_violation {
        DaoError::UniqueViolation(message)
    } else if busy {
        DaoError::SerializationFailure(err)
    } else {
        DaoError::DatabaseQueryError(err)
    }
}

pub(crate) fn format_timestamp(value: PrimitiveDateTime) -> Result<String, DaoError> {
    value.format(&Iso8601::DATE_TIME).map_db_error()
}

pub(crate) fn parse_timestamp(value: &str) -> Result<PrimitiveDateTime, DaoError> {
    Ok(PrimitiveDateTime::parse(value, &Iso8601::DATE_TIME)?)
}

#[derive(Clone, Debug)]
pub struct TransactionImpl {
    tx: Arc<Mutex<sqlx::Transaction<'static, sqlx::Sqlite>>>,
}

impl Transaction for TransactionImpl {}

pub struct TransactionDaoImpl {
    pool: Arc<SqlitePool>,
}
impl TransactionDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}
#[async_trait]
impl dao::TransactionDao for TransactionDaoImpl {
    type Transaction = TransactionImpl;

    /// Starts with `BEGIN IMMEDIATE`, so the database write lock is taken
    /// before the first read and no later statement has to upgrade a stale
    /// WAL snapshot.
    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError> {
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_db_error()?;
        Ok(TransactionImpl {
            tx: Arc::new(tx.into()),
        })
    }

    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError> {
        match tx {
            Some(tx) => Ok(tx),
            None => self.new_transaction().await,
        }
    }

    async fn commit(&self, transaction: Self::Transaction) -> Result<(), DaoError> {
        if let Some(tx) = Arc::into_inner(transaction.tx) {
            tx.into_inner().commit().await.map_db_error()?;
        }
        Ok(())
    }

    async fn rollback(&self, transaction: Self::Transaction) -> Result<(), DaoError> {
        if let Some(tx) = Arc::into_inner(transaction.tx) {
            tx.into_inner().rollback().await.map_db_error()?;
        }
        Ok(())
    }
}
