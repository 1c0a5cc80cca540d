//! PostgreSQL implementation of the DAO traits.
//!
//! Schedules are locked with `SELECT ... FOR UPDATE`, so concurrent
//! reservations for the same schedule queue up on the row lock instead of
//! failing.

use std::{error::Error, sync::Arc};

use async_trait::async_trait;
use dao::{DaoError, Transaction};
use sqlx::PgPool;
use tokio::sync::Mutex;

pub mod booking;
pub mod booking_session;
pub mod child;
pub mod coach;
pub mod offering;
pub mod schedule;
pub mod vendor;

// serialization_failure, deadlock_detected, lock_not_available
const RETRYABLE_SQLSTATES: [&str; 3] = ["40001", "40P01", "55P03"];

pub trait ResultDbErrorExt<T, E> {
    fn map_db_error(self) -> Result<T, DaoError>;
}
impl<T, E: Error + Send + Sync + 'static> ResultDbErrorExt<T, E> for Result<T, E> {
    fn map_db_error(self) -> Result<T, DaoError> {
        self.map_err(|err| classify_db_error(Box::new(err)))
    }
}

fn classify_db_error(err: Box<dyn Error + Send + Sync>) -> DaoError {
    let (retryable, unique_violation) = match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => (
            db_err
                .code()
                .is_some_and(|code| RETRYABLE_SQLSTATES.contains(&code.as_ref())),
            db_err.is_unique_violation().then(|| {
                Arc::<str>::from(db_err.constraint().unwrap_or_else(|| db_err.message()))
            }),
        ),
        _ => (false, None),
    };
    if let Some(constraint) = unique_violation {
        DaoError::UniqueViolation(constraint)
    } else if retryable {
        DaoError::SerializationFailure(err)
    } else {
        DaoError::DatabaseQueryError(err)
    }
}

#[derive(Clone, Debug)]
pub struct TransactionImpl {
    tx: Arc<Mutex<sqlx::Transaction<'static, sqlx::Postgres>>>,
}

impl Transaction for TransactionImpl {}

pub struct TransactionDaoImpl {
    pool: Arc<PgPool>,
}
impl TransactionDaoImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}
#[async_trait]
impl dao::TransactionDao for TransactionDaoImpl {
    type Transaction = TransactionImpl;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError> {
        let tx = self.pool.begin().await.map_db_error()?;
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
