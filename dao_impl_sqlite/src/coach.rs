use std::sync::Arc;

use crate::{ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{coach::CoachDao, DaoError};
use sqlx::query_as;

pub struct CoachDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl CoachDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl CoachDao for CoachDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_name(
        &self,
        id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<Arc<str>>, DaoError> {
        Ok(
            query_as::<_, (String,)>("SELECT full_name FROM coaches WHERE id = ?")
                .bind(id)
                .fetch_optional(tx.tx.lock().await.as_mut())
                .await
                .map_db_error()?
                .map(|(full_name,)| full_name.into()),
        )
    }
}
