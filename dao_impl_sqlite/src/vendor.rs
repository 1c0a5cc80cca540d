use std::sync::Arc;

use crate::{ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{vendor::VendorDao, DaoError};
use sqlx::query_as;

pub struct VendorDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl VendorDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl VendorDao for VendorDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_business_name(
        &self,
        id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<Arc<str>>, DaoError> {
        Ok(
            query_as::<_, (String,)>("SELECT business_name FROM vendors WHERE id = ?")
                .bind(id)
                .fetch_optional(tx.tx.lock().await.as_mut())
                .await
                .map_db_error()?
                .map(|(business_name,)| business_name.into()),
        )
    }
}
