use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::DaoError;

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait VendorDao {
    type Transaction: crate::Transaction;

    async fn find_business_name(
        &self,
        id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<Arc<str>>, DaoError>;
}
