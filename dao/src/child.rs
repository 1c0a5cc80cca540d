use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildEntity {
    pub id: i64,
    pub parent_id: i64,
    pub name: Arc<str>,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait ChildDao {
    type Transaction: crate::Transaction;

    /// Finds the child only if it belongs to `parent_id`.
    async fn find_by_id_and_parent(
        &self,
        id: i64,
        parent_id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<ChildEntity>, DaoError>;
    async fn find_name(&self, id: i64, tx: Self::Transaction)
        -> Result<Option<Arc<str>>, DaoError>;
}
