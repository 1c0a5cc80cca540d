use std::sync::Arc;

use crate::{ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    child::{ChildDao, ChildEntity},
    DaoError,
};
use sqlx::{query_as, FromRow};

#[derive(Debug, FromRow)]
struct ChildDb {
    id: i64,
    parent_id: i64,
    name: String,
}
impl From<ChildDb> for ChildEntity {
    fn from(child: ChildDb) -> Self {
        Self {
            id: child.id,
            parent_id: child.parent_id,
            name: child.name.into(),
        }
    }
}

pub struct ChildDaoImpl {
    pub _pool: Arc<sqlx::PgPool>,
}
impl ChildDaoImpl {
    pub fn new(pool: Arc<sqlx::PgPool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl ChildDao for ChildDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id_and_parent(
        &self,
        id: i64,
        parent_id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<ChildEntity>, DaoError> {
        Ok(query_as::<_, ChildDb>(
            "SELECT id, parent_id, name FROM children WHERE id = $1 AND parent_id = $2",
        )
        .bind(id)
        .bind(parent_id)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .map(ChildEntity::from))
    }

    async fn find_name(
        &self,
        id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<Arc<str>>, DaoError> {
        Ok(
            query_as::<_, (String,)>("SELECT name FROM children WHERE id = $1")
                .bind(id)
                .fetch_optional(tx.tx.lock().await.as_mut())
                .await
                .map_db_error()?
                .map(|(name,)| name.into()),
        )
    }
}
