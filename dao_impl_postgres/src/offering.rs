use std::sync::Arc;

use crate::{ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    offering::{OfferingDao, OfferingEntity},
    DaoError,
};
use kidbook_utils::Money;
use sqlx::{query_as, FromRow};

#[derive(Debug, FromRow)]
struct OfferingDb {
    id: i64,
    vendor_id: i64,
    name: String,
    price_per_session_cents: i64,
    trial_price_cents: Option<i64>,
    package_4_price_cents: Option<i64>,
    package_8_price_cents: Option<i64>,
    package_12_price_cents: Option<i64>,
    status: String,
}
impl From<OfferingDb> for OfferingEntity {
    fn from(offering: OfferingDb) -> Self {
        Self {
            id: offering.id,
            vendor_id: offering.vendor_id,
            name: offering.name.into(),
            price_per_session: Money::from_cents(offering.price_per_session_cents),
            trial_price: offering.trial_price_cents.map(Money::from_cents),
            package_4_price: offering.package_4_price_cents.map(Money::from_cents),
            package_8_price: offering.package_8_price_cents.map(Money::from_cents),
            package_12_price: offering.package_12_price_cents.map(Money::from_cents),
            status: offering.status.into(),
        }
    }
}

pub struct OfferingDaoImpl {
    pub _pool: Arc<sqlx::PgPool>,
}
impl OfferingDaoImpl {
    pub fn new(pool: Arc<sqlx::PgPool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl OfferingDao for OfferingDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id_and_status(
        &self,
        id: i64,
        status: &str,
        tx: Self::Transaction,
    ) -> Result<Option<OfferingEntity>, DaoError> {
        Ok(query_as::<_, OfferingDb>(
            "SELECT id, vendor_id, name, price_per_session_cents, trial_price_cents, package_4_price_cents, package_8_price_cents, package_12_price_cents, status FROM services WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .map(OfferingEntity::from))
    }

    async fn find_name(
        &self,
        id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<Arc<str>>, DaoError> {
        Ok(
            query_as::<_, (String,)>("SELECT name FROM services WHERE id = $1")
                .bind(id)
                .fetch_optional(tx.tx.lock().await.as_mut())
                .await
                .map_db_error()?
                .map(|(name,)| name.into()),
        )
    }
}
