use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use kidbook_utils::Money;

use crate::DaoError;

/// A bookable activity listed by a vendor, stored in the `services` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OfferingEntity {
    pub id: i64,
    pub vendor_id: i64,
    pub name: Arc<str>,
    pub price_per_session: Money,
    pub trial_price: Option<Money>,
    pub package_4_price: Option<Money>,
    pub package_8_price: Option<Money>,
    pub package_12_price: Option<Money>,
    pub status: Arc<str>,
}

pub const OFFERING_STATUS_ACTIVE: &str = "active";

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait OfferingDao {
    type Transaction: crate::Transaction;

    async fn find_by_id_and_status(
        &self,
        id: i64,
        status: &str,
        tx: Self::Transaction,
    ) -> Result<Option<OfferingEntity>, DaoError>;
    async fn find_name(&self, id: i64, tx: Self::Transaction)
        -> Result<Option<Arc<str>>, DaoError>;
}
