use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use kidbook_utils::Money;
use time::PrimitiveDateTime;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBookingEntity {
    pub booking_number: Arc<str>,
    pub parent_id: i64,
    pub child_id: i64,
    pub service_id: i64,
    pub vendor_id: i64,
    pub booking_type: Arc<str>,
    pub total_sessions: i32,
    pub total_amount: Money,
    pub status: Arc<str>,
    pub preferred_coach: Option<i64>,
    pub parent_notes: Option<Arc<str>>,
    pub version: i32,
    pub created: PrimitiveDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingEntity {
    pub id: i64,
    pub booking_number: Arc<str>,
    pub parent_id: i64,
    pub child_id: i64,
    pub service_id: i64,
    pub vendor_id: i64,
    pub booking_type: Arc<str>,
    pub total_sessions: i32,
    pub total_amount: Money,
    pub status: Arc<str>,
    pub preferred_coach: Option<i64>,
    pub parent_notes: Option<Arc<str>>,
    pub version: i32,
    pub created: PrimitiveDateTime,
    pub updated: PrimitiveDateTime,
}

impl BookingEntity {
    pub fn from_new(id: i64, entity: &NewBookingEntity) -> Self {
        Self {
            id,
            booking_number: entity.booking_number.clone(),
            parent_id: entity.parent_id,
            child_id: entity.child_id,
            service_id: entity.service_id,
            vendor_id: entity.vendor_id,
            booking_type: entity.booking_type.clone(),
            total_sessions: entity.total_sessions,
            total_amount: entity.total_amount,
            status: entity.status.clone(),
            preferred_coach: entity.preferred_coach,
            parent_notes: entity.parent_notes.clone(),
            version: entity.version,
            created: entity.created,
            updated: entity.created,
        }
    }
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait BookingDao {
    type Transaction: crate::Transaction;

    /// Inserts the booking and returns it with its generated id.
    async fn create(
        &self,
        entity: &NewBookingEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<BookingEntity, DaoError>;
    async fn find_by_id(
        &self,
        id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<BookingEntity>, DaoError>;
}
