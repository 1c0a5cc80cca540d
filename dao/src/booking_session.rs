use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBookingSessionEntity {
    pub booking_id: i64,
    pub schedule_id: i64,
    pub session_date: time::Date,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub status: Arc<str>,
    pub coach_id: Option<i64>,
    pub created: PrimitiveDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingSessionEntity {
    pub id: i64,
    pub booking_id: i64,
    pub schedule_id: i64,
    pub session_date: time::Date,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub status: Arc<str>,
    pub coach_id: Option<i64>,
    pub created: PrimitiveDateTime,
    pub updated: PrimitiveDateTime,
}

impl BookingSessionEntity {
    pub fn from_new(id: i64, entity: &NewBookingSessionEntity) -> Self {
        Self {
            id,
            booking_id: entity.booking_id,
            schedule_id: entity.schedule_id,
            session_date: entity.session_date,
            start_time: entity.start_time,
            end_time: entity.end_time,
            status: entity.status.clone(),
            coach_id: entity.coach_id,
            created: entity.created,
            updated: entity.created,
        }
    }
}

/// Session statuses which release the seat they occupied.
pub const RELEASED_SESSION_STATUSES: [&str; 2] = ["cancelled", "no_show"];

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait BookingSessionDao {
    type Transaction: crate::Transaction;

    async fn create(
        &self,
        entity: &NewBookingSessionEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<BookingSessionEntity, DaoError>;

    /// Counts the sessions occupying a seat of the schedule on the given
    /// date, i.e. every session whose status is not released.
    async fn count_occupied(
        &self,
        schedule_id: i64,
        session_date: time::Date,
        tx: Self::Transaction,
    ) -> Result<i64, DaoError>;
    async fn find_by_booking_id(
        &self,
        booking_id: i64,
        tx: Self::Transaction,
    ) -> Result<Arc<[BookingSessionEntity]>, DaoError>;
}
