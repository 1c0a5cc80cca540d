use std::sync::Arc;

use crate::{format_timestamp, parse_timestamp, ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    booking::{BookingDao, BookingEntity, NewBookingEntity},
    DaoError,
};
use kidbook_utils::Money;
use sqlx::{query, query_as, FromRow};
use tracing::instrument;

#[derive(Debug, FromRow)]
struct BookingDb {
    id: i64,
    booking_number: String,
    parent_id: i64,
    child_id: i64,
    service_id: i64,
    vendor_id: i64,
    booking_type: String,
    total_sessions: i64,
    total_amount_cents: i64,
    status: String,
    preferred_coach: Option<i64>,
    parent_notes: Option<String>,
    version: i64,
    created: String,
    updated: String,
}
impl TryFrom<&BookingDb> for BookingEntity {
    type Error = DaoError;
    fn try_from(booking: &BookingDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: booking.id,
            booking_number: booking.booking_number.as_str().into(),
            parent_id: booking.parent_id,
            child_id: booking.child_id,
            service_id: booking.service_id,
            vendor_id: booking.vendor_id,
            booking_type: booking.booking_type.as_str().into(),
            total_sessions: booking.total_sessions as i32,
            total_amount: Money::from_cents(booking.total_amount_cents),
            status: booking.status.as_str().into(),
            preferred_coach: booking.preferred_coach,
            parent_notes: booking.parent_notes.as_deref().map(Arc::from),
            version: booking.version as i32,
            created: parse_timestamp(&booking.created)?,
            updated: parse_timestamp(&booking.updated)?,
        })
    }
}

pub struct BookingDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl BookingDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl BookingDao for BookingDaoImpl {
    type Transaction = TransactionImpl;

    #[instrument(skip(self, entity, tx), fields(booking_number = %entity.booking_number))]
    async fn create(
        &self,
        entity: &NewBookingEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<BookingEntity, DaoError> {
        let created = format_timestamp(entity.created)?;
        let id = query(
            "INSERT INTO bookings (booking_number, parent_id, child_id, service_id, vendor_id, booking_type, total_sessions, total_amount_cents, status, preferred_coach, parent_notes, version, created, updated, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.booking_number.as_ref())
        .bind(entity.parent_id)
        .bind(entity.child_id)
        .bind(entity.service_id)
        .bind(entity.vendor_id)
        .bind(entity.booking_type.as_ref())
        .bind(entity.total_sessions)
        .bind(entity.total_amount.cents())
        .bind(entity.status.as_ref())
        .bind(entity.preferred_coach)
        .bind(entity.parent_notes.as_deref())
        .bind(entity.version)
        .bind(&created)
        .bind(&created)
        .bind(process)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .last_insert_rowid();
        Ok(BookingEntity::from_new(id, entity))
    }

    async fn find_by_id(
        &self,
        id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<BookingEntity>, DaoError> {
        let booking = query_as::<_, BookingDb>(
            "SELECT id, booking_number, parent_id, child_id, service_id, vendor_id, booking_type, total_sessions, total_amount_cents, status, preferred_coach, parent_notes, version, created, updated FROM bookings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        booking.as_ref().map(BookingEntity::try_from).transpose()
    }
}
