use std::sync::Arc;

use crate::{ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    booking::{BookingDao, BookingEntity, NewBookingEntity},
    DaoError,
};
use kidbook_utils::Money;
use sqlx::{query_as, FromRow};
use time::PrimitiveDateTime;
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
    total_sessions: i32,
    total_amount_cents: i64,
    status: String,
    preferred_coach: Option<i64>,
    parent_notes: Option<String>,
    version: i32,
    created_at: PrimitiveDateTime,
    updated_at: PrimitiveDateTime,
}
impl From<BookingDb> for BookingEntity {
    fn from(booking: BookingDb) -> Self {
        Self {
            id: booking.id,
            booking_number: booking.booking_number.into(),
            parent_id: booking.parent_id,
            child_id: booking.child_id,
            service_id: booking.service_id,
            vendor_id: booking.vendor_id,
            booking_type: booking.booking_type.into(),
            total_sessions: booking.total_sessions,
            total_amount: Money::from_cents(booking.total_amount_cents),
            status: booking.status.into(),
            preferred_coach: booking.preferred_coach,
            parent_notes: booking.parent_notes.map(Arc::from),
            version: booking.version,
            created: booking.created_at,
            updated: booking.updated_at,
        }
    }
}

pub struct BookingDaoImpl {
    pub _pool: Arc<sqlx::PgPool>,
}
impl BookingDaoImpl {
    pub fn new(pool: Arc<sqlx::PgPool>) -> Self {
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
        let (id,): (i64,) = query_as(
            "INSERT INTO bookings (booking_number, parent_id, child_id, service_id, vendor_id, booking_type, total_sessions, total_amount_cents, status, preferred_coach, parent_notes, version, created_at, updated_at, update_process) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13, $14) RETURNING id",
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
        .bind(entity.created)
        .bind(process)
        .fetch_one(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(BookingEntity::from_new(id, entity))
    }

    async fn find_by_id(
        &self,
        id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<BookingEntity>, DaoError> {
        Ok(query_as::<_, BookingDb>(
            "SELECT id, booking_number, parent_id, child_id, service_id, vendor_id, booking_type, total_sessions, total_amount_cents, status, preferred_coach, parent_notes, version, created_at, updated_at FROM bookings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .map(BookingEntity::from))
    }
}
