use std::sync::Arc;

use crate::{ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    booking_session::{
        BookingSessionDao, BookingSessionEntity, NewBookingSessionEntity,
        RELEASED_SESSION_STATUSES,
    },
    DaoError,
};
use sqlx::{query_as, FromRow};
use time::PrimitiveDateTime;

#[derive(Debug, FromRow)]
struct BookingSessionDb {
    id: i64,
    booking_id: i64,
    schedule_id: i64,
    session_date: time::Date,
    start_time: time::Time,
    end_time: time::Time,
    status: String,
    coach_id: Option<i64>,
    created_at: PrimitiveDateTime,
    updated_at: PrimitiveDateTime,
}
impl From<BookingSessionDb> for BookingSessionEntity {
    fn from(session: BookingSessionDb) -> Self {
        Self {
            id: session.id,
            booking_id: session.booking_id,
            schedule_id: session.schedule_id,
            session_date: session.session_date,
            start_time: session.start_time,
            end_time: session.end_time,
            status: session.status.into(),
            coach_id: session.coach_id,
            created: session.created_at,
            updated: session.updated_at,
        }
    }
}

pub struct BookingSessionDaoImpl {
    pub _pool: Arc<sqlx::PgPool>,
}
impl BookingSessionDaoImpl {
    pub fn new(pool: Arc<sqlx::PgPool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl BookingSessionDao for BookingSessionDaoImpl {
    type Transaction = TransactionImpl;

    async fn create(
        &self,
        entity: &NewBookingSessionEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<BookingSessionEntity, DaoError> {
        let (id,): (i64,) = query_as(
            "INSERT INTO booking_sessions (booking_id, schedule_id, session_date, start_time, end_time, status, coach_id, created_at, updated_at, update_process) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8, $9) RETURNING id",
        )
        .bind(entity.booking_id)
        .bind(entity.schedule_id)
        .bind(entity.session_date)
        .bind(entity.start_time)
        .bind(entity.end_time)
        .bind(entity.status.as_ref())
        .bind(entity.coach_id)
        .bind(entity.created)
        .bind(process)
        .fetch_one(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(BookingSessionEntity::from_new(id, entity))
    }

    async fn count_occupied(
        &self,
        schedule_id: i64,
        session_date: time::Date,
        tx: Self::Transaction,
    ) -> Result<i64, DaoError> {
        let (count,): (i64,) = query_as(
            "SELECT count(*) FROM booking_sessions WHERE schedule_id = $1 AND session_date = $2 AND status <> ALL($3)",
        )
        .bind(schedule_id)
        .bind(session_date)
        .bind(&RELEASED_SESSION_STATUSES[..])
        .fetch_one(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(count)
    }

    async fn find_by_booking_id(
        &self,
        booking_id: i64,
        tx: Self::Transaction,
    ) -> Result<Arc<[BookingSessionEntity]>, DaoError> {
        Ok(query_as::<_, BookingSessionDb>(
            "SELECT id, booking_id, schedule_id, session_date, start_time, end_time, status, coach_id, created_at, updated_at FROM booking_sessions WHERE booking_id = $1 ORDER BY session_date, start_time, id",
        )
        .bind(booking_id)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .into_iter()
        .map(BookingSessionEntity::from)
        .collect())
    }
}
