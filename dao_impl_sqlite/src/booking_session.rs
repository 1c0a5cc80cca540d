use std::sync::Arc;

use crate::{format_timestamp, parse_timestamp, ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    booking_session::{
        BookingSessionDao, BookingSessionEntity, NewBookingSessionEntity,
        RELEASED_SESSION_STATUSES,
    },
    DaoError,
};
use kidbook_utils::{format_clock_time, format_iso_date, parse_clock_time, parse_iso_date};
use sqlx::{query, query_as, FromRow};

#[derive(Debug, FromRow)]
struct BookingSessionDb {
    id: i64,
    booking_id: i64,
    schedule_id: i64,
    session_date: String,
    start_time: String,
    end_time: String,
    status: String,
    coach_id: Option<i64>,
    created: String,
    updated: String,
}
impl TryFrom<&BookingSessionDb> for BookingSessionEntity {
    type Error = DaoError;
    fn try_from(session: &BookingSessionDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: session.id,
            booking_id: session.booking_id,
            schedule_id: session.schedule_id,
            session_date: parse_iso_date(&session.session_date)?,
            start_time: parse_clock_time(&session.start_time)?,
            end_time: parse_clock_time(&session.end_time)?,
            status: session.status.as_str().into(),
            coach_id: session.coach_id,
            created: parse_timestamp(&session.created)?,
            updated: parse_timestamp(&session.updated)?,
        })
    }
}

pub struct BookingSessionDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl BookingSessionDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
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
        let session_date = format_iso_date(entity.session_date)?;
        let start_time = format_clock_time(entity.start_time)?;
        let end_time = format_clock_time(entity.end_time)?;
        let created = format_timestamp(entity.created)?;
        let id = query(
            "INSERT INTO booking_sessions (booking_id, schedule_id, session_date, start_time, end_time, status, coach_id, created, updated, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.booking_id)
        .bind(entity.schedule_id)
        .bind(&session_date)
        .bind(&start_time)
        .bind(&end_time)
        .bind(entity.status.as_ref())
        .bind(entity.coach_id)
        .bind(&created)
        .bind(&created)
        .bind(process)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .last_insert_rowid();
        Ok(BookingSessionEntity::from_new(id, entity))
    }

    async fn count_occupied(
        &self,
        schedule_id: i64,
        session_date: time::Date,
        tx: Self::Transaction,
    ) -> Result<i64, DaoError> {
        let session_date = format_iso_date(session_date)?;
        let (count,): (i64,) = query_as(
            "SELECT count(*) FROM booking_sessions WHERE schedule_id = ? AND session_date = ? AND status NOT IN (?, ?)",
        )
        .bind(schedule_id)
        .bind(&session_date)
        .bind(RELEASED_SESSION_STATUSES[0])
        .bind(RELEASED_SESSION_STATUSES[1])
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
        query_as::<_, BookingSessionDb>(
            "SELECT id, booking_id, schedule_id, session_date, start_time, end_time, status, coach_id, created, updated FROM booking_sessions WHERE booking_id = ? ORDER BY session_date, start_time, id",
        )
        .bind(booking_id)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(BookingSessionEntity::try_from)
        .collect::<Result<Arc<[BookingSessionEntity]>, DaoError>>()
    }
}
