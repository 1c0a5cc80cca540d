use std::sync::Arc;

use crate::{ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    schedule::{ScheduleDao, ScheduleEntity},
    DaoError,
};
use kidbook_utils::{parse_clock_time, DayOfWeek};
use sqlx::{query_as, FromRow};
use tracing::instrument;

#[derive(Debug, FromRow)]
struct ScheduleDb {
    id: i64,
    service_id: i64,
    coach_id: Option<i64>,
    day_of_week: i64,
    start_time: String,
    end_time: String,
    available_slots: i64,
    is_active: bool,
}
impl TryFrom<&ScheduleDb> for ScheduleEntity {
    type Error = DaoError;
    fn try_from(schedule: &ScheduleDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: schedule.id,
            service_id: schedule.service_id,
            coach_id: schedule.coach_id,
            day_of_week: DayOfWeek::try_from(schedule.day_of_week)?,
            start_time: parse_clock_time(&schedule.start_time)?,
            end_time: parse_clock_time(&schedule.end_time)?,
            available_slots: i32::try_from(schedule.available_slots).map_db_error()?,
            is_active: schedule.is_active,
        })
    }
}

const SELECT_SCHEDULE: &str = "SELECT id, service_id, coach_id, day_of_week, start_time, end_time, available_slots, is_active FROM schedules";

pub struct ScheduleDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl ScheduleDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl ScheduleDao for ScheduleDaoImpl {
    type Transaction = TransactionImpl;

    /// SQLite has no row locks. Transactions begin with `BEGIN IMMEDIATE`,
    /// so the database write lock is already held here and serializes every
    /// concurrent reservation until commit or rollback.
    #[instrument(skip(self, tx))]
    async fn lock_active(
        &self,
        id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<ScheduleEntity>, DaoError> {
        let sql = format!("{SELECT_SCHEDULE} WHERE id = ? AND is_active = 1");
        let schedule = query_as::<_, ScheduleDb>(&sql)
            .bind(id)
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        schedule.as_ref().map(ScheduleEntity::try_from).transpose()
    }

    async fn find_by_id(
        &self,
        id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<ScheduleEntity>, DaoError> {
        let sql = format!("{SELECT_SCHEDULE} WHERE id = ?");
        let schedule = query_as::<_, ScheduleDb>(&sql)
            .bind(id)
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        schedule.as_ref().map(ScheduleEntity::try_from).transpose()
    }
}
