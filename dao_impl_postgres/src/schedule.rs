use std::sync::Arc;

use crate::{ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    schedule::{ScheduleDao, ScheduleEntity},
    DaoError,
};
use kidbook_utils::DayOfWeek;
use sqlx::{query_as, FromRow};
use tracing::instrument;

#[derive(Debug, FromRow)]
struct ScheduleDb {
    id: i64,
    service_id: i64,
    coach_id: Option<i64>,
    day_of_week: i16,
    start_time: time::Time,
    end_time: time::Time,
    available_slots: i32,
    is_active: bool,
}
impl TryFrom<ScheduleDb> for ScheduleEntity {
    type Error = DaoError;
    fn try_from(schedule: ScheduleDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: schedule.id,
            service_id: schedule.service_id,
            coach_id: schedule.coach_id,
            day_of_week: DayOfWeek::try_from(i64::from(schedule.day_of_week))?,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            available_slots: schedule.available_slots,
            is_active: schedule.is_active,
        })
    }
}

pub struct ScheduleDaoImpl {
    pub _pool: Arc<sqlx::PgPool>,
}
impl ScheduleDaoImpl {
    pub fn new(pool: Arc<sqlx::PgPool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl ScheduleDao for ScheduleDaoImpl {
    type Transaction = TransactionImpl;

    #[instrument(skip(self, tx))]
    async fn lock_active(
        &self,
        id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<ScheduleEntity>, DaoError> {
        let schedule = query_as::<_, ScheduleDb>(
            "SELECT id, service_id, coach_id, day_of_week, start_time, end_time, available_slots, is_active FROM schedules WHERE id = $1 AND is_active = TRUE FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        schedule.map(ScheduleEntity::try_from).transpose()
    }

    async fn find_by_id(
        &self,
        id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<ScheduleEntity>, DaoError> {
        let schedule = query_as::<_, ScheduleDb>(
            "SELECT id, service_id, coach_id, day_of_week, start_time, end_time, available_slots, is_active FROM schedules WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        schedule.map(ScheduleEntity::try_from).transpose()
    }
}
