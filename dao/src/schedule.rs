use async_trait::async_trait;
use kidbook_utils::DayOfWeek;
use mockall::automock;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleEntity {
    pub id: i64,
    pub service_id: i64,
    pub coach_id: Option<i64>,
    pub day_of_week: DayOfWeek,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub available_slots: i32,
    pub is_active: bool,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait ScheduleDao {
    type Transaction: crate::Transaction;

    /// Reads an active schedule and holds an exclusive lock on its row until
    /// `tx` ends. Concurrent callers for the same row wait for the lock.
    async fn lock_active(
        &self,
        id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<ScheduleEntity>, DaoError>;
    async fn find_by_id(
        &self,
        id: i64,
        tx: Self::Transaction,
    ) -> Result<Option<ScheduleEntity>, DaoError>;
}
