use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotRequest {
    pub schedule_id: i64,
    pub session_date: time::Date,
}

/// A seat held for one requested session, with the schedule data the
/// session row copies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservedSlot {
    pub schedule_id: i64,
    pub service_id: i64,
    pub session_date: time::Date,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub coach_id: Option<i64>,
}

#[automock(type Transaction = dao::MockTransaction;)]
#[async_trait]
pub trait SlotReservationService {
    type Transaction: dao::Transaction;

    /// Locks each requested schedule in the given order and checks that a
    /// seat is left on the requested date. Must run inside the transaction
    /// which persists the sessions, since the locks end with it.
    ///
    /// Seats taken by earlier entries of the same `requests` slice count as
    /// occupied, so callers that do not deduplicate pairs stay within
    /// capacity too.
    ///
    /// Fails with `ScheduleNotFound` for unknown or inactive schedules and
    /// with `SlotConflict` (1-based request index) for full slots.
    async fn reserve(
        &self,
        requests: &[SlotRequest],
        tx: Self::Transaction,
    ) -> Result<Arc<[ReservedSlot]>, ServiceError>;
}
