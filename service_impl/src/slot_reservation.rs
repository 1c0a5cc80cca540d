use std::sync::Arc;

use async_trait::async_trait;
use dao::{booking_session::BookingSessionDao, schedule::ScheduleDao};
use service::{
    slot_reservation::{ReservedSlot, SlotRequest, SlotReservationService},
    ServiceError,
};
use tracing::{instrument, warn};

use crate::gen_service_impl;

gen_service_impl! {
    struct SlotReservationServiceImpl: SlotReservationService = SlotReservationServiceDeps {
        ScheduleDao: ScheduleDao<Transaction = Self::Transaction> = schedule_dao,
        BookingSessionDao: BookingSessionDao<Transaction = Self::Transaction> = booking_session_dao,
    }
}

#[async_trait]
impl<Deps: SlotReservationServiceDeps> SlotReservationService for SlotReservationServiceImpl<Deps> {
    type Transaction = Deps::Transaction;

    #[instrument(skip(self, tx))]
    async fn reserve(
        &self,
        requests: &[SlotRequest],
        tx: Self::Transaction,
    ) -> Result<Arc<[ReservedSlot]>, ServiceError> {
        let mut reserved: Vec<ReservedSlot> = Vec::with_capacity(requests.len());
        for (position, request) in requests.iter().enumerate() {
            let index = position + 1;
            let schedule = self
                .schedule_dao
                .lock_active(request.schedule_id, tx.clone())
                .await?
                .ok_or(ServiceError::ScheduleNotFound(request.schedule_id))?;

            let occupied = self
                .booking_session_dao
                .count_occupied(request.schedule_id, request.session_date, tx.clone())
                .await?;
            // Not yet written, but already promised to this request.
            let held_by_request = reserved
                .iter()
                .filter(|slot| {
                    slot.schedule_id == request.schedule_id
                        && slot.session_date == request.session_date
                })
                .count() as i64;
            let available = i64::from(schedule.available_slots) - occupied - held_by_request;
            if available <= 0 {
                warn!(
                    schedule_id = request.schedule_id,
                    session_date = %request.session_date,
                    capacity = schedule.available_slots,
                    occupied,
                    "Slot fully booked"
                );
                return Err(ServiceError::SlotConflict {
                    index,
                    date: request.session_date,
                });
            }

            reserved.push(ReservedSlot {
                schedule_id: schedule.id,
                service_id: schedule.service_id,
                session_date: request.session_date,
                start_time: schedule.start_time,
                end_time: schedule.end_time,
                coach_id: schedule.coach_id,
            });
        }
        Ok(reserved.into())
    }
}
