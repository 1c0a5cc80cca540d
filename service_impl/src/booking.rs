use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use dao::{
    booking::{BookingDao, NewBookingEntity},
    booking_session::{BookingSessionDao, NewBookingSessionEntity},
    child::ChildDao,
    offering::{OfferingDao, OFFERING_STATUS_ACTIVE},
    vendor::VendorDao,
    TransactionDao,
};
use kidbook_utils::parse_iso_date;
use service::{
    booking::{
        Booking, BookingConfirmation, BookingDetail, BookingService, BookingSession,
        BookingStatus, BookingType, CreateBookingRequest, SessionDetail, SessionStatus,
    },
    booking_number::BookingNumberService,
    clock::ClockService,
    config::{BookingConfig, ConfigService},
    confirmation::BookingConfirmationService,
    offering::Offering,
    principal::ParentPrincipal,
    slot_reservation::{SlotRequest, SlotReservationService},
    ServiceError, ValidationFailureItem,
};
use time::{PrimitiveDateTime, Time};
use tracing::{error, info, instrument, warn};

use crate::{confirmation::logged_name, gen_service_impl, pricing::resolve_amount};

const BOOKING_SERVICE_PROCESS: &str = "booking-service";
pub const MAX_PARENT_NOTES_LENGTH: usize = 500;

gen_service_impl! {
    struct BookingServiceImpl: BookingService = BookingServiceDeps {
        ChildDao: ChildDao<Transaction = Self::Transaction> = child_dao,
        OfferingDao: OfferingDao<Transaction = Self::Transaction> = offering_dao,
        VendorDao: VendorDao<Transaction = Self::Transaction> = vendor_dao,
        BookingDao: BookingDao<Transaction = Self::Transaction> = booking_dao,
        BookingSessionDao: BookingSessionDao<Transaction = Self::Transaction> = booking_session_dao,
        SlotReservationService: SlotReservationService<Transaction = Self::Transaction> = slot_reservation_service,
        BookingConfirmationService: BookingConfirmationService<Transaction = Self::Transaction> = confirmation_service,
        BookingNumberService: BookingNumberService = booking_number_service,
        ConfigService: ConfigService = config_service,
        ClockService: ClockService = clock_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

/// A booking request which passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub booking_type: BookingType,
    pub slots: Vec<SlotRequest>,
}

/// Checks everything about a booking request that does not need the
/// database. A session counts from the midnight starting its date, so once
/// `now` is past that midnight the date is rejected, today included.
pub fn validate_request(
    request: &CreateBookingRequest,
    now: PrimitiveDateTime,
) -> Result<ValidatedRequest, ServiceError> {
    let booking_type: BookingType = request.booking_type.parse()?;
    if request.session_dates.len() != booking_type.session_count() {
        return Err(ServiceError::SessionCountMismatch {
            booking_type: booking_type.as_str().into(),
            expected: booking_type.session_count(),
            actual: request.session_dates.len(),
        });
    }

    let mut validation = Vec::new();
    if request.child_id <= 0 {
        validation.push(ValidationFailureItem::InvalidValue("child_id".into()));
    }
    if request.service_id <= 0 {
        validation.push(ValidationFailureItem::InvalidValue("service_id".into()));
    }
    for (position, session) in request.session_dates.iter().enumerate() {
        if session.schedule_id <= 0 {
            validation.push(ValidationFailureItem::InvalidValue(
                format!("session_dates[{position}].schedule_id").into(),
            ));
        }
    }
    if let Some(notes) = &request.parent_notes {
        if notes.chars().count() > MAX_PARENT_NOTES_LENGTH {
            validation.push(ValidationFailureItem::TooLong(
                "parent_notes".into(),
                MAX_PARENT_NOTES_LENGTH,
            ));
        }
    }
    if !validation.is_empty() {
        return Err(ServiceError::ValidationError(validation.into()));
    }

    let mut slots = Vec::with_capacity(request.session_dates.len());
    for (position, session) in request.session_dates.iter().enumerate() {
        let index = position + 1;
        let session_date =
            parse_iso_date(&session.session_date).map_err(|_| ServiceError::InvalidSessionDate {
                index,
                value: session.session_date.clone(),
            })?;
        if PrimitiveDateTime::new(session_date, Time::MIDNIGHT) < now {
            return Err(ServiceError::PastDateBooking {
                index,
                date: session_date,
            });
        }
        slots.push(SlotRequest {
            schedule_id: session.schedule_id,
            session_date,
        });
    }

    let mut seen = HashSet::new();
    let duplicates: Vec<ValidationFailureItem> = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| !seen.insert(**slot))
        .map(|(position, _)| {
            ValidationFailureItem::Duplicate(format!("session_dates[{position}]").into())
        })
        .collect();
    if !duplicates.is_empty() {
        return Err(ServiceError::ValidationError(duplicates.into()));
    }

    Ok(ValidatedRequest {
        booking_type,
        slots,
    })
}

impl<Deps: BookingServiceDeps> BookingServiceImpl<Deps> {
    /// Runs the transactional part of a booking: ownership, availability,
    /// pricing and persistence. Nothing is written if any step fails.
    async fn create_in_transaction(
        &self,
        principal: ParentPrincipal,
        request: &CreateBookingRequest,
        validated: &ValidatedRequest,
    ) -> Result<(Booking, Arc<[BookingSession]>), ServiceError> {
        let tx = self.transaction_dao.new_transaction().await?;
        match self
            .persist_booking(principal, request, validated, tx.clone())
            .await
        {
            Ok(created) => {
                self.transaction_dao.commit(tx).await?;
                Ok(created)
            }
            Err(err) => {
                if let Err(rollback_err) = self.transaction_dao.rollback(tx).await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn persist_booking(
        &self,
        principal: ParentPrincipal,
        request: &CreateBookingRequest,
        validated: &ValidatedRequest,
        tx: Deps::Transaction,
    ) -> Result<(Booking, Arc<[BookingSession]>), ServiceError> {
        if self
            .child_dao
            .find_by_id_and_parent(request.child_id, principal.parent_id, tx.clone())
            .await?
            .is_none()
        {
            return Err(ServiceError::ChildNotOwned(request.child_id));
        }

        let offering = self
            .offering_dao
            .find_by_id_and_status(request.service_id, OFFERING_STATUS_ACTIVE, tx.clone())
            .await?
            .map(|offering| Offering::from(&offering))
            .ok_or(ServiceError::ServiceUnavailable(request.service_id))?;

        let reserved = self
            .slot_reservation_service
            .reserve(&validated.slots, tx.clone())
            .await?;
        if let Some(foreign) = reserved.iter().find(|slot| slot.service_id != offering.id) {
            return Err(ServiceError::ScheduleNotFound(foreign.schedule_id));
        }

        let total_amount = resolve_amount(&offering, validated.booking_type)?;
        let now = self.clock_service.date_time_now();
        let booking = self
            .booking_dao
            .create(
                &NewBookingEntity {
                    booking_number: self.booking_number_service.generate(),
                    parent_id: principal.parent_id,
                    child_id: request.child_id,
                    service_id: offering.id,
                    vendor_id: offering.vendor_id,
                    booking_type: validated.booking_type.as_str().into(),
                    total_sessions: validated.booking_type.session_count() as i32,
                    total_amount,
                    status: BookingStatus::Pending.as_str().into(),
                    preferred_coach: request.preferred_coach,
                    parent_notes: request.parent_notes.clone(),
                    version: 1,
                    created: now,
                },
                BOOKING_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;

        let mut sessions = Vec::with_capacity(reserved.len());
        for slot in reserved.iter() {
            let session = self
                .booking_session_dao
                .create(
                    &NewBookingSessionEntity {
                        booking_id: booking.id,
                        schedule_id: slot.schedule_id,
                        session_date: slot.session_date,
                        start_time: slot.start_time,
                        end_time: slot.end_time,
                        status: SessionStatus::Scheduled.as_str().into(),
                        coach_id: slot.coach_id,
                        created: now,
                    },
                    BOOKING_SERVICE_PROCESS,
                    tx.clone(),
                )
                .await?;
            sessions.push(BookingSession::try_from(&session)?);
        }

        Ok((Booking::try_from(&booking)?, sessions.into()))
    }

    /// Repeats the booking transaction while it fails with a conflict, up to
    /// `config.max_attempts` attempts in total.
    async fn create_with_retry(
        &self,
        principal: ParentPrincipal,
        request: &CreateBookingRequest,
        validated: &ValidatedRequest,
        config: &BookingConfig,
    ) -> Result<(Booking, Arc<[BookingSession]>), ServiceError> {
        let max_attempts = config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self
                .create_in_transaction(principal, request, validated)
                .await
            {
                Ok(created) => return Ok(created),
                Err(err) if err.is_conflict() => {
                    if attempt >= max_attempts {
                        warn!(attempt, error = %err, "Booking conflicted, giving up");
                        return Err(ServiceError::BookingConflict);
                    }
                    warn!(attempt, error = %err, "Booking conflicted, retrying");
                    tokio::time::sleep(config.retry_base_delay * attempt).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[async_trait]
impl<Deps: BookingServiceDeps> BookingService for BookingServiceImpl<Deps> {
    type Transaction = Deps::Transaction;

    #[instrument(skip(self, request), fields(parent_id = principal.parent_id, service_id = request.service_id))]
    async fn create_booking(
        &self,
        principal: ParentPrincipal,
        request: &CreateBookingRequest,
    ) -> Result<BookingConfirmation, ServiceError> {
        let validated = validate_request(request, self.clock_service.date_time_now())?;
        let config = self.config_service.get_config().await?.booking;

        let deadline = tokio::time::Instant::now() + config.timeout;
        let (booking, sessions) = tokio::time::timeout_at(
            deadline,
            self.create_with_retry(principal, request, &validated, &config),
        )
        .await
        .map_err(|_| {
            warn!(timeout = ?config.timeout, "Booking deadline exceeded");
            ServiceError::DeadlineExceeded
        })?
        .inspect_err(|err| {
            if matches!(err, ServiceError::DatabaseQueryError(_)) {
                error!(error = %err, "Booking failed");
            }
        })?;
        info!(
            booking_id = booking.id,
            booking_number = %booking.booking_number,
            "Booking created"
        );

        Ok(self
            .confirmation_service
            .build(&booking, &sessions, None)
            .await)
    }

    #[instrument(skip(self, tx), fields(parent_id = principal.parent_id))]
    async fn get_booking(
        &self,
        principal: ParentPrincipal,
        booking_id: i64,
        tx: Option<Self::Transaction>,
    ) -> Result<BookingDetail, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let booking = self
            .booking_dao
            .find_by_id(booking_id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(booking_id))?;
        if booking.parent_id != principal.parent_id {
            return Err(ServiceError::Forbidden);
        }
        let booking = Booking::try_from(&booking)?;
        let sessions = self
            .booking_session_dao
            .find_by_booking_id(booking_id, tx.clone())
            .await?
            .iter()
            .map(BookingSession::try_from)
            .collect::<Result<Vec<BookingSession>, ServiceError>>()?;

        let service_name = logged_name(
            self.offering_dao
                .find_name(booking.service_id, tx.clone())
                .await,
            "service",
            booking.service_id,
        );
        let child_name = logged_name(
            self.child_dao.find_name(booking.child_id, tx.clone()).await,
            "child",
            booking.child_id,
        );
        let vendor_name = logged_name(
            self.vendor_dao
                .find_business_name(booking.vendor_id, tx.clone())
                .await,
            "vendor",
            booking.vendor_id,
        );
        self.transaction_dao.commit(tx).await?;

        let sessions: Arc<[SessionDetail]> = sessions
            .iter()
            .enumerate()
            .map(|(position, session)| SessionDetail {
                session_number: position + 1,
                session_id: session.id,
                schedule_id: session.schedule_id,
                session_date: session.session_date,
                start_time: session.start_time,
                end_time: session.end_time,
                status: session.status,
                coach_id: session.coach_id,
            })
            .collect();
        let completed_sessions = sessions
            .iter()
            .filter(|session| session.status == SessionStatus::Completed)
            .count();
        let now = self.clock_service.date_time_now();
        let next_session = sessions
            .iter()
            .filter(|session| {
                session.status == SessionStatus::Scheduled
                    && PrimitiveDateTime::new(session.session_date, session.start_time) > now
            })
            .min_by_key(|session| (session.session_date, session.start_time))
            .cloned();

        Ok(BookingDetail {
            booking,
            service_name: service_name.unwrap_or_else(|| "".into()),
            child_name: child_name.unwrap_or_else(|| "".into()),
            vendor_name: vendor_name.unwrap_or_else(|| "".into()),
            sessions,
            completed_sessions,
            next_session,
        })
    }
}
