use std::sync::Arc;

use thiserror::Error;

pub mod booking;
pub mod booking_number;
pub mod clock;
pub mod config;
pub mod confirmation;
pub mod offering;
pub mod principal;
pub mod slot_reservation;
pub mod uuid_service;

#[derive(Debug, PartialEq, Eq)]
pub enum ValidationFailureItem {
    InvalidValue(Arc<str>),
    TooLong(Arc<str>, usize),
    Duplicate(Arc<str>),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] dao::DaoError),

    #[error("Invalid booking type: {0}")]
    InvalidBookingType(Arc<str>),

    #[error("Booking type {booking_type} requires {expected} sessions, got {actual}")]
    SessionCountMismatch {
        booking_type: Arc<str>,
        expected: usize,
        actual: usize,
    },

    #[error("Session {index}: invalid session date {value}")]
    InvalidSessionDate { index: usize, value: Arc<str> },

    #[error("Session {index}: cannot book sessions in the past ({date})")]
    PastDateBooking { index: usize, date: time::Date },

    #[error("Validation error: {0:?}")]
    ValidationError(Arc<[ValidationFailureItem]>),

    #[error("No price configured for booking type {0}")]
    PriceUnavailable(Arc<str>),

    #[error("Child {0} not found")]
    ChildNotOwned(i64),

    #[error("Service {0} not found or not available for booking")]
    ServiceUnavailable(i64),

    #[error("Schedule {0} not found or inactive")]
    ScheduleNotFound(i64),

    #[error("Entity {0} not found")]
    EntityNotFound(i64),

    #[error("Forbidden")]
    Forbidden,

    #[error("Session {index}: slot on {date} is fully booked")]
    SlotConflict { index: usize, date: time::Date },

    #[error("Booking failed due to concurrent reservations, please try again")]
    BookingConflict,

    #[error("Booking request deadline exceeded")]
    DeadlineExceeded,

    #[error("Internal error")]
    InternalError,
}

impl ServiceError {
    /// Conflicts are caused by concurrent bookings and are worth retrying.
    pub fn is_conflict(&self) -> bool {
        match self {
            ServiceError::SlotConflict { .. } => true,
            ServiceError::DatabaseQueryError(err) => err.is_conflict(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_is_conflict() {
        assert!(ServiceError::SlotConflict {
            index: 1,
            date: date!(2024 - 06 - 10)
        }
        .is_conflict());
        assert!(ServiceError::DatabaseQueryError(dao::DaoError::UniqueViolation(
            "bookings_booking_number_key".into()
        ))
        .is_conflict());
        assert!(
            ServiceError::DatabaseQueryError(dao::DaoError::SerializationFailure(
                "deadlock detected".into()
            ))
            .is_conflict()
        );
        assert!(!ServiceError::BookingConflict.is_conflict());
        assert!(!ServiceError::ChildNotOwned(1).is_conflict());
        assert!(
            !ServiceError::DatabaseQueryError(dao::DaoError::DatabaseQueryError(
                "connection refused".into()
            ))
            .is_conflict()
        );
    }
}
