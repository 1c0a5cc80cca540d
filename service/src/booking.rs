use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    booking::BookingEntity, booking_session::BookingSessionEntity, DaoError,
};
use kidbook_utils::Money;
use mockall::automock;
use time::PrimitiveDateTime;

use crate::principal::ParentPrincipal;
use crate::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BookingType {
    Trial,
    Single,
    Package4,
    Package8,
    Package12,
}

impl BookingType {
    /// Number of sessions a booking of this type reserves.
    pub fn session_count(&self) -> usize {
        match self {
            BookingType::Trial | BookingType::Single => 1,
            BookingType::Package4 => 4,
            BookingType::Package8 => 8,
            BookingType::Package12 => 12,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::Trial => "trial",
            BookingType::Single => "single",
            BookingType::Package4 => "package_4",
            BookingType::Package8 => "package_8",
            BookingType::Package12 => "package_12",
        }
    }
}

impl FromStr for BookingType {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "trial" => Ok(BookingType::Trial),
            "single" => Ok(BookingType::Single),
            "package_4" => Ok(BookingType::Package4),
            "package_8" => Ok(BookingType::Package8),
            "package_12" => Ok(BookingType::Package12),
            _ => Err(ServiceError::InvalidBookingType(value.into())),
        }
    }
}

impl Display for BookingType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = DaoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            _ => Err(DaoError::EnumValueNotFound(value.into())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
            SessionStatus::NoShow => "no_show",
        }
    }

    /// Cancelled and no-show sessions give their seat back.
    pub fn occupies_seat(&self) -> bool {
        !matches!(self, SessionStatus::Cancelled | SessionStatus::NoShow)
    }
}

impl FromStr for SessionStatus {
    type Err = DaoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "scheduled" => Ok(SessionStatus::Scheduled),
            "completed" => Ok(SessionStatus::Completed),
            "cancelled" => Ok(SessionStatus::Cancelled),
            "no_show" => Ok(SessionStatus::NoShow),
            _ => Err(DaoError::EnumValueNotFound(value.into())),
        }
    }
}

/// One requested session as sent by the client. The date is kept as the raw
/// string so that malformed dates can be reported per session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRequest {
    pub schedule_id: i64,
    pub session_date: Arc<str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateBookingRequest {
    pub child_id: i64,
    pub service_id: i64,
    pub booking_type: Arc<str>,
    pub session_dates: Arc<[SessionRequest]>,
    pub preferred_coach: Option<i64>,
    pub parent_notes: Option<Arc<str>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Booking {
    pub id: i64,
    pub booking_number: Arc<str>,
    pub parent_id: i64,
    pub child_id: i64,
    pub service_id: i64,
    pub vendor_id: i64,
    pub booking_type: BookingType,
    pub total_sessions: i32,
    pub total_amount: Money,
    pub status: BookingStatus,
    pub preferred_coach: Option<i64>,
    pub parent_notes: Option<Arc<str>>,
    pub version: i32,
    pub created: PrimitiveDateTime,
    pub updated: PrimitiveDateTime,
}

impl TryFrom<&BookingEntity> for Booking {
    type Error = ServiceError;

    fn try_from(booking: &BookingEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            id: booking.id,
            booking_number: booking.booking_number.clone(),
            parent_id: booking.parent_id,
            child_id: booking.child_id,
            service_id: booking.service_id,
            vendor_id: booking.vendor_id,
            booking_type: booking.booking_type.parse().map_err(|_| {
                DaoError::EnumValueNotFound(booking.booking_type.clone())
            })?,
            total_sessions: booking.total_sessions,
            total_amount: booking.total_amount,
            status: booking.status.parse()?,
            preferred_coach: booking.preferred_coach,
            parent_notes: booking.parent_notes.clone(),
            version: booking.version,
            created: booking.created,
            updated: booking.updated,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingSession {
    pub id: i64,
    pub booking_id: i64,
    pub schedule_id: i64,
    pub session_date: time::Date,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub status: SessionStatus,
    pub coach_id: Option<i64>,
    pub created: PrimitiveDateTime,
}

impl TryFrom<&BookingSessionEntity> for BookingSession {
    type Error = ServiceError;

    fn try_from(session: &BookingSessionEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            id: session.id,
            booking_id: session.booking_id,
            schedule_id: session.schedule_id,
            session_date: session.session_date,
            start_time: session.start_time,
            end_time: session.end_time,
            status: session.status.parse()?,
            coach_id: session.coach_id,
            created: session.created,
        })
    }
}

/// Display data of one session in a confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionInfo {
    pub session_date: time::Date,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub coach_name: Option<Arc<str>>,
}

/// Returned to the parent right after a booking was created. Names which
/// could not be looked up are empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingConfirmation {
    pub booking_id: i64,
    pub booking_number: Arc<str>,
    pub service_name: Arc<str>,
    pub child_name: Arc<str>,
    pub booking_type: BookingType,
    pub total_sessions: i32,
    pub total_amount: Money,
    pub status: BookingStatus,
    pub created: PrimitiveDateTime,
    pub sessions: Arc<[SessionInfo]>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionDetail {
    /// 1-based position of the session within its booking.
    pub session_number: usize,
    pub session_id: i64,
    pub schedule_id: i64,
    pub session_date: time::Date,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub status: SessionStatus,
    pub coach_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingDetail {
    pub booking: Booking,
    pub service_name: Arc<str>,
    pub child_name: Arc<str>,
    pub vendor_name: Arc<str>,
    pub sessions: Arc<[SessionDetail]>,
    pub completed_sessions: usize,
    pub next_session: Option<SessionDetail>,
}

#[automock(type Transaction = dao::MockTransaction;)]
#[async_trait]
pub trait BookingService {
    type Transaction: dao::Transaction;

    /// Reserves the requested sessions and persists the booking in one
    /// transaction. Conflicting concurrent bookings are retried.
    async fn create_booking(
        &self,
        principal: ParentPrincipal,
        request: &CreateBookingRequest,
    ) -> Result<BookingConfirmation, ServiceError>;

    async fn get_booking(
        &self,
        principal: ParentPrincipal,
        booking_id: i64,
        tx: Option<Self::Transaction>,
    ) -> Result<BookingDetail, ServiceError>;
}
