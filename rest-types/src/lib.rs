use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

time::serde::format_description!(clock_time, Time, "[hour]:[minute]:[second]");
time::serde::format_description!(
    timestamp,
    PrimitiveDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second]"
);

/// Success envelope: every successful response wraps its payload in `data`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DataTO<T> {
    pub data: T,
}
impl<T> DataTO<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBodyTO {
    /// Machine readable error kind, e.g. `SLOT_CONFLICT`.
    pub code: Arc<str>,
    pub message: Arc<str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorTO {
    pub error: ErrorBodyTO,
}
impl ErrorTO {
    pub fn new(code: &str, message: impl Into<Arc<str>>) -> Self {
        Self {
            error: ErrorBodyTO {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionRequestTO {
    pub schedule_id: i64,
    /// Calendar date in `YYYY-MM-DD` form.
    #[schema(example = "2024-06-10")]
    pub session_date: Arc<str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateBookingRequestTO {
    pub child_id: i64,
    pub service_id: i64,
    /// One of `trial`, `single`, `package_4`, `package_8`, `package_12`.
    #[schema(example = "package_4")]
    pub booking_type: Arc<str>,
    pub session_dates: Arc<[SessionRequestTO]>,
    #[serde(default)]
    pub preferred_coach: Option<i64>,
    #[serde(default)]
    pub parent_notes: Option<Arc<str>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionInfoTO {
    pub session_date: time::Date,
    #[serde(with = "clock_time")]
    #[schema(value_type = String, example = "09:30:00")]
    pub start_time: time::Time,
    #[serde(with = "clock_time")]
    #[schema(value_type = String, example = "10:30:00")]
    pub end_time: time::Time,
    #[serde(default)]
    pub coach_name: Option<Arc<str>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookingConfirmationTO {
    pub booking_id: i64,
    pub booking_number: Arc<str>,
    pub service_name: Arc<str>,
    pub child_name: Arc<str>,
    pub booking_type: Arc<str>,
    pub total_sessions: i32,
    /// Decimal amount with two fraction digits.
    #[schema(example = "60.00")]
    pub total_amount: Arc<str>,
    pub status: Arc<str>,
    #[serde(with = "timestamp")]
    #[schema(value_type = String, example = "2024-06-01T08:05:09")]
    pub created_at: time::PrimitiveDateTime,
    pub sessions: Arc<[SessionInfoTO]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionDetailTO {
    pub session_number: usize,
    pub session_id: i64,
    pub schedule_id: i64,
    pub session_date: time::Date,
    #[serde(with = "clock_time")]
    #[schema(value_type = String, example = "09:30:00")]
    pub start_time: time::Time,
    #[serde(with = "clock_time")]
    #[schema(value_type = String, example = "10:30:00")]
    pub end_time: time::Time,
    pub status: Arc<str>,
    #[serde(default)]
    pub coach_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookingDetailTO {
    pub booking_id: i64,
    pub booking_number: Arc<str>,
    pub child_id: i64,
    pub child_name: Arc<str>,
    pub service_id: i64,
    pub service_name: Arc<str>,
    pub vendor_id: i64,
    pub vendor_name: Arc<str>,
    pub booking_type: Arc<str>,
    pub total_sessions: i32,
    #[schema(example = "60.00")]
    pub total_amount: Arc<str>,
    pub status: Arc<str>,
    #[serde(default)]
    pub preferred_coach: Option<i64>,
    #[serde(default)]
    pub parent_notes: Option<Arc<str>>,
    #[serde(rename = "$version")]
    pub version: i32,
    #[serde(with = "timestamp")]
    #[schema(value_type = String, example = "2024-06-01T08:05:09")]
    pub created_at: time::PrimitiveDateTime,
    #[serde(with = "timestamp")]
    #[schema(value_type = String, example = "2024-06-01T08:05:09")]
    pub updated_at: time::PrimitiveDateTime,
    pub sessions: Arc<[SessionDetailTO]>,
    pub completed_sessions: usize,
    #[serde(default)]
    pub next_session: Option<SessionDetailTO>,
}

#[cfg(feature = "service-impl")]
mod service_conversions {
    use super::*;
    use kidbook_utils::derive_from_reference;
    use service::booking::{
        BookingConfirmation, BookingDetail, CreateBookingRequest, SessionDetail, SessionInfo,
        SessionRequest,
    };

    impl From<&SessionRequestTO> for SessionRequest {
        fn from(session: &SessionRequestTO) -> Self {
            Self {
                schedule_id: session.schedule_id,
                session_date: session.session_date.clone(),
            }
        }
    }

    impl From<&CreateBookingRequestTO> for CreateBookingRequest {
        fn from(request: &CreateBookingRequestTO) -> Self {
            Self {
                child_id: request.child_id,
                service_id: request.service_id,
                booking_type: request.booking_type.clone(),
                session_dates: request
                    .session_dates
                    .iter()
                    .map(SessionRequest::from)
                    .collect(),
                preferred_coach: request.preferred_coach,
                parent_notes: request.parent_notes.clone(),
            }
        }
    }
    derive_from_reference!(CreateBookingRequestTO, CreateBookingRequest);

    impl From<&SessionInfo> for SessionInfoTO {
        fn from(session: &SessionInfo) -> Self {
            Self {
                session_date: session.session_date,
                start_time: session.start_time,
                end_time: session.end_time,
                coach_name: session.coach_name.clone(),
            }
        }
    }

    impl From<&BookingConfirmation> for BookingConfirmationTO {
        fn from(confirmation: &BookingConfirmation) -> Self {
            Self {
                booking_id: confirmation.booking_id,
                booking_number: confirmation.booking_number.clone(),
                service_name: confirmation.service_name.clone(),
                child_name: confirmation.child_name.clone(),
                booking_type: confirmation.booking_type.as_str().into(),
                total_sessions: confirmation.total_sessions,
                total_amount: confirmation.total_amount.to_string().into(),
                status: confirmation.status.as_str().into(),
                created_at: confirmation.created,
                sessions: confirmation
                    .sessions
                    .iter()
                    .map(SessionInfoTO::from)
                    .collect(),
            }
        }
    }
    derive_from_reference!(BookingConfirmation, BookingConfirmationTO);

    impl From<&SessionDetail> for SessionDetailTO {
        fn from(session: &SessionDetail) -> Self {
            Self {
                session_number: session.session_number,
                session_id: session.session_id,
                schedule_id: session.schedule_id,
                session_date: session.session_date,
                start_time: session.start_time,
                end_time: session.end_time,
                status: session.status.as_str().into(),
                coach_id: session.coach_id,
            }
        }
    }

    impl From<&BookingDetail> for BookingDetailTO {
        fn from(detail: &BookingDetail) -> Self {
            let booking = &detail.booking;
            Self {
                booking_id: booking.id,
                booking_number: booking.booking_number.clone(),
                child_id: booking.child_id,
                child_name: detail.child_name.clone(),
                service_id: booking.service_id,
                service_name: detail.service_name.clone(),
                vendor_id: booking.vendor_id,
                vendor_name: detail.vendor_name.clone(),
                booking_type: booking.booking_type.as_str().into(),
                total_sessions: booking.total_sessions,
                total_amount: booking.total_amount.to_string().into(),
                status: booking.status.as_str().into(),
                preferred_coach: booking.preferred_coach,
                parent_notes: booking.parent_notes.clone(),
                version: booking.version,
                created_at: booking.created,
                updated_at: booking.updated,
                sessions: detail.sessions.iter().map(SessionDetailTO::from).collect(),
                completed_sessions: detail.completed_sessions,
                next_session: detail.next_session.as_ref().map(SessionDetailTO::from),
            }
        }
    }
}
