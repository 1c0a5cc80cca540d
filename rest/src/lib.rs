use std::sync::Arc;

mod auth;
mod booking;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use rest_types::ErrorTO;
use service::ServiceError;
use thiserror::Error;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use auth::{Parent, PARENT_ID_HEADER};

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Service error")]
    ServiceError(#[from] ServiceError),

    #[error("Missing or invalid parent identity")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    InvalidRequest(Arc<str>),
}

fn error_response(status: StatusCode, code: &str, message: impl Into<Arc<str>>) -> Response {
    (status, Json(ErrorTO::new(code, message))).into_response()
}

/// Maps errors to their status code and JSON error body.
fn error_handler(result: Result<Response, RestError>) -> Response {
    match result {
        Ok(response) => response,
        Err(RestError::Unauthorized) => error_response(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            RestError::Unauthorized.to_string(),
        ),
        Err(RestError::InvalidRequest(message)) => {
            error_response(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message)
        }
        Err(RestError::ServiceError(err)) => {
            let (status, code) = match &err {
                ServiceError::InvalidBookingType(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_BOOKING_TYPE")
                }
                ServiceError::SessionCountMismatch { .. } => {
                    (StatusCode::BAD_REQUEST, "SESSION_COUNT_MISMATCH")
                }
                ServiceError::InvalidSessionDate { .. } => {
                    (StatusCode::BAD_REQUEST, "INVALID_SESSION_DATE")
                }
                ServiceError::PastDateBooking { .. } => {
                    (StatusCode::BAD_REQUEST, "PAST_DATE_BOOKING")
                }
                ServiceError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                ServiceError::PriceUnavailable(_) => {
                    (StatusCode::BAD_REQUEST, "PRICE_UNAVAILABLE")
                }
                ServiceError::ChildNotOwned(_) => (StatusCode::NOT_FOUND, "CHILD_NOT_FOUND"),
                ServiceError::ServiceUnavailable(_) => {
                    (StatusCode::NOT_FOUND, "SERVICE_NOT_FOUND")
                }
                ServiceError::ScheduleNotFound(_) => (StatusCode::NOT_FOUND, "SCHEDULE_NOT_FOUND"),
                ServiceError::EntityNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                ServiceError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                ServiceError::SlotConflict { .. } => (StatusCode::CONFLICT, "SLOT_CONFLICT"),
                ServiceError::BookingConflict => (StatusCode::CONFLICT, "BOOKING_CONFLICT"),
                ServiceError::DeadlineExceeded => {
                    (StatusCode::GATEWAY_TIMEOUT, "DEADLINE_EXCEEDED")
                }
                ServiceError::DatabaseQueryError(_) | ServiceError::InternalError => {
                    error!(error = %err, "Request failed");
                    return error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "Internal server error",
                    );
                }
            };
            error_response(status, code, err.to_string())
        }
    }
}

pub trait RestStateDef: Clone + Send + Sync + 'static {
    type BookingService: service::booking::BookingService + Send + Sync + 'static;

    fn backend_version(&self) -> Arc<str>;
    fn booking_service(&self) -> Arc<Self::BookingService>;
}

#[derive(OpenApi)]
#[openapi(
    info(title = "kidbook booking API"),
    nest(
        (path = "/bookings", api = booking::BookingApiDoc),
    ),
)]
pub struct ApiDoc;

pub fn build_router<RestState: RestStateDef>(rest_state: RestState) -> Router {
    Router::new()
        .nest("/bookings", booking::generate_route())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(rest_state)
}

pub async fn start_server<RestState: RestStateDef>(
    rest_state: RestState,
    address: &str,
) -> Result<(), std::io::Error> {
    info!(
        version = %rest_state.backend_version(),
        address,
        "Starting server"
    );
    let app = build_router(rest_state);
    let listener = tokio::net::TcpListener::bind(address).await?;
    axum::serve(listener, app).await
}
