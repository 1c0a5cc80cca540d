use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rest_types::{
    BookingConfirmationTO, BookingDetailTO, CreateBookingRequestTO, DataTO, ErrorTO,
    SessionDetailTO, SessionInfoTO, SessionRequestTO,
};
use service::booking::{BookingService, CreateBookingRequest};
use tracing::instrument;
use utoipa::OpenApi;

use crate::{error_handler, Parent, RestError, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", post(create_booking::<RestState>))
        .route("/{booking_id}", get(get_booking::<RestState>))
}

#[instrument(skip(rest_state, body))]
#[utoipa::path(
    post,
    path = "",
    tags = ["Bookings"],
    description = "Reserve sessions for a child and create a pending booking",
    params(
        ("x-parent-id" = i64, Header, description = "Id of the authenticated parent"),
    ),
    request_body = CreateBookingRequestTO,
    responses(
        (status = 201, description = "Booking created", body = DataTO<BookingConfirmationTO>),
        (status = 400, description = "Invalid booking request", body = ErrorTO),
        (status = 401, description = "Unauthorized", body = ErrorTO),
        (status = 404, description = "Child, service or schedule not found", body = ErrorTO),
        (status = 409, description = "Slot fully booked", body = ErrorTO),
        (status = 504, description = "Booking deadline exceeded", body = ErrorTO),
        (status = 500, description = "Internal server error", body = ErrorTO),
    ),
)]
pub async fn create_booking<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Parent(principal): Parent,
    body: Result<Json<CreateBookingRequestTO>, JsonRejection>,
) -> Response {
    error_handler(
        (async {
            let Json(request) =
                body.map_err(|rejection| RestError::InvalidRequest(rejection.body_text().into()))?;
            let confirmation = rest_state
                .booking_service()
                .create_booking(principal, &CreateBookingRequest::from(&request))
                .await?;
            Ok((
                StatusCode::CREATED,
                Json(DataTO::new(BookingConfirmationTO::from(&confirmation))),
            )
                .into_response())
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/{booking_id}",
    tags = ["Bookings"],
    description = "Get a booking of the authenticated parent with its sessions",
    params(
        ("booking_id" = i64, Path, description = "Booking id", example = 42),
        ("x-parent-id" = i64, Header, description = "Id of the authenticated parent"),
    ),
    responses(
        (status = 200, description = "Booking with sessions", body = DataTO<BookingDetailTO>),
        (status = 401, description = "Unauthorized", body = ErrorTO),
        (status = 403, description = "Booking belongs to another parent", body = ErrorTO),
        (status = 404, description = "Booking not found", body = ErrorTO),
        (status = 500, description = "Internal server error", body = ErrorTO),
    ),
)]
pub async fn get_booking<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Parent(principal): Parent,
    booking_id: Result<Path<i64>, PathRejection>,
) -> Response {
    error_handler(
        (async {
            let Path(booking_id) = booking_id
                .map_err(|rejection| RestError::InvalidRequest(rejection.body_text().into()))?;
            let detail = rest_state
                .booking_service()
                .get_booking(principal, booking_id, None)
                .await?;
            Ok(Json(DataTO::new(BookingDetailTO::from(&detail))).into_response())
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "Bookings", description = "Session reservation and booking API"),
    ),
    paths(
        create_booking,
        get_booking,
    ),
    components(
        schemas(
            CreateBookingRequestTO,
            SessionRequestTO,
            BookingConfirmationTO,
            SessionInfoTO,
            BookingDetailTO,
            SessionDetailTO,
            ErrorTO,
        ),
    ),
)]
pub struct BookingApiDoc;
