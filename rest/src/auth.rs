use axum::{extract::FromRequestParts, http::request::Parts, response::Response};
use service::principal::ParentPrincipal;
use tracing::warn;

use crate::{error_handler, RestError};

/// Header carrying the id of the parent authenticated upstream.
pub const PARENT_ID_HEADER: &str = "x-parent-id";

/// Used when no identity header is present and `mock_auth` is enabled.
#[cfg(feature = "mock_auth")]
const MOCK_PARENT_ID: i64 = 1;

/// Extracts the authenticated parent of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parent(pub ParentPrincipal);

fn parse_parent_id(parts: &Parts) -> Result<Option<i64>, RestError> {
    let Some(value) = parts.headers.get(PARENT_ID_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|parent_id| *parent_id > 0)
        .map(Some)
        .ok_or_else(|| {
            warn!("Rejecting malformed parent identity header");
            RestError::Unauthorized
        })
}

impl<S: Send + Sync> FromRequestParts<S> for Parent {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parse_parent_id(parts) {
            Ok(Some(parent_id)) => Ok(Parent(ParentPrincipal::new(parent_id))),
            #[cfg(feature = "mock_auth")]
            Ok(None) => Ok(Parent(ParentPrincipal::new(MOCK_PARENT_ID))),
            #[cfg(not(feature = "mock_auth"))]
            Ok(None) => Err(error_handler(Err(RestError::Unauthorized))),
            Err(err) => Err(error_handler(Err(err))),
        }
    }
}
