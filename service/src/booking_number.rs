use std::sync::Arc;

use mockall::automock;

/// Produces booking numbers of the form `BK-YYYYMMDD-HHMMSS-NNNNNN`.
///
/// Numbers are not guaranteed to be unique. The storage rejects duplicates
/// and the booking is retried with a fresh number.
#[automock]
pub trait BookingNumberService {
    fn generate(&self) -> Arc<str>;
}
