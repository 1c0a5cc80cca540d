use async_trait::async_trait;
use mockall::automock;

use crate::booking::{Booking, BookingConfirmation, BookingSession};

#[automock(type Transaction = dao::MockTransaction;)]
#[async_trait]
pub trait BookingConfirmationService {
    type Transaction: dao::Transaction;

    /// Adds service, child and coach names to a persisted booking. Lookups
    /// which fail leave the name empty, this never fails.
    async fn build(
        &self,
        booking: &Booking,
        sessions: &[BookingSession],
        tx: Option<Self::Transaction>,
    ) -> BookingConfirmation;
}
