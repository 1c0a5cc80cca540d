use std::{collections::HashMap, fmt::Display, sync::Arc};

use async_trait::async_trait;
use dao::{child::ChildDao, coach::CoachDao, offering::OfferingDao, TransactionDao};
use service::{
    booking::{Booking, BookingConfirmation, BookingSession, SessionInfo},
    confirmation::BookingConfirmationService,
};
use tracing::{instrument, warn};

use crate::gen_service_impl;

gen_service_impl! {
    struct BookingConfirmationServiceImpl: BookingConfirmationService = BookingConfirmationServiceDeps {
        OfferingDao: OfferingDao<Transaction = Self::Transaction> = offering_dao,
        ChildDao: ChildDao<Transaction = Self::Transaction> = child_dao,
        CoachDao: CoachDao<Transaction = Self::Transaction> = coach_dao,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

/// Unwraps a name lookup, logging failures and missing rows.
pub(crate) fn logged_name<E: Display>(
    lookup: Result<Option<Arc<str>>, E>,
    what: &str,
    id: i64,
) -> Option<Arc<str>> {
    match lookup {
        Ok(Some(name)) => Some(name),
        Ok(None) => {
            warn!(id, "No {what} found for confirmation");
            None
        }
        Err(err) => {
            warn!(id, error = %err, "Could not look up {what}");
            None
        }
    }
}

#[async_trait]
impl<Deps: BookingConfirmationServiceDeps> BookingConfirmationService
    for BookingConfirmationServiceImpl<Deps>
{
    type Transaction = Deps::Transaction;

    #[instrument(skip_all, fields(booking_id = booking.id))]
    async fn build(
        &self,
        booking: &Booking,
        sessions: &[BookingSession],
        tx: Option<Self::Transaction>,
    ) -> BookingConfirmation {
        let tx = match self.transaction_dao.use_transaction(tx).await {
            Ok(tx) => Some(tx),
            Err(err) => {
                warn!(error = %err, "No transaction for confirmation lookups");
                None
            }
        };

        let mut service_name = None;
        let mut child_name = None;
        let mut coach_names: HashMap<i64, Option<Arc<str>>> = HashMap::new();
        if let Some(tx) = tx.clone() {
            service_name = logged_name(
                self.offering_dao
                    .find_name(booking.service_id, tx.clone())
                    .await,
                "service",
                booking.service_id,
            );
            child_name = logged_name(
                self.child_dao.find_name(booking.child_id, tx.clone()).await,
                "child",
                booking.child_id,
            );
            for coach_id in sessions.iter().filter_map(|session| session.coach_id) {
                if coach_names.contains_key(&coach_id) {
                    continue;
                }
                let coach_name = logged_name(
                    self.coach_dao.find_name(coach_id, tx.clone()).await,
                    "coach",
                    coach_id,
                );
                coach_names.insert(coach_id, coach_name);
            }
        }
        if let Some(tx) = tx {
            if let Err(err) = self.transaction_dao.commit(tx).await {
                warn!(error = %err, "Could not close confirmation transaction");
            }
        }

        BookingConfirmation {
            booking_id: booking.id,
            booking_number: booking.booking_number.clone(),
            service_name: service_name.unwrap_or_else(|| "".into()),
            child_name: child_name.unwrap_or_else(|| "".into()),
            booking_type: booking.booking_type,
            total_sessions: booking.total_sessions,
            total_amount: booking.total_amount,
            status: booking.status,
            created: booking.created,
            sessions: sessions
                .iter()
                .map(|session| SessionInfo {
                    session_date: session.session_date,
                    start_time: session.start_time,
                    end_time: session.end_time,
                    coach_name: session
                        .coach_id
                        .and_then(|coach_id| coach_names.get(&coach_id).cloned().flatten()),
                })
                .collect(),
        }
    }
}
