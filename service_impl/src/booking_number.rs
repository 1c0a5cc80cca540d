use std::sync::Arc;

use service::{booking_number::BookingNumberService, clock::ClockService, uuid_service::UuidService};

use crate::gen_service_impl;

gen_service_impl! {
    struct BookingNumberServiceImpl: BookingNumberService = BookingNumberServiceDeps {
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service
    }
}

impl<Deps: BookingNumberServiceDeps> BookingNumberService for BookingNumberServiceImpl<Deps> {
    fn generate(&self) -> Arc<str> {
        let now = self.clock_service.date_time_now();
        let random = self.uuid_service.new_uuid("booking-number").as_u128();
        let suffix = (random % 1_000_000 + u128::from(now.microsecond())) % 1_000_000;
        format!(
            "BK-{:04}{:02}{:02}-{:02}{:02}{:02}-{:06}",
            now.year(),
            u8::from(now.month()),
            now.day(),
            now.hour(),
            now.minute(),
            now.second(),
            suffix
        )
        .into()
    }
}
