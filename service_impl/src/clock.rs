use service::clock::ClockService;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Wall clock in UTC. Session dates are compared against its date.
pub struct ClockServiceImpl;

impl ClockService for ClockServiceImpl {
    fn time_now(&self) -> time::Time {
        OffsetDateTime::now_utc().time()
    }
    fn date_now(&self) -> time::Date {
        OffsetDateTime::now_utc().date()
    }
    fn date_time_now(&self) -> PrimitiveDateTime {
        let now = OffsetDateTime::now_utc();
        PrimitiveDateTime::new(now.date(), now.time())
    }
}
