#[cfg(all(test, feature = "sqlite", not(feature = "postgres")))]
mod integration_test;

use std::sync::Arc;

#[cfg(feature = "postgres")]
use dao_impl_postgres as dao_impl;
#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
use dao_impl_sqlite as dao_impl;

use dao_impl::{
    booking::BookingDaoImpl, booking_session::BookingSessionDaoImpl, child::ChildDaoImpl,
    coach::CoachDaoImpl, offering::OfferingDaoImpl, schedule::ScheduleDaoImpl,
    vendor::VendorDaoImpl, TransactionDaoImpl, TransactionImpl,
};
use service::config::ConfigService;
use service_impl::{
    booking::BookingServiceDeps, booking_number::BookingNumberServiceDeps,
    clock::ClockServiceImpl, config::ConfigServiceImpl,
    confirmation::BookingConfirmationServiceDeps, slot_reservation::SlotReservationServiceDeps,
    uuid_service::UuidServiceImpl,
};

#[cfg(feature = "postgres")]
type Database = sqlx::Postgres;
#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
type Database = sqlx::Sqlite;
type Pool = sqlx::Pool<Database>;

#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
const DEFAULT_DATABASE_URL: &str = "sqlite:./localdb.sqlite3";

type Transaction = TransactionImpl;
type TransactionDao = TransactionDaoImpl;
type ChildDao = ChildDaoImpl;
type CoachDao = CoachDaoImpl;
type VendorDao = VendorDaoImpl;
type OfferingDao = OfferingDaoImpl;
type ScheduleDao = ScheduleDaoImpl;
type BookingDao = BookingDaoImpl;
type BookingSessionDao = BookingSessionDaoImpl;

type ClockService = ClockServiceImpl;
type UuidService = UuidServiceImpl;

pub struct BookingNumberServiceDependencies;
impl BookingNumberServiceDeps for BookingNumberServiceDependencies {
    type Transaction = Transaction;
    type ClockService = ClockService;
    type UuidService = UuidService;
}
type BookingNumberService =
    service_impl::booking_number::BookingNumberServiceImpl<BookingNumberServiceDependencies>;

pub struct SlotReservationServiceDependencies;
impl SlotReservationServiceDeps for SlotReservationServiceDependencies {
    type Transaction = Transaction;
    type ScheduleDao = ScheduleDao;
    type BookingSessionDao = BookingSessionDao;
}
type SlotReservationService = service_impl::slot_reservation::SlotReservationServiceImpl<
    SlotReservationServiceDependencies,
>;

pub struct BookingConfirmationServiceDependencies;
impl BookingConfirmationServiceDeps for BookingConfirmationServiceDependencies {
    type Transaction = Transaction;
    type OfferingDao = OfferingDao;
    type ChildDao = ChildDao;
    type CoachDao = CoachDao;
    type TransactionDao = TransactionDao;
}
type BookingConfirmationService = service_impl::confirmation::BookingConfirmationServiceImpl<
    BookingConfirmationServiceDependencies,
>;

pub struct BookingServiceDependencies;
impl BookingServiceDeps for BookingServiceDependencies {
    type Transaction = Transaction;
    type ChildDao = ChildDao;
    type OfferingDao = OfferingDao;
    type VendorDao = VendorDao;
    type BookingDao = BookingDao;
    type BookingSessionDao = BookingSessionDao;
    type SlotReservationService = SlotReservationService;
    type BookingConfirmationService = BookingConfirmationService;
    type BookingNumberService = BookingNumberService;
    type ConfigService = ConfigServiceImpl;
    type ClockService = ClockService;
    type TransactionDao = TransactionDao;
}
type BookingService = service_impl::booking::BookingServiceImpl<BookingServiceDependencies>;

#[derive(Clone)]
pub struct RestStateImpl {
    booking_service: Arc<BookingService>,
}
impl rest::RestStateDef for RestStateImpl {
    type BookingService = BookingService;

    fn backend_version(&self) -> Arc<str> {
        Arc::from(env!("CARGO_PKG_VERSION"))
    }

    fn booking_service(&self) -> Arc<Self::BookingService> {
        self.booking_service.clone()
    }
}
impl RestStateImpl {
    pub fn new(pool: Arc<Pool>) -> Self {
        let transaction_dao = Arc::new(TransactionDao::new(pool.clone()));
        let child_dao = Arc::new(ChildDao::new(pool.clone()));
        let offering_dao = Arc::new(OfferingDao::new(pool.clone()));
        let booking_session_dao = Arc::new(BookingSessionDao::new(pool.clone()));
        let clock_service = Arc::new(ClockServiceImpl);
        let uuid_service = Arc::new(UuidServiceImpl);

        let booking_number_service = Arc::new(BookingNumberService {
            clock_service: clock_service.clone(),
            uuid_service,
        });
        let slot_reservation_service = Arc::new(SlotReservationService {
            schedule_dao: Arc::new(ScheduleDao::new(pool.clone())),
            booking_session_dao: booking_session_dao.clone(),
        });
        let confirmation_service = Arc::new(BookingConfirmationService {
            offering_dao: offering_dao.clone(),
            child_dao: child_dao.clone(),
            coach_dao: Arc::new(CoachDao::new(pool.clone())),
            transaction_dao: transaction_dao.clone(),
        });
        let booking_service = Arc::new(BookingService {
            child_dao,
            offering_dao,
            vendor_dao: Arc::new(VendorDao::new(pool.clone())),
            booking_dao: Arc::new(BookingDao::new(pool.clone())),
            booking_session_dao,
            slot_reservation_service,
            confirmation_service,
            booking_number_service,
            config_service: Arc::new(ConfigServiceImpl),
            clock_service,
            transaction_dao,
        });

        Self { booking_service }
    }
}

fn init_logging() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(feature = "json_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .with_span_list(true)
        .with_file(true)
        .finish();

    #[cfg(all(feature = "local_logging", not(feature = "json_logging")))]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .pretty()
        .with_file(true)
        .finish();

    #[cfg(not(any(feature = "local_logging", feature = "json_logging")))]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}

#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
async fn connect(database_url: Option<Arc<str>>) -> Result<Pool, Box<dyn std::error::Error>> {
    use std::{str::FromStr, time::Duration};

    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

    let options =
        SqliteConnectOptions::from_str(database_url.as_deref().unwrap_or(DEFAULT_DATABASE_URL))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    sqlx::migrate!("../migrations/sqlite").run(&pool).await?;
    Ok(pool)
}

#[cfg(feature = "postgres")]
async fn connect(database_url: Option<Arc<str>>) -> Result<Pool, Box<dyn std::error::Error>> {
    let database_url = database_url.ok_or("DATABASE_URL must be set for postgres")?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect(&database_url)
        .await?;
    sqlx::migrate!("../migrations/postgres").run(&pool).await?;
    Ok(pool)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_logging()?;
    tracing::info!("kidbook backend version: {}", env!("CARGO_PKG_VERSION"));

    let config = ConfigServiceImpl.get_config().await?;
    let pool = Arc::new(connect(config.database_url.clone()).await?);
    let rest_state = RestStateImpl::new(pool);

    rest::start_server(rest_state, &config.server_address).await?;
    Ok(())
}
