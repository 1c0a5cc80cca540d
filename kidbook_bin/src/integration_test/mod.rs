mod booking;
mod concurrency;
mod rest_api;

use std::{str::FromStr, sync::Arc, time::Duration};

use service::{
    booking::{CreateBookingRequest, SessionRequest},
    principal::ParentPrincipal,
};
use sqlx::{
    query,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use tempfile::TempDir;

use crate::RestStateImpl;

pub const PARENT: ParentPrincipal = ParentPrincipal { parent_id: 100 };
pub const OTHER_PARENT: ParentPrincipal = ParentPrincipal { parent_id: 200 };

pub const CHILD: i64 = 1;
pub const OTHER_CHILD: i64 = 2;

pub const FOOTBALL: i64 = 1;
pub const SWIMMING: i64 = 2;

/// Football, two seats, coached by Sam Taylor.
pub const FOOTBALL_MONDAY: i64 = 1;
/// Football, one seat, no coach.
pub const FOOTBALL_WEDNESDAY: i64 = 2;
/// Football, deactivated.
pub const FOOTBALL_FRIDAY: i64 = 3;
pub const SWIMMING_MONDAY: i64 = 4;

/// A migrated SQLite database file with a small catalog and the wired
/// services on top of it.
pub struct TestSetup {
    pub rest_state: RestStateImpl,
    pub pool: Arc<SqlitePool>,
    _dir: TempDir,
}

impl TestSetup {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let options = SqliteConnectOptions::from_str(&format!(
            "sqlite://{}",
            dir.path().join("kidbook.sqlite3").display()
        ))
        .unwrap()
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::migrate!("../migrations/sqlite")
            .run(&pool)
            .await
            .unwrap();
        let pool = Arc::new(pool);
        seed_catalog(&pool).await;

        Self {
            rest_state: RestStateImpl::new(pool.clone()),
            pool,
            _dir: dir,
        }
    }

    pub async fn count_rows(&self, table: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT count(*) FROM {table}"))
            .fetch_one(self.pool.as_ref())
            .await
            .unwrap();
        count
    }

    pub async fn occupied(&self, schedule_id: i64, session_date: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT count(*) FROM booking_sessions WHERE schedule_id = ? AND session_date = ? AND status NOT IN ('cancelled', 'no_show')",
        )
        .bind(schedule_id)
        .bind(session_date)
        .fetch_one(self.pool.as_ref())
        .await
        .unwrap();
        count
    }
}

async fn seed_catalog(pool: &SqlitePool) {
    let statements = [
        "INSERT INTO vendors (id, business_name) VALUES (1, 'Little Kickers')",
        "INSERT INTO coaches (id, vendor_id, full_name) VALUES (1, 1, 'Sam Taylor')",
        "INSERT INTO services (id, vendor_id, name, price_per_session_cents, trial_price_cents, package_4_price_cents, status) VALUES (1, 1, 'Junior Football', 1500, 1000, NULL, 'active')",
        "INSERT INTO services (id, vendor_id, name, price_per_session_cents, status) VALUES (2, 1, 'Swim Starters', 2000, 'draft')",
        "INSERT INTO schedules (id, service_id, coach_id, day_of_week, start_time, end_time, available_slots, is_active) VALUES (1, 1, 1, 1, '09:30:00', '10:30:00', 2, 1)",
        "INSERT INTO schedules (id, service_id, coach_id, day_of_week, start_time, end_time, available_slots, is_active) VALUES (2, 1, NULL, 3, '16:00:00', '17:00:00', 1, 1)",
        "INSERT INTO schedules (id, service_id, coach_id, day_of_week, start_time, end_time, available_slots, is_active) VALUES (3, 1, 1, 5, '09:30:00', '10:30:00', 5, 0)",
        "INSERT INTO schedules (id, service_id, coach_id, day_of_week, start_time, end_time, available_slots, is_active) VALUES (4, 2, NULL, 1, '11:00:00', '11:45:00', 5, 1)",
        "INSERT INTO children (id, parent_id, name) VALUES (1, 100, 'Mia')",
        "INSERT INTO children (id, parent_id, name) VALUES (2, 200, 'Noah')",
    ];
    for statement in statements {
        query(statement).execute(pool).await.unwrap();
    }
}

/// `YYYY-MM-DD` of the day `days` after today (UTC).
pub fn days_from_today(days: i64) -> String {
    let date = time::OffsetDateTime::now_utc().date() + time::Duration::days(days);
    kidbook_utils::format_iso_date(date).unwrap()
}

pub fn booking_request(
    child_id: i64,
    booking_type: &str,
    sessions: &[(i64, &str)],
) -> CreateBookingRequest {
    CreateBookingRequest {
        child_id,
        service_id: FOOTBALL,
        booking_type: booking_type.into(),
        session_dates: sessions
            .iter()
            .map(|(schedule_id, session_date)| SessionRequest {
                schedule_id: *schedule_id,
                session_date: (*session_date).into(),
            })
            .collect(),
        preferred_coach: None,
        parent_notes: None,
    }
}
