use std::{sync::Arc, time::Duration};

use sqlx::{
    query,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use tempfile::TempDir;

use crate::TransactionImpl;

pub async fn setup_pool() -> Arc<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("../migrations/sqlite")
        .run(&pool)
        .await
        .unwrap();
    Arc::new(pool)
}

/// A migrated WAL database file shared by two connections. Keep the
/// returned directory alive for as long as the pool is used.
pub async fn setup_file_pool(busy_timeout: Duration) -> (Arc<SqlitePool>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("kidbook.sqlite3"))
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(busy_timeout);
    let pool = SqlitePoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("../migrations/sqlite")
        .run(&pool)
        .await
        .unwrap();
    (Arc::new(pool), dir)
}

pub async fn count_rows(tx: &TransactionImpl, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT count(*) FROM {table}"))
        .fetch_one(tx.tx.lock().await.as_mut())
        .await
        .unwrap();
    count
}

pub async fn insert_vendor(tx: &TransactionImpl, id: i64, business_name: &str) {
    query("INSERT INTO vendors (id, business_name) VALUES (?, ?)")
        .bind(id)
        .bind(business_name)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .unwrap();
}

pub async fn insert_child(tx: &TransactionImpl, id: i64, parent_id: i64, name: &str) {
    query("INSERT INTO children (id, parent_id, name) VALUES (?, ?, ?)")
        .bind(id)
        .bind(parent_id)
        .bind(name)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .unwrap();
}

pub async fn insert_coach(tx: &TransactionImpl, id: i64, vendor_id: i64, full_name: &str) {
    query("INSERT INTO coaches (id, vendor_id, full_name) VALUES (?, ?, ?)")
        .bind(id)
        .bind(vendor_id)
        .bind(full_name)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .unwrap();
}

pub async fn insert_offering(tx: &TransactionImpl, id: i64, vendor_id: i64, status: &str) {
    query(
        "INSERT INTO services (id, vendor_id, name, price_per_session_cents, trial_price_cents, package_4_price_cents, status) VALUES (?, ?, 'Junior Football', 1500, 1000, NULL, ?)",
    )
    .bind(id)
    .bind(vendor_id)
    .bind(status)
    .execute(tx.tx.lock().await.as_mut())
    .await
    .unwrap();
}

pub async fn insert_schedule(
    tx: &TransactionImpl,
    id: i64,
    service_id: i64,
    coach_id: Option<i64>,
    available_slots: i32,
    is_active: bool,
) {
    query(
        "INSERT INTO schedules (id, service_id, coach_id, day_of_week, start_time, end_time, available_slots, is_active) VALUES (?, ?, ?, 1, '09:30:00', '10:30:00', ?, ?)",
    )
    .bind(id)
    .bind(service_id)
    .bind(coach_id)
    .bind(available_slots)
    .bind(is_active)
    .execute(tx.tx.lock().await.as_mut())
    .await
    .unwrap();
}

/// Vendor 1 with coach 1, active offering 1 and a Monday schedule 1 with
/// two seats, child 1 of parent 100.
pub async fn insert_catalog(tx: &TransactionImpl) {
    insert_vendor(tx, 1, "Little Kickers").await;
    insert_coach(tx, 1, 1, "Sam Taylor").await;
    insert_offering(tx, 1, 1, "active").await;
    insert_schedule(tx, 1, 1, Some(1), 2, true).await;
    insert_child(tx, 1, 100, "Mia").await;
}
