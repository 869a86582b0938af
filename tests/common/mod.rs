#![allow(dead_code)]

use std::str::FromStr;

use chrono::{Duration, TimeZone, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// In-memory database with the real schema. A single connection, so
/// every clone of the handle sees the same database.
pub async fn test_pool() -> SqlitePool {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("parse sqlite url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("open in-memory sqlite");

    portal_core::db::MIGRATOR
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

pub async fn seed_user(pool: &SqlitePool, username: &str, rate: Option<&str>, active: bool) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, rate_per_order, is_active, created_at) \
         VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(username)
    .bind(rate)
    .bind(active)
    .bind(Utc::now().timestamp_millis())
    .fetch_one(pool)
    .await
    .expect("seed user")
}

/// Inserts a deduction row directly so tests can control `created_at`,
/// which the services always stamp with the current instant.
pub async fn seed_deduction(pool: &SqlitePool, user_id: i64, amount: &str, created_at: i64) {
    sqlx::query(
        "INSERT INTO deductions (user_id, amount, reason, source_role, source_user_id, warning_id, created_at) \
         VALUES (?, ?, 'late delivery', 'ADMIN', 1, NULL, ?)",
    )
    .bind(user_id)
    .bind(amount)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("seed deduction");
}

/// Same, for warnings with a back-dated `created_at`.
pub async fn seed_warning(pool: &SqlitePool, user_id: i64, created_at: i64) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO warnings (user_id, reason, source_role, source_user_id, is_read, created_at) \
         VALUES (?, 'repeated no-show', 'MANAGER', 1, 0, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .expect("seed warning")
}

pub fn utc_millis(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
    millis: i64,
) -> i64 {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
        .timestamp_millis()
        + millis
}

pub fn days_ago(days: i64) -> i64 {
    (Utc::now() - Duration::days(days)).timestamp_millis()
}
