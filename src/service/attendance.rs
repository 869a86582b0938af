use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::dates::{self, MonthWindow};
use crate::error::Result;
use crate::model::Attendance;

/// Daily presence marking, one record per (user, UTC calendar day).
#[derive(Clone)]
pub struct AttendanceRegister {
    pool: SqlitePool,
}

impl AttendanceRegister {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Idempotent: the first mark of the day wins, every later mark (or
    /// the loser of a race) gets the existing record back unchanged.
    pub async fn mark(&self, user_id: i64, now: DateTime<Utc>) -> Result<Attendance> {
        let date = now.date_naive();

        sqlx::query(
            "INSERT INTO attendance (user_id, date, marked_at, created_at) \
             VALUES (?, ?, ?, ?) ON CONFLICT (user_id, date) DO NOTHING",
        )
        .bind(user_id)
        .bind(date)
        .bind(now.timestamp_millis())
        .bind(dates::now_millis())
        .execute(&self.pool)
        .await?;

        let record = sqlx::query_as::<_, Attendance>(
            "SELECT id, user_id, date, marked_at, created_at \
             FROM attendance WHERE user_id = ? AND date = ?",
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    /// The user's presence records inside the month, oldest day first.
    pub async fn list_for_month(&self, user_id: i64, month_key: &str) -> Result<Vec<Attendance>> {
        let MonthWindow { start, end } = dates::month_window(month_key)?;
        let records = sqlx::query_as::<_, Attendance>(
            "SELECT id, user_id, date, marked_at, created_at \
             FROM attendance WHERE user_id = ? AND date BETWEEN ? AND ? ORDER BY date",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
