use chrono::NaiveDate;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::dates::{self, MonthWindow};
use crate::error::{CoreError, Result};
use crate::model::{OrderDecision, OrderStatus, OrderSubmission};

/// Per-user, per-day order submissions and their approval lifecycle.
///
/// PENDING ⇄ resubmit; PENDING → APPROVED (terminal); PENDING → REJECTED
/// → resubmit → PENDING. A decision is accepted while the record is not
/// yet approved; once APPROVED the record never changes again.
#[derive(Clone)]
pub struct OrderLedger {
    pool: SqlitePool,
}

impl OrderLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates today's submission, or overwrites it while it is still
    /// PENDING or REJECTED (a rejected submission can be resubmitted).
    /// The upsert is guarded by the (user_id, date) uniqueness
    /// constraint, so a race between two submits resolves to one row
    /// with last-writer-wins semantics.
    pub async fn submit(
        &self,
        user_id: i64,
        date_key: &str,
        submitted_count: u32,
    ) -> Result<OrderSubmission> {
        let date = dates::parse_date_key(date_key)?;
        let now = dates::now_millis();

        let result = sqlx::query(
            r#"
            INSERT INTO order_submissions (user_id, date, submitted_count, status, created_at, updated_at)
            VALUES (?, ?, ?, 'PENDING', ?, ?)
            ON CONFLICT (user_id, date) DO UPDATE SET
                submitted_count = excluded.submitted_count,
                approved_count = NULL,
                status = 'PENDING',
                updated_at = excluded.updated_at
            WHERE order_submissions.status <> 'APPROVED'
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(submitted_count as i64)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let record = self.find_by_day(user_id, date).await?;
        match record {
            // Zero rows touched: the conflict target is already approved.
            Some(existing) if result.rows_affected() == 0 => {
                Err(CoreError::OrderLocked(existing.id))
            }
            Some(record) => Ok(record),
            None => Err(CoreError::Database(sqlx::Error::RowNotFound)),
        }
    }

    /// Manager approval or rejection. APPROVE fixes `approved_count`;
    /// REJECT leaves it NULL so the employee can resubmit.
    pub async fn decide(
        &self,
        order_id: i64,
        action: OrderDecision,
        approved_count: Option<u32>,
    ) -> Result<OrderSubmission> {
        let existing = self
            .find_by_id(order_id)
            .await?
            .ok_or(CoreError::OrderNotFound(order_id))?;
        if existing.status == OrderStatus::Approved {
            return Err(CoreError::OrderLocked(order_id));
        }

        let now = dates::now_millis();
        let record = match action {
            OrderDecision::Approve => {
                let count = approved_count.ok_or(CoreError::InvalidApprovedCount)?;
                sqlx::query_as::<_, OrderSubmission>(
                    r#"
                    UPDATE order_submissions
                    SET status = 'APPROVED', approved_count = ?, updated_at = ?
                    WHERE id = ? AND status <> 'APPROVED'
                    RETURNING id, user_id, date, submitted_count, approved_count, status, created_at, updated_at
                    "#,
                )
                .bind(count as i64)
                .bind(now)
                .bind(order_id)
                .fetch_optional(&self.pool)
                .await?
                // Lost a race against another approval.
                .ok_or(CoreError::OrderLocked(order_id))?
            }
            OrderDecision::Reject => {
                sqlx::query_as::<_, OrderSubmission>(
                    r#"
                    UPDATE order_submissions
                    SET status = 'REJECTED', approved_count = NULL, updated_at = ?
                    WHERE id = ? AND status <> 'APPROVED'
                    RETURNING id, user_id, date, submitted_count, approved_count, status, created_at, updated_at
                    "#,
                )
                .bind(now)
                .bind(order_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(CoreError::OrderLocked(order_id))?
            }
        };

        tracing::info!(order_id, action = %action, "order decision recorded");
        Ok(record)
    }

    /// All of the user's submissions inside the month, oldest day first.
    pub async fn list_for_month(
        &self,
        user_id: i64,
        month_key: &str,
    ) -> Result<Vec<OrderSubmission>> {
        let MonthWindow { start, end } = dates::month_window(month_key)?;
        let records = sqlx::query_as::<_, OrderSubmission>(
            "SELECT id, user_id, date, submitted_count, approved_count, status, created_at, updated_at \
             FROM order_submissions WHERE user_id = ? AND date BETWEEN ? AND ? ORDER BY date",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn find_by_id(&self, order_id: i64) -> Result<Option<OrderSubmission>> {
        let record = sqlx::query_as::<_, OrderSubmission>(
            "SELECT id, user_id, date, submitted_count, approved_count, status, created_at, updated_at \
             FROM order_submissions WHERE id = ?",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn find_by_day(&self, user_id: i64, date: NaiveDate) -> Result<Option<OrderSubmission>> {
        let record = sqlx::query_as::<_, OrderSubmission>(
            "SELECT id, user_id, date, submitted_count, approved_count, status, created_at, updated_at \
             FROM order_submissions WHERE user_id = ? AND date = ?",
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }
}

/// Sum of `approved_count` over the user's APPROVED submissions inside
/// the day-key window. Runs on the caller's executor so the salary
/// engine can keep it inside one transaction.
pub(crate) async fn approved_total_in<'e, E>(
    executor: E,
    user_id: i64,
    window: MonthWindow,
) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let total: Option<i64> = sqlx::query_scalar(
        "SELECT SUM(approved_count) FROM order_submissions \
         WHERE user_id = ? AND status = 'APPROVED' AND date BETWEEN ? AND ?",
    )
    .bind(user_id)
    .bind(window.start)
    .bind(window.end)
    .fetch_one(executor)
    .await?;
    Ok(total.unwrap_or(0))
}
