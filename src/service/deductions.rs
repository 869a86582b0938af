use rust_decimal::Decimal;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::dates::{self, MonthBounds};
use crate::error::{CoreError, Result};
use crate::model::{Deduction, Money, SourceRole};
use crate::service::users;

/// Standalone deductions and the monthly totals the salary engine
/// subtracts. Deductions spawned by warnings are written by
/// [`crate::service::WarningDesk::issue`] into the same table.
#[derive(Clone)]
pub struct DeductionBook {
    pool: SqlitePool,
}

impl DeductionBook {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Deduction not tied to any warning.
    pub async fn create(
        &self,
        source_user_id: i64,
        source_role: SourceRole,
        target_user_id: i64,
        reason: &str,
        amount: Decimal,
    ) -> Result<Deduction> {
        if amount.is_sign_negative() {
            return Err(CoreError::InvalidAmount);
        }
        users::require_active(&self.pool, target_user_id).await?;

        let deduction = sqlx::query_as::<_, Deduction>(
            r#"
            INSERT INTO deductions (user_id, amount, reason, source_role, source_user_id, warning_id, created_at)
            VALUES (?, ?, ?, ?, ?, NULL, ?)
            RETURNING id, user_id, amount, reason, source_role, source_user_id, warning_id, created_at
            "#,
        )
        .bind(target_user_id)
        .bind(Money(amount))
        .bind(reason)
        .bind(source_role)
        .bind(source_user_id)
        .bind(dates::now_millis())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            target_user_id,
            deduction_id = deduction.id,
            amount = %deduction.amount,
            "deduction recorded"
        );
        Ok(deduction)
    }

    /// Exact-decimal total of the user's deductions whose `created_at`
    /// falls inside the month's absolute UTC bounds. Membership is by
    /// creation instant, not by any "effective month": a deduction
    /// entered on the last UTC millisecond of a month counts toward that
    /// month only.
    pub async fn monthly_total(&self, user_id: i64, month_key: &str) -> Result<Decimal> {
        let bounds = dates::month_bounds(month_key)?;
        total_in_bounds(&self.pool, user_id, bounds).await
    }

    /// The rows behind [`Self::monthly_total`], oldest first.
    pub async fn list_for_month(&self, user_id: i64, month_key: &str) -> Result<Vec<Deduction>> {
        let bounds = dates::month_bounds(month_key)?;
        let deductions = sqlx::query_as::<_, Deduction>(
            "SELECT id, user_id, amount, reason, source_role, source_user_id, warning_id, created_at \
             FROM deductions WHERE user_id = ? AND created_at BETWEEN ? AND ? ORDER BY created_at, id",
        )
        .bind(user_id)
        .bind(bounds.start.timestamp_millis())
        .bind(bounds.end.timestamp_millis())
        .fetch_all(&self.pool)
        .await?;
        Ok(deductions)
    }
}

/// Sum on the caller's executor so the salary engine can read orders and
/// deductions from one snapshot. SQLite SUM over TEXT amounts would go
/// through floats, so the rows are summed here instead.
pub(crate) async fn total_in_bounds<'e, E>(
    executor: E,
    user_id: i64,
    bounds: MonthBounds,
) -> Result<Decimal>
where
    E: Executor<'e, Database = Sqlite>,
{
    let amounts: Vec<Money> = sqlx::query_scalar(
        "SELECT amount FROM deductions WHERE user_id = ? AND created_at BETWEEN ? AND ?",
    )
    .bind(user_id)
    .bind(bounds.start.timestamp_millis())
    .bind(bounds.end.timestamp_millis())
    .fetch_all(executor)
    .await?;
    Ok(amounts.into_iter().map(|m| m.0).sum())
}
