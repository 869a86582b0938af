use futures::future;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::dates;
use crate::error::{CoreError, Result};
use crate::model::Money;
use crate::service::{deductions, orders, users};

/// One user's salary figure for one month.
#[derive(Debug, Clone, Serialize)]
pub struct SalaryStatement {
    pub salary: Money,
    pub approved_orders_count: i64,
    pub total_deductions: Money,
}

impl SalaryStatement {
    fn zero() -> Self {
        Self {
            salary: Money::ZERO,
            approved_orders_count: 0,
            total_deductions: Money::ZERO,
        }
    }
}

/// Organization-wide unpaid salary obligation for one month.
#[derive(Debug, Clone, Serialize)]
pub struct PayrollLiability {
    pub total_pending_salary: Money,
    pub month: String,
    pub user_count: usize,
}

/// Salary computation: approved order counts times the user's rate,
/// minus the month's deductions, clamped at zero.
#[derive(Clone)]
pub struct PayrollDesk {
    pool: SqlitePool,
}

impl PayrollDesk {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn monthly_salary(&self, user_id: i64, month_key: &str) -> Result<SalaryStatement> {
        let window = dates::month_window(month_key)?;
        let bounds = dates::month_bounds(month_key)?;

        // One transaction, so the order count and the deduction total are
        // read from a single snapshot.
        let mut tx = self.pool.begin().await?;

        let user = users::find_by_id(&mut *tx, user_id)
            .await?
            .ok_or(CoreError::UserNotFound(user_id))?;
        let Some(rate) = user.rate_per_order else {
            return Ok(SalaryStatement::zero());
        };

        let approved_orders_count = orders::approved_total_in(&mut *tx, user_id, window).await?;
        let total_deductions = deductions::total_in_bounds(&mut *tx, user_id, bounds).await?;
        tx.commit().await?;

        let gross = Decimal::from(approved_orders_count) * rate.0;
        let salary = (gross - total_deductions).max(Decimal::ZERO);

        Ok(SalaryStatement {
            salary: Money(salary),
            approved_orders_count,
            total_deductions: Money(total_deductions),
        })
    }

    /// Fans [`Self::monthly_salary`] out over every active user. The
    /// per-user figures are independent and computed concurrently. Any
    /// single failure fails the whole aggregation; a silently wrong
    /// liability figure is worse than an error.
    pub async fn pending_payroll(&self, month_key: &str) -> Result<PayrollLiability> {
        dates::parse_month_key(month_key)?;

        let members = users::active(&self.pool).await?;
        let user_count = members.len();

        let statements = future::try_join_all(
            members
                .iter()
                .map(|user| self.monthly_salary(user.id, month_key)),
        )
        .await?;

        let total: Decimal = statements.iter().map(|s| s.salary.0).sum();
        tracing::info!(month = month_key, user_count, "pending payroll aggregated");

        Ok(PayrollLiability {
            total_pending_salary: Money(total),
            month: month_key.to_string(),
            user_count,
        })
    }
}
