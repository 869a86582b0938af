use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use crate::dates;
use crate::error::{CoreError, Result};
use crate::model::{Deduction, Money, SourceRole, Warning};
use crate::service::users;

/// Warnings are archived by the lazy sweep once they pass this age.
const STALE_AFTER_DAYS: i64 = 30;

/// Disciplinary warnings and the deductions they spawn.
#[derive(Clone)]
pub struct WarningDesk {
    pool: SqlitePool,
}

impl WarningDesk {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Issues a warning to an active user. When `deduction_amount` is
    /// present and positive, a linked deduction is written in the same
    /// transaction; an observer never sees one without the other.
    pub async fn issue(
        &self,
        source_user_id: i64,
        source_role: SourceRole,
        target_user_id: i64,
        reason: &str,
        note: Option<&str>,
        deduction_amount: Option<Decimal>,
    ) -> Result<(Warning, Option<Deduction>)> {
        if deduction_amount.is_some_and(|a| a.is_sign_negative()) {
            return Err(CoreError::InvalidAmount);
        }
        users::require_active(&self.pool, target_user_id).await?;

        // Zero means "warning only", same as absent.
        let linked_amount = deduction_amount.filter(|a| a > &Decimal::ZERO);
        let now = dates::now_millis();

        let mut tx = self.pool.begin().await?;

        let warning = sqlx::query_as::<_, Warning>(
            r#"
            INSERT INTO warnings (user_id, reason, note, source_role, source_user_id, deduction_amount, is_read, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?)
            RETURNING id, user_id, reason, note, source_role, source_user_id, deduction_amount, is_read, read_at, archived_at, created_at
            "#,
        )
        .bind(target_user_id)
        .bind(reason)
        .bind(note)
        .bind(source_role)
        .bind(source_user_id)
        .bind(linked_amount.map(Money))
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let deduction = match linked_amount {
            Some(amount) => {
                let deduction_reason = format!("Warning #{}: {}", warning.id, reason);
                let deduction = sqlx::query_as::<_, Deduction>(
                    r#"
                    INSERT INTO deductions (user_id, amount, reason, source_role, source_user_id, warning_id, created_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                    RETURNING id, user_id, amount, reason, source_role, source_user_id, warning_id, created_at
                    "#,
                )
                .bind(target_user_id)
                .bind(Money(amount))
                .bind(&deduction_reason)
                .bind(source_role)
                .bind(source_user_id)
                .bind(warning.id)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?;
                Some(deduction)
            }
            None => None,
        };

        tx.commit().await?;

        tracing::info!(
            target_user_id,
            warning_id = warning.id,
            with_deduction = deduction.is_some(),
            "warning issued"
        );
        Ok((warning, deduction))
    }

    /// Marks one of the user's own warnings as read. Marking an
    /// already-read warning is a no-op success; `read_at` keeps the
    /// instant of the first call.
    pub async fn mark_read(&self, user_id: i64, warning_id: i64) -> Result<Warning> {
        let updated = sqlx::query_as::<_, Warning>(
            r#"
            UPDATE warnings SET is_read = 1, read_at = ?
            WHERE id = ? AND user_id = ? AND is_read = 0
            RETURNING id, user_id, reason, note, source_role, source_user_id, deduction_amount, is_read, read_at, archived_at, created_at
            "#,
        )
        .bind(dates::now_millis())
        .bind(warning_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(warning) = updated {
            return Ok(warning);
        }

        // Already read, or not this user's warning.
        self.find_owned(user_id, warning_id)
            .await?
            .ok_or(CoreError::WarningNotFound(warning_id))
    }

    /// Archives every unarchived warning of the user older than 30 days.
    /// Runs inline on the read path; there is no background job.
    pub async fn sweep_stale(&self, user_id: i64, now: DateTime<Utc>) -> Result<u64> {
        let cutoff = (now - Duration::days(STALE_AFTER_DAYS)).timestamp_millis();
        let result = sqlx::query(
            "UPDATE warnings SET archived_at = ? \
             WHERE user_id = ? AND archived_at IS NULL AND created_at < ?",
        )
        .bind(now.timestamp_millis())
        .bind(user_id)
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        let archived = result.rows_affected();
        if archived > 0 {
            tracing::debug!(user_id, archived, "archived stale warnings");
        }
        Ok(archived)
    }

    /// Sweeps, then returns the user's unarchived warnings, newest
    /// first.
    pub async fn recent(&self, user_id: i64, now: DateTime<Utc>) -> Result<Vec<Warning>> {
        self.sweep_stale(user_id, now).await?;
        let warnings = sqlx::query_as::<_, Warning>(
            "SELECT id, user_id, reason, note, source_role, source_user_id, \
             deduction_amount, is_read, read_at, archived_at, created_at \
             FROM warnings WHERE user_id = ? AND archived_at IS NULL \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(warnings)
    }

    /// Full history, archived warnings included, newest first.
    pub async fn history(&self, user_id: i64) -> Result<Vec<Warning>> {
        let warnings = sqlx::query_as::<_, Warning>(
            "SELECT id, user_id, reason, note, source_role, source_user_id, \
             deduction_amount, is_read, read_at, archived_at, created_at \
             FROM warnings WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(warnings)
    }

    async fn find_owned(&self, user_id: i64, warning_id: i64) -> Result<Option<Warning>> {
        let warning = sqlx::query_as::<_, Warning>(
            "SELECT id, user_id, reason, note, source_role, source_user_id, \
             deduction_amount, is_read, read_at, archived_at, created_at \
             FROM warnings WHERE id = ? AND user_id = ?",
        )
        .bind(warning_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(warning)
    }
}
