use serde::{Deserialize, Serialize};

use super::{Money, SourceRole};

/// Salary deduction. Immutable once created; it counts against the
/// calendar month containing `created_at`. `warning_id` back-references
/// the warning that spawned it, purely for traceability.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Deduction {
    pub id: i64,
    pub user_id: i64,
    pub amount: Money,
    pub reason: String,
    pub source_role: SourceRole,
    pub source_user_id: i64,
    pub warning_id: Option<i64>,
    pub created_at: i64,
}
