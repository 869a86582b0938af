use serde::{Deserialize, Serialize};

use super::{Money, SourceRole};

/// Disciplinary warning. May own at most one deduction; when it does,
/// `deduction_amount` carries a denormalized copy of the amount for
/// display. `archived_at` is set by the lazy sweep once the warning is
/// older than 30 days.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Warning {
    pub id: i64,
    pub user_id: i64,
    pub reason: String,
    pub note: Option<String>,
    pub source_role: SourceRole,
    pub source_user_id: i64,
    pub deduction_amount: Option<Money>,
    pub is_read: bool,
    pub read_at: Option<i64>,
    pub archived_at: Option<i64>,
    pub created_at: i64,
}
