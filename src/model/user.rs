use serde::{Deserialize, Serialize};

use super::Money;

/// Portal account. Owned by the account-management side; the payroll
/// core only ever reads it. A user without `rate_per_order` never
/// accrues salary.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub rate_per_order: Option<Money>,
    pub is_active: bool,
    pub created_at: i64,
}
