use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One presence record per (user, UTC calendar day). `marked_at` is the
/// first mark of the day; later marks never touch it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attendance {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub marked_at: i64,
    pub created_at: i64,
}
