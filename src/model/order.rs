use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
}

/// Manager action on a submission.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum OrderDecision {
    Approve,
    Reject,
}

/// One submission per (user, calendar day). `approved_count` is set only
/// when a manager approves; after that the record never changes again.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderSubmission {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub submitted_count: i64,
    pub approved_count: Option<i64>,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}
