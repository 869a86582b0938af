use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Role the issuing actor held when a warning or deduction was created.
/// The trust boundary for the actor itself sits upstream; the ledger only
/// records it.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum SourceRole {
    Admin,
    Manager,
}
