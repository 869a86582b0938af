//! Read-only queries against the externally owned users table.

use sqlx::{Executor, Sqlite};

use crate::error::{CoreError, Result};
use crate::model::User;

pub(crate) async fn find_by_id<'e, E>(executor: E, user_id: i64) -> Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, rate_per_order, is_active, created_at FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;
    Ok(user)
}

/// The target of a disciplinary action must exist and still be active.
pub(crate) async fn require_active<'e, E>(executor: E, user_id: i64) -> Result<User>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = find_by_id(executor, user_id)
        .await?
        .ok_or(CoreError::UserNotFound(user_id))?;
    if !user.is_active {
        return Err(CoreError::UserInactive(user_id));
    }
    Ok(user)
}

pub(crate) async fn active<'e, E>(executor: E) -> Result<Vec<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let users = sqlx::query_as::<_, User>(
        "SELECT id, username, rate_per_order, is_active, created_at FROM users WHERE is_active = 1 ORDER BY id",
    )
    .fetch_all(executor)
    .await?;
    Ok(users)
}
