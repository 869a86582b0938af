use thiserror::Error;

/// Failures surfaced by the payroll core. Everything except `Database`
/// and `Migrate` is caused by the caller's input and maps to a client
/// error upstream; storage failures propagate unchanged and are never
/// retried here.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid month key '{0}', expected YYYY-MM")]
    InvalidMonthKey(String),

    #[error("invalid date key '{0}', expected YYYY-MM-DD")]
    InvalidDateKey(String),

    #[error("user {0} not found")]
    UserNotFound(i64),

    #[error("user {0} is inactive")]
    UserInactive(i64),

    #[error("warning {0} not found")]
    WarningNotFound(i64),

    #[error("order submission {0} not found")]
    OrderNotFound(i64),

    #[error("order submission {0} is approved and can no longer change")]
    OrderLocked(i64),

    #[error("approval requires a non-negative approved count")]
    InvalidApprovedCount,

    #[error("amount must not be negative")]
    InvalidAmount,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl CoreError {
    /// True when the failure was caused by the request rather than the
    /// infrastructure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CoreError::Database(_) | CoreError::Migrate(_))
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
