//! Month and day key handling. Every piece of calendar arithmetic in the
//! crate goes through here and is done in UTC, so day-key windows and
//! timestamp bounds always agree on the same calendar month no matter
//! what timezone the host runs in.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{CoreError, Result};

/// Inclusive first/last calendar day of a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Absolute UTC bounds of a month, `[00:00:00.000, 23:59:59.999]`,
/// for querying timestamp-indexed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBounds {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Strict `YYYY-MM` with month in 1..=12.
pub fn parse_month_key(month_key: &str) -> Result<(i32, u32)> {
    let invalid = || CoreError::InvalidMonthKey(month_key.to_string());

    let (year, month) = month_key.split_once('-').ok_or_else(invalid)?;
    if year.len() != 4
        || month.len() != 2
        || !year.bytes().all(|b| b.is_ascii_digit())
        || !month.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

pub fn month_window(month_key: &str) -> Result<MonthWindow> {
    let (year, month) = parse_month_key(month_key)?;
    let invalid = || CoreError::InvalidMonthKey(month_key.to_string());

    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    // Last calendar day: the day before day 1 of the following month.
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(invalid)?;

    Ok(MonthWindow { start, end })
}

pub fn month_bounds(month_key: &str) -> Result<MonthBounds> {
    let MonthWindow { start, end } = month_window(month_key)?;
    let invalid = || CoreError::InvalidMonthKey(month_key.to_string());

    let start = start.and_hms_milli_opt(0, 0, 0, 0).ok_or_else(invalid)?;
    let end = end.and_hms_milli_opt(23, 59, 59, 999).ok_or_else(invalid)?;

    Ok(MonthBounds {
        start: start.and_utc(),
        end: end.and_utc(),
    })
}

/// Strict `YYYY-MM-DD`.
pub fn parse_date_key(date_key: &str) -> Result<NaiveDate> {
    if date_key.len() != 10 {
        return Err(CoreError::InvalidDateKey(date_key.to_string()));
    }
    NaiveDate::parse_from_str(date_key, "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidDateKey(date_key.to_string()))
}

/// Storage timestamp, UTC epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
