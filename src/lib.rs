//! Payroll ledger and approval-state core of the operations portal.
//!
//! Turns raw daily order submissions into auditable monthly salary
//! figures, tracks disciplinary warnings and the deductions they spawn,
//! and keeps the idempotent attendance register. The HTTP layer lives in
//! a separate crate and calls straight into [`Portal`]; this library
//! opens no ports and performs no I/O beyond its database handle.

pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod model;
pub mod service;

pub use config::Config;
pub use error::{CoreError, Result};

use sqlx::SqlitePool;

use service::{AttendanceRegister, DeductionBook, OrderLedger, PayrollDesk, WarningDesk};

/// Every core service over one shared pool. Built once per process and
/// handed to the transport layer; there are no ambient singletons.
#[derive(Clone)]
pub struct Portal {
    pub orders: OrderLedger,
    pub warnings: WarningDesk,
    pub deductions: DeductionBook,
    pub payroll: PayrollDesk,
    pub attendance: AttendanceRegister,
}

impl Portal {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            orders: OrderLedger::new(pool.clone()),
            warnings: WarningDesk::new(pool.clone()),
            deductions: DeductionBook::new(pool.clone()),
            payroll: PayrollDesk::new(pool.clone()),
            attendance: AttendanceRegister::new(pool),
        }
    }
}
