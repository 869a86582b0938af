pub mod attendance;
pub mod deductions;
pub mod orders;
pub mod payroll;
pub(crate) mod users;
pub mod warnings;

pub use attendance::AttendanceRegister;
pub use deductions::DeductionBook;
pub use orders::OrderLedger;
pub use payroll::{PayrollDesk, PayrollLiability, SalaryStatement};
pub use warnings::WarningDesk;
