//! Domain primitives, services and ports.
//!
//! Public surface:
//! - `Employee`, `NewEmployee`, `UpdateEmployee`, `EmployeeId`: the employee
//!   aggregate and its input payloads.
//! - `Error` / `ErrorCode`: transport-agnostic failures.
//! - `InputValidator`: field and identifier rules.
//! - `EmployeeService`: implementation of the driving ports in [`ports`].

pub mod employee;
pub mod employee_service;
pub mod error;
pub mod ports;
pub mod validation;

pub use self::employee::{Employee, EmployeeId, NewEmployee, UpdateEmployee};
pub use self::employee_service::{EmployeeService, NOT_FOUND_MESSAGE};
pub use self::error::{Error, ErrorCode, FieldErrors};
pub use self::validation::{INVALID_ID_MESSAGE, IdRuleViolation, InputValidator};
