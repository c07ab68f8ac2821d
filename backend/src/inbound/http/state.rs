//! Shared HTTP adapter state.
//!
//! Employee handlers receive this state when their routes are registered, so
//! they only depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{EmployeeCommand, EmployeeQuery};

/// Dependency bundle for employee handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Mutating use cases.
    pub employees: Arc<dyn EmployeeCommand>,
    /// Read use cases.
    pub employees_query: Arc<dyn EmployeeQuery>,
}

impl HttpState {
    /// Bundle the employee ports.
    pub fn new(employees: Arc<dyn EmployeeCommand>, employees_query: Arc<dyn EmployeeQuery>) -> Self {
        Self {
            employees,
            employees_query,
        }
    }
}
