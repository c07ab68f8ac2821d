//! Driving port for employee mutations.
//!
//! Inbound adapters pass raw identifier strings; validating them is part of
//! the use case, so an `{id}` path segment of `"abc"` surfaces as
//! [`ErrorCode::InvalidId`](crate::domain::ErrorCode::InvalidId) rather than a
//! routing failure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Employee, Error, NewEmployee, UpdateEmployee};

/// Driving port for creating, updating, deleting and restoring employees.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeCommand: Send + Sync {
    /// Validate and store a new employee.
    ///
    /// # Errors
    /// Validation for a blank name, conflict for duplicates, internal for
    /// storage failures.
    async fn create(&self, new: NewEmployee, now: DateTime<Utc>) -> Result<Employee, Error>;

    /// Apply a partial update to an active employee.
    ///
    /// # Errors
    /// Invalid-id, not-found, or internal.
    async fn update(&self, id: &str, patch: UpdateEmployee, now: DateTime<Utc>)
    -> Result<(), Error>;

    /// Soft-delete an active employee.
    ///
    /// # Errors
    /// Invalid-id, not-found, or internal.
    async fn delete(&self, id: &str, now: DateTime<Utc>) -> Result<(), Error>;

    /// Restore an employee whether or not it is currently deleted.
    ///
    /// # Errors
    /// Invalid-id or internal.
    async fn undelete(&self, id: &str, now: DateTime<Utc>) -> Result<(), Error>;
}
