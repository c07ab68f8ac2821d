//! Driving ports for reading employees and probing storage health.

use async_trait::async_trait;
use pagination::Pagination;

use crate::domain::{Employee, Error};

/// Driving port for employee reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeQuery: Send + Sync {
    /// Page through active employees. An empty page is not an error.
    async fn query(&self, pagination: Pagination) -> Result<Vec<Employee>, Error>;

    /// Fetch one active employee.
    ///
    /// # Errors
    /// Invalid-id when `id` is not a positive integer, not-found when no active
    /// row matches.
    async fn query_by_id(&self, id: &str) -> Result<Employee, Error>;
}

/// Driving port backing the readiness probe.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Succeeds when every dependency needed to serve traffic responds.
    async fn check(&self) -> Result<(), Error>;
}

/// Probe that always reports ready.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReadinessProbe;

#[async_trait]
impl ReadinessProbe for FixtureReadinessProbe {
    async fn check(&self) -> Result<(), Error> {
        Ok(())
    }
}
