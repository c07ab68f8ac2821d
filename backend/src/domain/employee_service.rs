//! Employee domain service.
//!
//! Implements the driving ports on top of an [`EmployeeRepository`]. The
//! service validates input, stamps timestamps and turns repository outcomes
//! into domain errors. It never logs; the HTTP error middleware is the single
//! place failures are reported.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::Pagination;

use crate::domain::ports::{
    EmployeeCommand, EmployeeDraft, EmployeeQuery, EmployeeRepository, EmployeeRepositoryError,
    ReadinessProbe,
};
use crate::domain::{Employee, Error, InputValidator, NewEmployee, UpdateEmployee};

/// Message for lookups that match no active row.
pub const NOT_FOUND_MESSAGE: &str = "employee not found";

/// Employee service implementing the driving ports.
#[derive(Clone)]
pub struct EmployeeService<R> {
    repository: Arc<R>,
    validator: InputValidator,
}

impl<R> EmployeeService<R> {
    /// Create a service over the given repository and validator.
    pub fn new(repository: Arc<R>, validator: InputValidator) -> Self {
        Self {
            repository,
            validator,
        }
    }
}

impl<R> EmployeeService<R>
where
    R: EmployeeRepository,
{
    fn map_repository_error(error: EmployeeRepositoryError) -> Error {
        match error {
            EmployeeRepositoryError::Duplicate { message } => {
                Error::conflict(format!("employee already exists: {message}"))
            }
            other => Error::internal(other.to_string()),
        }
    }

    async fn load_active(&self, id: &str) -> Result<Employee, Error> {
        let id = self.validator.check_id(id)?;
        self.repository
            .find_active(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND_MESSAGE))
    }
}

#[async_trait]
impl<R> EmployeeCommand for EmployeeService<R>
where
    R: EmployeeRepository,
{
    async fn create(&self, new: NewEmployee, now: DateTime<Utc>) -> Result<Employee, Error> {
        self.validator.validate(&new)?;
        let NewEmployee { name, position } = new.trimmed();
        let draft = EmployeeDraft {
            name,
            position,
            created_on: now,
            updated_on: now,
        };
        self.repository
            .create(&draft)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn update(
        &self,
        id: &str,
        patch: UpdateEmployee,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        self.validator.validate(&patch)?;
        let mut employee = self.load_active(id).await?;
        if !patch.apply_to(&mut employee) {
            return Ok(());
        }
        employee.updated_on = now;

        let matched = self
            .repository
            .update(&employee)
            .await
            .map_err(Self::map_repository_error)?;
        if matched {
            Ok(())
        } else {
            Err(Error::not_found(NOT_FOUND_MESSAGE))
        }
    }

    async fn delete(&self, id: &str, now: DateTime<Utc>) -> Result<(), Error> {
        let employee = self.load_active(id).await?;
        self.repository
            .soft_delete(employee.id, now)
            .await
            .map(drop)
            .map_err(Self::map_repository_error)
    }

    async fn undelete(&self, id: &str, now: DateTime<Utc>) -> Result<(), Error> {
        let id = self.validator.check_id(id)?;
        self.repository
            .restore(id, now)
            .await
            .map(drop)
            .map_err(Self::map_repository_error)
    }
}

#[async_trait]
impl<R> EmployeeQuery for EmployeeService<R>
where
    R: EmployeeRepository,
{
    async fn query(&self, pagination: Pagination) -> Result<Vec<Employee>, Error> {
        self.repository
            .query(&pagination)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn query_by_id(&self, id: &str) -> Result<Employee, Error> {
        self.load_active(id).await
    }
}

#[async_trait]
impl<R> ReadinessProbe for EmployeeService<R>
where
    R: EmployeeRepository,
{
    async fn check(&self) -> Result<(), Error> {
        self.repository
            .status_check()
            .await
            .map_err(|err| Error::internal(err.to_string()))
    }
}

#[cfg(test)]
#[path = "employee_service_tests.rs"]
mod tests;
