//! Port for employee persistence.
//!
//! Adapters own all SQL and transaction boundaries. Reads only ever see
//! active rows; `soft_delete` and `restore` address a row by id regardless of
//! its deletion state so a deleted row can be brought back.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Pagination, SortColumn, SortDirection};

use crate::domain::{Employee, EmployeeId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by employee repository adapters.
    pub enum EmployeeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "employee repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "employee repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Duplicate { message: String } =>
            "employee repository rejected duplicate: {message}",
        /// A round trip exceeded the configured deadline.
        Timeout { seconds: u64 } =>
            "employee repository timed out after {seconds}s",
    }
}

/// Persisted shape of an employee before storage assigns an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDraft {
    /// Trimmed, non-blank name.
    pub name: String,
    /// Trimmed position.
    pub position: String,
    /// Creation time.
    pub created_on: DateTime<Utc>,
    /// Equal to `created_on` on insert.
    pub updated_on: DateTime<Utc>,
}

/// Port for employee storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Insert a row and read back the stored record in one transaction.
    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee, EmployeeRepositoryError>;

    /// Fetch an active row by id.
    async fn find_active(
        &self,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError>;

    /// Page through active rows.
    async fn query(&self, pagination: &Pagination)
    -> Result<Vec<Employee>, EmployeeRepositoryError>;

    /// Persist the mutable fields and `updated_on` of an active row.
    ///
    /// Returns `false` when no active row matched.
    async fn update(&self, employee: &Employee) -> Result<bool, EmployeeRepositoryError>;

    /// Stamp `deleted_on`. Returns whether a row matched.
    async fn soft_delete(
        &self,
        id: EmployeeId,
        now: DateTime<Utc>,
    ) -> Result<bool, EmployeeRepositoryError>;

    /// Clear `deleted_on` and stamp `updated_on`. Returns whether a row matched.
    async fn restore(
        &self,
        id: EmployeeId,
        now: DateTime<Utc>,
    ) -> Result<bool, EmployeeRepositoryError>;

    /// Prove the backing store answers queries.
    async fn status_check(&self) -> Result<(), EmployeeRepositoryError>;
}

/// In-memory repository for tests and local wiring without a database.
///
/// Identifiers are assigned sequentially from 1. Ordering and paging follow
/// the same rules as the SQL adapter.
#[derive(Debug, Default)]
pub struct FixtureEmployeeRepository {
    rows: Mutex<BTreeMap<EmployeeId, Employee>>,
}

impl FixtureEmployeeRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored row, deleted ones included.
    pub fn snapshot(&self) -> Vec<Employee> {
        self.lock().values().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<EmployeeId, Employee>> {
        self.rows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn compare(a: &Employee, b: &Employee, pagination: &Pagination) -> std::cmp::Ordering {
    let primary = match pagination.sort() {
        SortColumn::CreatedOn => a.created_on.cmp(&b.created_on),
        SortColumn::UpdatedOn => a.updated_on.cmp(&b.updated_on),
        SortColumn::Id => std::cmp::Ordering::Equal,
    };
    let ordering = primary.then_with(|| a.id.cmp(&b.id));
    match pagination.direction() {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl EmployeeRepository for FixtureEmployeeRepository {
    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee, EmployeeRepositoryError> {
        let mut rows = self.lock();
        let next = rows.keys().next_back().map_or(1, |id| id.get() + 1);
        let employee = Employee {
            id: EmployeeId::new(next),
            name: draft.name.clone(),
            position: draft.position.clone(),
            created_on: draft.created_on,
            updated_on: draft.updated_on,
            deleted_on: None,
        };
        rows.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn find_active(
        &self,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        Ok(self.lock().get(&id).filter(|row| row.is_active()).cloned())
    }

    async fn query(
        &self,
        pagination: &Pagination,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        let mut active: Vec<Employee> = self
            .lock()
            .values()
            .filter(|row| row.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| compare(a, b, pagination));
        let skip = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);
        Ok(active.into_iter().skip(skip).take(take).collect())
    }

    async fn update(&self, employee: &Employee) -> Result<bool, EmployeeRepositoryError> {
        let mut rows = self.lock();
        match rows.get_mut(&employee.id).filter(|row| row.is_active()) {
            Some(row) => {
                row.name.clone_from(&employee.name);
                row.position.clone_from(&employee.position);
                row.updated_on = employee.updated_on;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(
        &self,
        id: EmployeeId,
        now: DateTime<Utc>,
    ) -> Result<bool, EmployeeRepositoryError> {
        Ok(self
            .lock()
            .get_mut(&id)
            .map(|row| row.deleted_on = Some(now))
            .is_some())
    }

    async fn restore(
        &self,
        id: EmployeeId,
        now: DateTime<Utc>,
    ) -> Result<bool, EmployeeRepositoryError> {
        Ok(self
            .lock()
            .get_mut(&id)
            .map(|row| {
                row.deleted_on = None;
                row.updated_on = now;
            })
            .is_some())
    }

    async fn status_check(&self) -> Result<(), EmployeeRepositoryError> {
        Ok(())
    }
}
