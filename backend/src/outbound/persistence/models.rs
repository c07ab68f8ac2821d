//! Internal Diesel row structs for the `employee` table.
//!
//! These never leave the persistence layer; conversions to and from domain
//! types are spelled out field by field below.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::ports::EmployeeDraft;
use crate::domain::{Employee, EmployeeId};

use super::schema::employee;

/// Row struct for reading from the employee table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employee)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmployeeRow {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub deleted_on: Option<DateTime<Utc>>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: EmployeeId::new(row.id),
            name: row.name,
            position: row.position,
            created_on: row.created_on,
            updated_on: row.updated_on,
            deleted_on: row.deleted_on,
        }
    }
}

/// Insertable struct for new employee rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = employee)]
pub(crate) struct NewEmployeeRow<'a> {
    pub name: &'a str,
    pub position: &'a str,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

impl<'a> From<&'a EmployeeDraft> for NewEmployeeRow<'a> {
    fn from(draft: &'a EmployeeDraft) -> Self {
        Self {
            name: &draft.name,
            position: &draft.position,
            created_on: draft.created_on,
            updated_on: draft.updated_on,
        }
    }
}

/// Changeset applied by partial updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = employee)]
pub(crate) struct EmployeeChanges<'a> {
    pub name: &'a str,
    pub position: &'a str,
    pub updated_on: DateTime<Utc>,
}

impl<'a> From<&'a Employee> for EmployeeChanges<'a> {
    fn from(employee: &'a Employee) -> Self {
        Self {
            name: &employee.name,
            position: &employee.position,
            updated_on: employee.updated_on,
        }
    }
}
