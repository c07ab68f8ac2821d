//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module; the domain only sees [`Employee`](crate::domain::Employee).
//! - Connections come from a shared `bb8` pool driven by `diesel-async`.
//! - Every Diesel or pool failure is mapped to
//!   [`EmployeeRepositoryError`](crate::domain::ports::EmployeeRepositoryError).
//!
//! # Example
//!
//! ```ignore
//! use employee_service::outbound::persistence::{DbPool, DieselEmployeeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/employees")).await?;
//! let repository = DieselEmployeeRepository::new(pool);
//! ```

mod diesel_employee_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_employee_repository::{
    DEFAULT_QUERY_TIMEOUT, DieselEmployeeRepository, TxFuture, TxStore,
};
pub use migrations::{
    MIGRATIONS, MigrationError, run_pending_migrations, run_pending_migrations_blocking,
};
pub use pool::{DbPool, PoolConfig, PoolError};
