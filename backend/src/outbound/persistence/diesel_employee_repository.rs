//! PostgreSQL-backed `EmployeeRepository` using Diesel.
//!
//! Writers are serialised application-wide: [`DieselEmployeeRepository::within_transaction`]
//! holds the write half of a shared `RwLock` for the whole transaction body,
//! so generated identifiers and read-modify-write updates never interleave.
//! Reads skip the lock and run outside any transaction.
//!
//! Every round trip is bounded by the configured query timeout. Dropping the
//! returned future cancels the in-flight query; a connection abandoned
//! mid-transaction is discarded by the pool rather than reused.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::QueryResult;
use diesel_async::scoped_futures::{ScopedBoxFuture, ScopedFutureExt};
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use pagination::{Pagination, SortColumn, SortDirection};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{EmployeeDraft, EmployeeRepository, EmployeeRepositoryError};
use crate::domain::{Employee, EmployeeId};

use super::models::{EmployeeChanges, EmployeeRow, NewEmployeeRow};
use super::pool::{DbPool, PoolError};
use super::schema::employee;

/// Future returned by transaction bodies.
pub type TxFuture<'a, 'r, T> = ScopedBoxFuture<'a, 'r, QueryResult<T>>;

/// Default bound on a single database round trip.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Diesel-backed implementation of the `EmployeeRepository` port.
#[derive(Clone)]
pub struct DieselEmployeeRepository {
    pool: DbPool,
    write_lock: Arc<RwLock<()>>,
    query_timeout: Duration,
}

impl DieselEmployeeRepository {
    /// Create a repository with its own write lock.
    pub fn new(pool: DbPool) -> Self {
        Self::with_write_lock(pool, Arc::new(RwLock::new(())))
    }

    /// Create a repository sharing `write_lock` with other writers.
    pub fn with_write_lock(pool: DbPool, write_lock: Arc<RwLock<()>>) -> Self {
        Self {
            pool,
            write_lock,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Override the per-round-trip timeout.
    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    /// Run `body` inside a database transaction while holding the write lock.
    ///
    /// Commits when `body` succeeds and rolls back otherwise. The lock is
    /// released on every path, including cancellation.
    ///
    /// ```ignore
    /// let id = repo
    ///     .within_transaction(|mut tx| async move { tx.insert(&draft).await }.scope_boxed())
    ///     .await?;
    /// ```
    ///
    /// # Errors
    ///
    /// Connection, query or timeout errors from any step.
    pub async fn within_transaction<'a, T, F>(&self, body: F) -> Result<T, EmployeeRepositoryError>
    where
        F: for<'r> FnOnce(TxStore<'r>) -> TxFuture<'a, 'r, T> + Send + 'a,
        T: Send + 'a,
    {
        self.bounded(async {
            let _writer = self.write_lock.write().await;
            let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
            let conn: &mut AsyncPgConnection = &mut pooled;

            debug!("begin db transaction");
            let outcome = conn
                .transaction(move |conn| body(TxStore { conn }))
                .await;
            match &outcome {
                Ok(_) => debug!("commit db transaction"),
                Err(error) => debug!(%error, "rollback db transaction"),
            }
            outcome.map_err(map_diesel_error)
        })
        .await
    }

    async fn bounded<T, Fut>(&self, fut: Fut) -> Result<T, EmployeeRepositoryError>
    where
        Fut: Future<Output = Result<T, EmployeeRepositoryError>>,
    {
        tokio::time::timeout(self.query_timeout, fut)
            .await
            .unwrap_or_else(|_| Err(EmployeeRepositoryError::timeout(self.query_timeout.as_secs())))
    }
}

/// Repository operations bound to an open transaction.
pub struct TxStore<'c> {
    conn: &'c mut AsyncPgConnection,
}

impl TxStore<'_> {
    /// Run `body` on this transaction directly; no nested transaction or
    /// savepoint is opened.
    pub fn within_transaction<'a, 's, T, F>(&'s mut self, body: F) -> TxFuture<'a, 's, T>
    where
        F: for<'r> FnOnce(TxStore<'r>) -> TxFuture<'a, 'r, T>,
    {
        body(TxStore {
            conn: &mut *self.conn,
        })
    }

    /// Insert a row and read it back with its generated identifier.
    pub async fn insert(&mut self, draft: &EmployeeDraft) -> QueryResult<Employee> {
        diesel::insert_into(employee::table)
            .values(NewEmployeeRow::from(draft))
            .returning(EmployeeRow::as_returning())
            .get_result::<EmployeeRow>(&mut *self.conn)
            .await
            .map(Employee::from)
    }

    /// Fetch an active row inside the transaction.
    pub async fn find_active(&mut self, id: EmployeeId) -> QueryResult<Option<Employee>> {
        active_by_id(id)
            .first::<EmployeeRow>(&mut *self.conn)
            .await
            .optional()
            .map(|row| row.map(Employee::from))
    }

    /// Write mutable fields of an active row; returns whether a row matched.
    pub async fn update_active(&mut self, employee: &Employee) -> QueryResult<bool> {
        diesel::update(
            employee::table
                .filter(employee::id.eq(employee.id.get()))
                .filter(employee::deleted_on.is_null()),
        )
        .set(EmployeeChanges::from(employee))
        .execute(&mut *self.conn)
        .await
        .map(|affected| affected > 0)
    }

    /// Stamp `deleted_on` whatever the row's current state.
    pub async fn soft_delete(&mut self, id: EmployeeId, now: DateTime<Utc>) -> QueryResult<bool> {
        diesel::update(employee::table.find(id.get()))
            .set(employee::deleted_on.eq(Some(now)))
            .execute(&mut *self.conn)
            .await
            .map(|affected| affected > 0)
    }

    /// Clear `deleted_on` and stamp `updated_on`.
    pub async fn restore(&mut self, id: EmployeeId, now: DateTime<Utc>) -> QueryResult<bool> {
        diesel::update(employee::table.find(id.get()))
            .set((
                employee::deleted_on.eq(None::<DateTime<Utc>>),
                employee::updated_on.eq(now),
            ))
            .execute(&mut *self.conn)
            .await
            .map(|affected| affected > 0)
    }
}

fn active_by_id(id: EmployeeId) -> employee::BoxedQuery<'static, diesel::pg::Pg> {
    employee::table
        .filter(employee::id.eq(id.get()))
        .filter(employee::deleted_on.is_null())
        .into_boxed()
}

fn page_query(pagination: &Pagination) -> employee::BoxedQuery<'static, diesel::pg::Pg> {
    let query = employee::table
        .filter(employee::deleted_on.is_null())
        .into_boxed();
    let ordered = match (pagination.sort(), pagination.direction()) {
        (SortColumn::CreatedOn, SortDirection::Asc) => {
            query.order_by((employee::created_on.asc(), employee::id.asc()))
        }
        (SortColumn::CreatedOn, SortDirection::Desc) => {
            query.order_by((employee::created_on.desc(), employee::id.desc()))
        }
        (SortColumn::UpdatedOn, SortDirection::Asc) => {
            query.order_by((employee::updated_on.asc(), employee::id.asc()))
        }
        (SortColumn::UpdatedOn, SortDirection::Desc) => {
            query.order_by((employee::updated_on.desc(), employee::id.desc()))
        }
        (SortColumn::Id, SortDirection::Asc) => query.order_by(employee::id.asc()),
        (SortColumn::Id, SortDirection::Desc) => query.order_by(employee::id.desc()),
    };
    ordered
        .offset(i64::try_from(pagination.offset()).unwrap_or(i64::MAX))
        .limit(i64::try_from(pagination.limit()).unwrap_or(i64::MAX))
}

/// Map pool errors to repository errors.
fn map_pool_error(error: PoolError) -> EmployeeRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            EmployeeRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to repository errors.
fn map_diesel_error(error: diesel::result::Error) -> EmployeeRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            EmployeeRepositoryError::duplicate(info.constraint_name().unwrap_or("unique constraint"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            EmployeeRepositoryError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => EmployeeRepositoryError::query("database query error"),
        _ => EmployeeRepositoryError::query("database error"),
    }
}

#[async_trait]
impl EmployeeRepository for DieselEmployeeRepository {
    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee, EmployeeRepositoryError> {
        let draft = draft.clone();
        self.within_transaction(move |mut tx| async move { tx.insert(&draft).await }.scope_boxed())
            .await
    }

    async fn find_active(
        &self,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        self.bounded(async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            active_by_id(id)
                .first::<EmployeeRow>(&mut conn)
                .await
                .optional()
                .map(|row| row.map(Employee::from))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn query(
        &self,
        pagination: &Pagination,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        self.bounded(async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            page_query(pagination)
                .load::<EmployeeRow>(&mut conn)
                .await
                .map(|rows| rows.into_iter().map(Employee::from).collect())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn update(&self, employee: &Employee) -> Result<bool, EmployeeRepositoryError> {
        let employee = employee.clone();
        self.within_transaction(move |mut tx| {
            async move { tx.update_active(&employee).await }.scope_boxed()
        })
        .await
    }

    async fn soft_delete(
        &self,
        id: EmployeeId,
        now: DateTime<Utc>,
    ) -> Result<bool, EmployeeRepositoryError> {
        self.within_transaction(move |mut tx| async move { tx.soft_delete(id, now).await }.scope_boxed())
            .await
    }

    async fn restore(
        &self,
        id: EmployeeId,
        now: DateTime<Utc>,
    ) -> Result<bool, EmployeeRepositoryError> {
        self.within_transaction(move |mut tx| async move { tx.restore(id, now).await }.scope_boxed())
            .await
    }

    async fn status_check(&self) -> Result<(), EmployeeRepositoryError> {
        self.bounded(async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            diesel::select(diesel::dsl::sql::<diesel::sql_types::Bool>("true"))
                .get_result::<bool>(&mut conn)
                .await
                .map(drop)
                .map_err(map_diesel_error)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    //! Mapping tests that need no database; behaviour against PostgreSQL is
    //! covered by `tests/diesel_employee_repository.rs`.

    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    struct Info(&'static str);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("employee")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some("employee_pkey")
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info("boom")))
    }

    #[rstest]
    fn unique_violation_maps_to_duplicate() {
        let mapped = map_diesel_error(database_error(DatabaseErrorKind::UniqueViolation));
        assert_eq!(mapped, EmployeeRepositoryError::duplicate("employee_pkey"));
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        let mapped = map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection));
        assert!(matches!(mapped, EmployeeRepositoryError::Connection { .. }));
    }

    #[rstest]
    #[case(DieselError::NotFound)]
    #[case(DieselError::RollbackTransaction)]
    #[case(database_error(DatabaseErrorKind::ForeignKeyViolation))]
    fn other_failures_map_to_query(#[case] error: DieselError) {
        assert!(matches!(
            map_diesel_error(error),
            EmployeeRepositoryError::Query { .. }
        ));
    }

    #[rstest]
    fn pool_failures_map_to_connection() {
        let mapped = map_pool_error(PoolError::Checkout {
            message: "timed out".to_owned(),
        });
        assert_eq!(mapped, EmployeeRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn page_query_orders_with_id_tiebreak() {
        let pagination = Pagination::from_query("page=3&per_page=5&sort=updated&direction=asc");
        let sql = diesel::debug_query::<diesel::pg::Pg, _>(&page_query(&pagination)).to_string();

        assert!(sql.contains(r#""employee"."deleted_on" IS NULL"#), "{sql}");
        assert!(
            sql.contains(r#"ORDER BY "employee"."updated_on" ASC, "employee"."id" ASC"#),
            "{sql}"
        );
        assert!(sql.contains("LIMIT $1 OFFSET $2"), "{sql}");
        assert!(sql.contains("binds: [5, 10]"), "{sql}");
    }
}
