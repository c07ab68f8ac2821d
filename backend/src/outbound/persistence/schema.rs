//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Employee records. Rows are never removed; `deleted_on` marks them
    /// inactive.
    employee (id) {
        /// Primary key assigned by `BIGSERIAL`.
        id -> Int8,
        /// Display name.
        name -> Varchar,
        /// Job title, empty when unknown.
        position -> Varchar,
        /// Insert time.
        created_on -> Timestamptz,
        /// Last create, update or undelete.
        updated_on -> Timestamptz,
        /// Soft-delete marker; NULL while active.
        deleted_on -> Nullable<Timestamptz>,
    }
}
