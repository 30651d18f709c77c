//! Error handling utilities for repositories

use conv_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Map a foreign-key violation (missing parent row) to a domain error
pub fn map_fk_violation<F>(e: SqlxError, on_missing: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return on_missing();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Convert a batch of rows whose mapping can fail
pub fn try_map_all<M, E>(rows: Vec<M>) -> Result<Vec<E>, DomainError>
where
    E: TryFrom<M, Error = DomainError>,
{
    rows.into_iter().map(E::try_from).collect()
}

/// Raw ids of a slice of snowflakes, for `= ANY($1)` binds
pub fn raw_ids(ids: &[conv_core::value_objects::Snowflake]) -> Vec<i64> {
    ids.iter().map(|id| id.into_inner()).collect()
}

/// Insert error mapping for rows with both a uniqueness constraint and a parent row
pub fn map_insert_error<U, M>(e: SqlxError, on_unique: U, on_missing: M) -> DomainError
where
    U: FnOnce() -> DomainError,
    M: FnOnce() -> DomainError,
{
    let is_fk = e
        .as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation());
    if is_fk {
        on_missing()
    } else {
        map_unique_violation(e, on_unique)
    }
}
