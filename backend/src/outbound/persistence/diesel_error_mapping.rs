//! Shared Diesel error mapping for the repository adapters.
//!
//! Constraint violations keep their identity so services can distinguish
//! a uniqueness race from a dependent row blocking a delete; everything
//! else collapses into query or connection failures.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error
/// constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors into the owning port's error constructors.
///
/// `DatabaseErrorInformation::message` carries the server's constraint
/// detail; it is forwarded verbatim for unique and foreign-key
/// violations so the caller can name the offending constraint.
pub(crate) fn map_diesel_error<E, Q, C, D, F>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
    duplicate: D,
    foreign_key: F,
) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
    D: FnOnce(String) -> E,
    F: FnOnce(String) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => query("database query error".to_owned()),
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::UniqueViolation => duplicate(info.message().to_owned()),
            DatabaseErrorKind::ForeignKeyViolation => foreign_key(info.message().to_owned()),
            DatabaseErrorKind::ClosedConnection => {
                connection("database connection error".to_owned())
            }
            _ => query("database error".to_owned()),
        },
        _ => query("database error".to_owned()),
    }
}
