//! Shared Diesel error mapping for repositories with basic query semantics.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_pool_error_with<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// `NotFound` and query-builder failures map to query errors; only a closed
/// connection maps to a connection error. The underlying database message is
/// logged at debug level and never leaves the adapter.
pub(crate) fn map_diesel_error_with<E, Q, C>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
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
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::ports::UnitRepositoryError;

    #[rstest]
    fn pool_errors_map_to_connection() {
        let mapped: UnitRepositoryError = map_pool_error_with(
            PoolError::checkout("connection refused"),
            UnitRepositoryError::connection,
        );
        assert!(matches!(mapped, UnitRepositoryError::Connection { .. }));
        assert!(mapped.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query() {
        let mapped: UnitRepositoryError = map_diesel_error_with(
            diesel::result::Error::NotFound,
            UnitRepositoryError::query,
            UnitRepositoryError::connection,
        );
        assert!(matches!(mapped, UnitRepositoryError::Query { .. }));
        assert!(mapped.to_string().contains("record not found"));
    }
}
