//! Diesel and pool error mapping into registration store errors.

use tracing::debug;

use crate::domain::ports::RegistrationStoreError;

use super::pool::PoolError;

/// Map pool errors; every pool failure means the store cannot serve.
pub fn map_pool_error(error: PoolError) -> RegistrationStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RegistrationStoreError::unavailable(message)
        }
        PoolError::Closed => RegistrationStoreError::unavailable("connection pool is closed"),
    }
}

/// Map Diesel errors for `operation`.
///
/// A primary-key collision is a [`RegistrationStoreError::Conflict`] and a
/// missing row is [`RegistrationStoreError::NotFound`]; anything else is
/// reported as unavailable with the backend message attached.
pub fn map_diesel_error(
    error: diesel::result::Error,
    operation: &'static str,
) -> RegistrationStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
        }
        _ => debug!(%error, operation, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => RegistrationStoreError::not_found(),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            RegistrationStoreError::conflict()
        }
        other => RegistrationStoreError::unavailable(format!("{operation}: {other}")),
    }
}
