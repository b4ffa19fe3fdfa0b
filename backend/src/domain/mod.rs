//! Domain primitives, ports, and the registration flow.
//!
//! Purpose: Define strongly typed registration entities and the use-cases
//! that operate on them. Adapters live in `inbound` and `outbound`; nothing
//! here knows about HTTP or SQL.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Registration / RegistrationToken: the persisted record and its key.
//! - RegistrationSubmission: validated contact details.
//! - AdminGate / AdminCredentials: shared-secret check for privileged calls.
//! - RegistrationService: command and query implementation over a store.

pub mod admin;
pub mod error;
pub mod ports;
pub mod registration;
pub mod registration_service;
pub mod trace_id;

pub use self::admin::{ADMIN_USERNAME, AdminCredentials, AdminCredentialsError, AdminGate};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::registration::{
    FieldViolation, PHONE_MIN_DIGITS, Registration, RegistrationSubmission, RegistrationToken,
    RegistrationValidationError, TOKEN_BYTES,
};
pub use self::registration_service::{RECENT_REGISTRATIONS_LIMIT, RegistrationService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use registration::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u64> {
///     Err(Error::unauthorized("nope"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
