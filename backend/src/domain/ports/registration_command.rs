//! Driving port for registration mutations.
//!
//! Inbound adapters call this port to register a visitor or remove a
//! registration without importing any persistence concern.

use async_trait::async_trait;

use crate::domain::{Error, Registration, RegistrationSubmission};

/// Use-cases that create or destroy registrations.
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Mint a token, stamp the creation time, and persist the submission.
    async fn register(&self, submission: RegistrationSubmission) -> Result<Registration, Error>;

    /// Delete the registration carrying `token`.
    ///
    /// A miss is reported as [`crate::domain::ErrorCode::NotFound`].
    async fn delete(&self, token: &str) -> Result<(), Error>;
}
