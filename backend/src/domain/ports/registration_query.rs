//! Driving port for registration reads.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, Registration};

/// Admin dashboard summary: total count plus the newest registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatistics {
    /// Number of stored registrations.
    pub total: u64,
    /// Newest registrations first.
    pub recent: Vec<Registration>,
}

/// Read-only use-cases over stored registrations.
#[async_trait]
pub trait RegistrationQuery: Send + Sync {
    /// Resolve a presented visitor token.
    ///
    /// `Ok(None)` means the caller is not currently registered; it is never
    /// an error.
    async fn find_for_visitor(&self, token: &str) -> Result<Option<Registration>, Error>;

    /// Total count plus the newest registrations.
    async fn statistics(&self) -> Result<RegistrationStatistics, Error>;

    /// Every registration, unordered.
    async fn export(&self) -> Result<Vec<Registration>, Error>;
}
