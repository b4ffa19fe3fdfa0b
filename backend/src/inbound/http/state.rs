//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::AdminGate;
use crate::domain::ports::{RegistrationCommand, RegistrationQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Register and delete use-cases.
    pub registrations: Arc<dyn RegistrationCommand>,
    /// Visitor lookup, statistics, and export use-cases.
    pub registrations_query: Arc<dyn RegistrationQuery>,
    /// Present only when admin access is enabled.
    pub admin: Option<AdminGate>,
    /// Whether the visitor cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
}

impl HttpState {
    /// Construct state from the registration ports with admin access
    /// disabled and secure cookies.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use registration::domain::RegistrationService;
    /// use registration::domain::ports::InMemoryRegistrationStore;
    /// use registration::inbound::http::state::HttpState;
    ///
    /// let service = Arc::new(RegistrationService::new(
    ///     Arc::new(InMemoryRegistrationStore::new()),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(service.clone(), service);
    /// assert!(state.admin.is_none());
    /// ```
    pub fn new(
        registrations: Arc<dyn RegistrationCommand>,
        registrations_query: Arc<dyn RegistrationQuery>,
    ) -> Self {
        Self {
            registrations,
            registrations_query,
            admin: None,
            cookie_secure: true,
        }
    }

    /// Enable admin routes guarded by `gate`.
    #[must_use]
    pub fn with_admin_gate(mut self, gate: AdminGate) -> Self {
        self.admin = Some(gate);
        self
    }

    /// Override the `Secure` cookie attribute (disable for plain-HTTP
    /// development only).
    #[must_use]
    pub fn with_cookie_secure(mut self, cookie_secure: bool) -> Self {
        self.cookie_secure = cookie_secure;
        self
    }
}
