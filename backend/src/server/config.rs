//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use registration::domain::AdminGate;
use registration::outbound::persistence::DieselRegistrationStore;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) admin_gate: Option<AdminGate>,
    pub(crate) store: Option<DieselRegistrationStore>,
}

impl ServerConfig {
    /// Construct a configuration with admin access disabled and the
    /// in-memory store.
    #[must_use]
    pub fn new(cookie_secure: bool, bind_addr: SocketAddr) -> Self {
        Self {
            cookie_secure,
            bind_addr,
            admin_gate: None,
            store: None,
        }
    }

    /// Enable the admin routes guarded by `gate`.
    #[must_use]
    pub fn with_admin_gate(mut self, gate: AdminGate) -> Self {
        self.admin_gate = Some(gate);
        self
    }

    /// Persist registrations in SQLite instead of process memory.
    #[must_use]
    pub fn with_store(mut self, store: DieselRegistrationStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by bootstrap tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Whether the admin routes will be mounted.
    #[must_use]
    pub fn admin_enabled(&self) -> bool {
        self.admin_gate.is_some()
    }
}
