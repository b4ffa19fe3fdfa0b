//! Service configuration loaded via OrthoConfig.
//!
//! Values layer as defaults, then a config file, then `REGISTRATION_*`
//! environment variables, then CLI flags. [`RegistrationSettings`] is the raw
//! shape; callers go through the accessors, which apply defaults and reject
//! unusable combinations.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_DATABASE_PATH: &str = "registrations.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 4;

/// Errors raised when settings cannot describe a runnable server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Admin routes were enabled without a usable secret.
    #[error("admin access is enabled but no admin password is configured")]
    MissingAdminPassword,
    /// The bind host is not an IP address.
    #[error("invalid bind host {host:?}: {message}")]
    InvalidHost {
        /// Host as configured.
        host: String,
        /// Parser message.
        message: String,
    },
    /// A pool of zero connections cannot serve requests.
    #[error("pool size must be at least 1")]
    EmptyPool,
}

/// Configuration values for the registration service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REGISTRATION")]
pub struct RegistrationSettings {
    /// SQLite database file.
    pub database_path: Option<PathBuf>,
    /// Keep registrations in process memory instead of SQLite.
    ///
    /// Boolean settings stay out of the CLI layer: an absent clap `SetTrue`
    /// flag reads as `false` and would mask environment and file values.
    #[ortho_config(default = false, skip_cli)]
    pub in_memory: bool,
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Mount the admin routes.
    #[ortho_config(default = false, skip_cli)]
    pub admin_enabled: bool,
    /// Shared admin secret.
    pub admin_password: Option<String>,
    /// Set the `Secure` attribute on the visitor cookie.
    #[ortho_config(skip_cli)]
    pub cookie_secure: Option<bool>,
    /// Maximum pooled SQLite connections.
    pub pool_size: Option<u32>,
}

impl RegistrationSettings {
    /// Return the configured database path, falling back to the default.
    pub fn database_path(&self) -> &Path {
        self.database_path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_DATABASE_PATH))
    }

    /// Resolve host and port into a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::InvalidHost {
                host: host.to_owned(),
                message: err.to_string(),
            }
        })?;
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }

    /// Admin secret when admin routes are enabled, `None` when disabled.
    pub fn admin_secret(&self) -> Result<Option<&str>, SettingsError> {
        if !self.admin_enabled {
            return Ok(None);
        }
        match self.admin_password.as_deref() {
            Some(secret) if !secret.trim().is_empty() => Ok(Some(secret)),
            _ => Err(SettingsError::MissingAdminPassword),
        }
    }

    /// Whether the visitor cookie is marked `Secure`.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// Maximum pooled connections.
    pub fn pool_size(&self) -> Result<u32, SettingsError> {
        match self.pool_size.unwrap_or(DEFAULT_POOL_SIZE) {
            0 => Err(SettingsError::EmptyPool),
            size => Ok(size),
        }
    }
}
