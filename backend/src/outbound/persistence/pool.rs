//! Async-safe connection pool for Diesel SQLite connections.
//!
//! SQLite connections are synchronous, so `diesel-async` wraps each one in a
//! [`SyncConnectionWrapper`] that runs queries on the blocking thread pool.
//! `bb8` manages the wrapped connections.
//!
//! # Design
//!
//! - Every pooled connection is set up with WAL journaling and a busy
//!   timeout so concurrent writers wait instead of failing immediately
//! - Pool checkout respects the configured timeout
//! - [`DbPool::close`] checkpoints the WAL and refuses further checkouts
//! - All errors are mapped to `PoolError` variants

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use diesel::{ConnectionError, ConnectionResult, SqliteConnection};
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, SimpleAsyncConnection};
use futures_util::future::BoxFuture;
use tracing::{debug, warn};

/// Pooled SQLite connection type used by every adapter.
pub type SqliteAsyncConnection = SyncConnectionWrapper<SqliteConnection>;

/// Applied to every new connection; a locked database is retried for 5s.
const CONNECTION_PRAGMAS: &str =
    "PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL; PRAGMA busy_timeout = 5000;";

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to check out a connection from the pool.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// Failed to build the connection pool.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },

    /// The pool was closed during shutdown.
    #[error("connection pool is closed")]
    Closed,
}

impl PoolError {
    /// Create a checkout error with the given message.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Create a build error with the given message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Configuration for the database connection pool.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use registration::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("registrations.db")
///     .with_max_size(8)
///     .with_connection_timeout(Duration::from_secs(2));
/// assert_eq!(config.database_url(), "registrations.db");
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Create a new configuration for the SQLite file at `database_url`.
    ///
    /// Uses sensible defaults:
    /// - `max_size`: 4 connections
    /// - `connection_timeout`: 30 seconds
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 4,
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// Create a configuration from a filesystem path.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Build` when the path is not valid UTF-8.
    pub fn from_path(path: &Path) -> Result<Self, PoolError> {
        path.to_str()
            .map(Self::new)
            .ok_or_else(|| PoolError::build("database path is not valid UTF-8"))
    }

    /// Set the maximum number of connections in the pool.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the connection checkout timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Get the database URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

fn establish_with_pragmas(url: &str) -> BoxFuture<'_, ConnectionResult<SqliteAsyncConnection>> {
    Box::pin(async move {
        let mut conn = SqliteAsyncConnection::establish(url).await?;
        conn.batch_execute(CONNECTION_PRAGMAS)
            .await
            .map_err(ConnectionError::CouldntSetupConfiguration)?;
        Ok(conn)
    })
}

fn manager_for(config: &PoolConfig) -> AsyncDieselConnectionManager<SqliteAsyncConnection> {
    let mut manager_config = ManagerConfig::<SqliteAsyncConnection>::default();
    manager_config.custom_setup = Box::new(establish_with_pragmas);
    AsyncDieselConnectionManager::new_with_config(config.database_url(), manager_config)
}

/// Async connection pool for SQLite via Diesel.
///
/// Cloning is cheap; every clone shares the same pool and closed flag.
///
/// # Example
///
/// ```ignore
/// let pool = DbPool::new(PoolConfig::new("registrations.db")).await?;
/// let mut conn = pool.get().await?;
/// // Use conn for Diesel operations...
/// ```
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<SqliteAsyncConnection>,
    closed: Arc<AtomicBool>,
}

impl DbPool {
    /// Create a new connection pool with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Build` if the pool cannot be constructed (e.g.,
    /// the database file cannot be opened).
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager_for(&config))
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        debug!(max_size = config.max_size, "sqlite pool ready");
        Ok(Self {
            inner: pool,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Closed` after [`DbPool::close`], or
    /// `PoolError::Checkout` if a connection cannot be obtained within the
    /// configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, SqliteAsyncConnection>, PoolError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PoolError::Closed);
        }
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }

    /// Whether [`DbPool::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Flush the WAL into the main database file and refuse new checkouts.
    ///
    /// Idempotent. Checkpoint failures are logged; the pool is closed either
    /// way.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        match self.inner.get().await {
            Ok(mut conn) => {
                if let Err(err) = conn.batch_execute("PRAGMA wal_checkpoint(TRUNCATE);").await {
                    warn!(error = %err, "wal checkpoint on close failed");
                }
            }
            Err(err) => warn!(error = %err, "no connection available for final checkpoint"),
        }
        debug!("sqlite pool closed");
    }
}
