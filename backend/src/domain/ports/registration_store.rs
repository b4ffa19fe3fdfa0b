//! Driven port for registration persistence and its in-memory adapter.
//!
//! The store contract is exactly six access patterns: insert, lookup by
//! token, delete by token, unordered scan, most-recent scan, and count.
//! Nothing richer is offered so every adapter can be reasoned about the same
//! way.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::Registration;

use super::define_port_error;

define_port_error! {
    /// Failures reported by registration store adapters.
    pub enum RegistrationStoreError {
        /// No record carries the requested token.
        NotFound => "registration not found",
        /// A record with the same token already exists.
        Conflict => "registration token already exists",
        /// The backing storage could not complete the operation.
        Unavailable { message: String } => "registration store unavailable: {message}",
    }
}

/// Durable collection of [`Registration`] records keyed by token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Persist a new record.
    ///
    /// Fails with [`RegistrationStoreError::Conflict`] when the token is
    /// already taken; the existing record is left untouched.
    async fn insert(&self, registration: &Registration) -> Result<(), RegistrationStoreError>;

    /// Resolve a token to its record.
    ///
    /// Any string is accepted; malformed tokens are an ordinary
    /// [`RegistrationStoreError::NotFound`].
    async fn find_by_token(&self, token: &str) -> Result<Registration, RegistrationStoreError>;

    /// Remove the record carrying `token`.
    ///
    /// Not idempotent: deleting an absent token reports
    /// [`RegistrationStoreError::NotFound`].
    async fn delete_by_token(&self, token: &str) -> Result<(), RegistrationStoreError>;

    /// Every stored record, in no particular order.
    async fn list_all(&self) -> Result<Vec<Registration>, RegistrationStoreError>;

    /// Up to `limit` records, newest first; ties go to the later insert.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Registration>, RegistrationStoreError>;

    /// Number of stored records, computed on every call.
    async fn count(&self) -> Result<u64, RegistrationStoreError>;
}

/// Process-local store with the same contract as the SQLite adapter.
///
/// Records are kept in insertion order, which doubles as the tie-break for
/// [`RegistrationStore::list_recent`].
#[derive(Debug, Default)]
pub struct InMemoryRegistrationStore {
    records: Mutex<Vec<Registration>>,
}

impl InMemoryRegistrationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_records<T>(
        &self,
        f: impl FnOnce(&mut Vec<Registration>) -> Result<T, RegistrationStoreError>,
    ) -> Result<T, RegistrationStoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| RegistrationStoreError::unavailable("in-memory store lock poisoned"))?;
        f(&mut records)
    }
}

#[async_trait]
impl RegistrationStore for InMemoryRegistrationStore {
    async fn insert(&self, registration: &Registration) -> Result<(), RegistrationStoreError> {
        self.with_records(|records| {
            if records.iter().any(|r| r.token() == registration.token()) {
                return Err(RegistrationStoreError::conflict());
            }
            records.push(registration.clone());
            Ok(())
        })
    }

    async fn find_by_token(&self, token: &str) -> Result<Registration, RegistrationStoreError> {
        self.with_records(|records| {
            records
                .iter()
                .find(|r| r.token().as_ref() == token)
                .cloned()
                .ok_or_else(RegistrationStoreError::not_found)
        })
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), RegistrationStoreError> {
        self.with_records(|records| {
            let position = records
                .iter()
                .position(|r| r.token().as_ref() == token)
                .ok_or_else(RegistrationStoreError::not_found)?;
            records.remove(position);
            Ok(())
        })
    }

    async fn list_all(&self) -> Result<Vec<Registration>, RegistrationStoreError> {
        self.with_records(|records| Ok(records.clone()))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Registration>, RegistrationStoreError> {
        self.with_records(|records| {
            let mut indexed: Vec<(usize, &Registration)> = records.iter().enumerate().collect();
            indexed.sort_by(|(ia, a), (ib, b)| {
                b.created_at()
                    .cmp(&a.created_at())
                    .then_with(|| ib.cmp(ia))
            });
            Ok(indexed
                .into_iter()
                .take(limit)
                .map(|(_, r)| r.clone())
                .collect())
        })
    }

    async fn count(&self) -> Result<u64, RegistrationStoreError> {
        self.with_records(|records| {
            u64::try_from(records.len())
                .map_err(|_| RegistrationStoreError::unavailable("record count overflow"))
        })
    }
}
