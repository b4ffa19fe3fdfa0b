//! Registration flow implementing the command and query driving ports.
//!
//! The service owns the translation from store failures to caller-facing
//! errors. Backend detail goes to the logs only; the returned [`Error`]
//! messages are generic.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info};

use crate::domain::ports::{
    RegistrationCommand, RegistrationQuery, RegistrationStatistics, RegistrationStore,
    RegistrationStoreError,
};
use crate::domain::{Error, Registration, RegistrationSubmission, RegistrationToken};

/// Number of registrations shown on the admin dashboard.
pub const RECENT_REGISTRATIONS_LIMIT: usize = 10;

/// Registration use-cases over a [`RegistrationStore`].
#[derive(Clone)]
pub struct RegistrationService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> RegistrationService<S> {
    /// Create a service over `store`, stamping records with `clock`.
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use registration::domain::RegistrationService;
    /// use registration::domain::ports::InMemoryRegistrationStore;
    ///
    /// let service = RegistrationService::new(
    ///     Arc::new(InMemoryRegistrationStore::new()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

fn map_store_error(err: RegistrationStoreError, operation: &'static str) -> Error {
    match err {
        RegistrationStoreError::NotFound => Error::not_found("registration not found"),
        RegistrationStoreError::Conflict => {
            error!(operation, "registration token collision");
            Error::internal("failed to store registration")
        }
        RegistrationStoreError::Unavailable { message } => {
            error!(operation, %message, "registration store unavailable");
            Error::service_unavailable("registration store unavailable")
        }
    }
}

#[async_trait]
impl<S> RegistrationCommand for RegistrationService<S>
where
    S: RegistrationStore + 'static,
{
    async fn register(&self, submission: RegistrationSubmission) -> Result<Registration, Error> {
        let registration =
            Registration::new(RegistrationToken::generate(), submission, self.clock.utc());
        self.store
            .insert(&registration)
            .await
            .map_err(|err| map_store_error(err, "insert"))?;
        info!(created_at = %registration.created_at(), "registration stored");
        Ok(registration)
    }

    async fn delete(&self, token: &str) -> Result<(), Error> {
        self.store
            .delete_by_token(token)
            .await
            .map_err(|err| map_store_error(err, "delete_by_token"))?;
        info!("registration deleted");
        Ok(())
    }
}

#[async_trait]
impl<S> RegistrationQuery for RegistrationService<S>
where
    S: RegistrationStore + 'static,
{
    async fn find_for_visitor(&self, token: &str) -> Result<Option<Registration>, Error> {
        match self.store.find_by_token(token).await {
            Ok(registration) => Ok(Some(registration)),
            Err(RegistrationStoreError::NotFound) => {
                debug!("visitor token did not resolve to a registration");
                Ok(None)
            }
            Err(err) => Err(map_store_error(err, "find_by_token")),
        }
    }

    async fn statistics(&self) -> Result<RegistrationStatistics, Error> {
        let total = self
            .store
            .count()
            .await
            .map_err(|err| map_store_error(err, "count"))?;
        let recent = self
            .store
            .list_recent(RECENT_REGISTRATIONS_LIMIT)
            .await
            .map_err(|err| map_store_error(err, "list_recent"))?;
        Ok(RegistrationStatistics { total, recent })
    }

    async fn export(&self) -> Result<Vec<Registration>, Error> {
        self.store
            .list_all()
            .await
            .map_err(|err| map_store_error(err, "list_all"))
    }
}

#[cfg(test)]
mod tests;
