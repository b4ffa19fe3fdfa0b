//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header;
use actix_web::web;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use mockable::DefaultClock;

use crate::domain::ports::{InMemoryRegistrationStore, RegistrationStore};
use crate::domain::{AdminGate, RegistrationService};

use super::state::HttpState;

/// Admin secret used by test state.
pub const TEST_ADMIN_SECRET: &str = "correct horse battery staple";

/// Build HTTP state over `store` with admin access enabled and insecure
/// cookies so plain-HTTP test requests carry them.
pub fn state_with_store<S>(store: Arc<S>) -> web::Data<HttpState>
where
    S: RegistrationStore + 'static,
{
    let service = Arc::new(RegistrationService::new(store, Arc::new(DefaultClock)));
    let gate = AdminGate::new(TEST_ADMIN_SECRET).expect("non-blank test secret");
    web::Data::new(
        HttpState::new(service.clone(), service)
            .with_admin_gate(gate)
            .with_cookie_secure(false),
    )
}

/// [`state_with_store`] over a fresh in-memory store.
pub fn in_memory_state() -> web::Data<HttpState> {
    state_with_store(Arc::new(InMemoryRegistrationStore::new()))
}

/// `Authorization` header for the given Basic credentials.
pub fn basic_auth(username: &str, password: &str) -> (header::HeaderName, String) {
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    (header::AUTHORIZATION, format!("Basic {encoded}"))
}

/// `Authorization` header for the test admin.
pub fn admin_auth() -> (header::HeaderName, String) {
    basic_auth("admin", TEST_ADMIN_SECRET)
}
