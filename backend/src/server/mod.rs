//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};

use registration::Trace;
use registration::domain::RegistrationService;
use registration::domain::ports::{InMemoryRegistrationStore, RegistrationStore};
use registration::inbound::http::health::{HealthState, live, ready};
use registration::inbound::http::routes::api_scope;
use registration::inbound::http::state::HttpState;

#[cfg(debug_assertions)]
async fn openapi_json() -> actix_web::HttpResponse {
    use registration::doc::ApiDoc;
    use utoipa::OpenApi;

    actix_web::HttpResponse::Ok().json(ApiDoc::openapi())
}

fn service_state<S>(store: Arc<S>) -> HttpState
where
    S: RegistrationStore + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let service = Arc::new(RegistrationService::new(store, clock));
    HttpState::new(service.clone(), service)
}

/// Wire the registration service over the configured store.
///
/// Falls back to the in-memory store when no SQLite store is configured.
fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.store {
        Some(store) => service_state(Arc::new(store.clone())),
        None => service_state(Arc::new(InMemoryRegistrationStore::new())),
    }
    .with_cookie_secure(config.cookie_secure);

    let state = match &config.admin_gate {
        Some(gate) => state.with_admin_gate(gate.clone()),
        None => state,
    };
    web::Data::new(state)
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    admin_enabled: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        admin_enabled,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api_scope(admin_enabled))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.route("/api-docs/openapi.json", web::get().to(openapi_json));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] carrying the bind address, cookie
///   policy, admin gate, and optional SQLite store.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let admin_enabled = config.admin_enabled();
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            admin_enabled,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
