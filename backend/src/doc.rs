//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: visitor, admin, and health endpoints from the inbound layer
//! - **Schemas**: registration records, the visitor view, statistics, and
//!   the error envelope
//! - **Security**: HTTP Basic authentication for the admin endpoints
//!
//! Debug builds serve the document at `/api-docs/openapi.json`.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::RegistrationStatistics;
use crate::domain::{Error, ErrorCode, Registration};
use crate::inbound::http::registrations::{RegistrationRequest, VisitorView};

/// Name of the admin security scheme referenced by admin paths.
pub const ADMIN_SECURITY_SCHEME: &str = "basicAuth";

/// Enrich the generated document with the admin Basic auth scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let mut basic = Http::new(HttpAuthScheme::Basic);
        basic.description = Some("Admin password; the username is always `admin`.".to_owned());
        components.add_security_scheme(ADMIN_SECURITY_SCHEME, SecurityScheme::Http(basic));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Registration backend API",
        description = "Self-service attendee registration with an admin dashboard."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::registrations::visitor_view,
        crate::inbound::http::registrations::register,
        crate::inbound::http::registrations::reset_session,
        crate::inbound::http::admin::statistics,
        crate::inbound::http::admin::export_csv,
        crate::inbound::http::admin::export_json,
        crate::inbound::http::admin::delete_registration,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Registration,
        RegistrationRequest,
        VisitorView,
        RegistrationStatistics,
        Error,
        ErrorCode
    )),
    tags(
        (name = "registration", description = "Visitor registration flow"),
        (name = "admin", description = "Credential-gated registration management"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
