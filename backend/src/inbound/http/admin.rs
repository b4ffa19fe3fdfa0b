//! Admin API handlers guarded by HTTP Basic credentials.
//!
//! ```text
//! GET /api/v1/admin/statistics
//! GET /api/v1/admin/registrations.csv
//! GET /api/v1/admin/registrations.json
//! DELETE /api/v1/admin/registrations/{token}
//! ```
//!
//! Every handler takes an [`AdminAuth`] extractor. Extraction runs before the
//! handler body, so a rejected request never reaches the store.

use actix_web::http::header::{self, HeaderMap};
use actix_web::{FromRequest, HttpRequest, HttpResponse, delete, dev::Payload, get, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures_util::future::{Ready, ready};
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::ports::RegistrationStatistics;
use crate::domain::{AdminCredentials, Error, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::export::registrations_to_csv;
use crate::inbound::http::state::HttpState;

/// Challenge sent with every `401` response.
pub const BASIC_CHALLENGE: &str = "Basic realm=\"registration-admin\"";

const CREDENTIALS_REQUIRED: &str = "admin credentials required";

/// Proof that the request carried valid admin credentials.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

fn parse_basic_credentials(headers: &HeaderMap) -> Result<AdminCredentials, Error> {
    let missing = || Error::unauthorized(CREDENTIALS_REQUIRED);
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(missing)?
        .to_str()
        .map_err(|_| missing())?;
    let (scheme, encoded) = value.trim().split_once(' ').ok_or_else(missing)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(missing());
    }
    let decoded = STANDARD.decode(encoded.trim()).map_err(|_| missing())?;
    let decoded = String::from_utf8(decoded).map_err(|_| missing())?;
    let (username, password) = decoded.split_once(':').ok_or_else(missing)?;
    AdminCredentials::try_from_parts(username, password).map_err(|_| missing())
}

fn authorise_request(req: &HttpRequest) -> Result<AdminAuth, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state missing"))?;
    let gate = state
        .admin
        .as_ref()
        .ok_or_else(|| Error::not_found("admin access is disabled"))?;
    let credentials = parse_basic_credentials(req.headers())?;
    gate.authorise(&credentials).inspect_err(|_| {
        warn!(path = req.path(), "admin credentials rejected");
    })?;
    Ok(AdminAuth)
}

impl FromRequest for AdminAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorise_request(req))
    }
}

/// Path parameters for registration deletion.
#[derive(Debug, Deserialize)]
pub struct RegistrationPath {
    /// Token of the registration to delete.
    pub token: String,
}

/// Registration count and the ten newest registrations.
#[utoipa::path(
    get,
    path = "/api/v1/admin/statistics",
    responses(
        (status = 200, description = "Registration statistics", body = RegistrationStatistics),
        (status = 401, description = "Missing or invalid admin credentials", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "getStatistics",
    security(("basicAuth" = []))
)]
#[get("/admin/statistics")]
pub async fn statistics(
    _auth: AdminAuth,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<RegistrationStatistics>> {
    let stats = state.registrations_query.statistics().await?;
    Ok(web::Json(stats))
}

/// Every registration as a CSV attachment.
#[utoipa::path(
    get,
    path = "/api/v1/admin/registrations.csv",
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv", body = String),
        (status = 401, description = "Missing or invalid admin credentials", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "exportRegistrationsCsv",
    security(("basicAuth" = []))
)]
#[get("/admin/registrations.csv")]
pub async fn export_csv(_auth: AdminAuth, state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let records = state.registrations_query.export().await?;
    let body = registrations_to_csv(&records)?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"registrations.csv\"",
        ))
        .body(body))
}

/// Every registration as a JSON array.
#[utoipa::path(
    get,
    path = "/api/v1/admin/registrations.json",
    responses(
        (status = 200, description = "JSON export", body = [Registration]),
        (status = 401, description = "Missing or invalid admin credentials", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "exportRegistrationsJson",
    security(("basicAuth" = []))
)]
#[get("/admin/registrations.json")]
pub async fn export_json(
    _auth: AdminAuth,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Registration>>> {
    let records = state.registrations_query.export().await?;
    Ok(web::Json(records))
}

/// Delete one registration by token.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/registrations/{token}",
    params(
        ("token" = String, Path, description = "Registration token")
    ),
    responses(
        (status = 204, description = "Registration deleted"),
        (status = 401, description = "Missing or invalid admin credentials", body = Error),
        (status = 404, description = "No registration carries this token", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "deleteRegistration",
    security(("basicAuth" = []))
)]
#[delete("/admin/registrations/{token}")]
pub async fn delete_registration(
    _auth: AdminAuth,
    state: web::Data<HttpState>,
    path: web::Path<RegistrationPath>,
) -> ApiResult<HttpResponse> {
    let RegistrationPath { token } = path.into_inner();
    state.registrations.delete(&token).await?;
    info!("admin deleted a registration");
    Ok(HttpResponse::NoContent().finish())
}
