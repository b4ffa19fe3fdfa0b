//! Visitor registration handlers.
//!
//! ```text
//! GET /api/v1/registration
//! POST /api/v1/registrations {"firstName":"Ada","lastName":"Lovelace","email":"ada@example.org","phone":"+44 20 7946 0000"}
//! POST /api/v1/session/reset
//! ```
//!
//! A visitor who registers gets a cookie holding their token. Presenting it
//! later returns the confirmation view; a token that no longer resolves is
//! cleared and the visitor sees the form again.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{Error, Registration, RegistrationSubmission, RegistrationValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{SessionCredential, issue_cookie, removal_cookie};
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/registrations`.
///
/// Missing fields deserialise as empty strings so they surface as validation
/// violations rather than a malformed body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrationRequest {
    /// First name, trimmed before validation.
    #[schema(example = "Ada")]
    pub first_name: String,
    /// Last name.
    #[schema(example = "Lovelace")]
    pub last_name: String,
    /// Contact email.
    #[schema(example = "ada@example.org")]
    pub email: String,
    /// Contact phone number.
    #[schema(example = "+44 20 7946 0000")]
    pub phone: String,
}

impl TryFrom<RegistrationRequest> for RegistrationSubmission {
    type Error = RegistrationValidationError;

    fn try_from(value: RegistrationRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.first_name, &value.last_name, &value.email, &value.phone)
    }
}

/// What the frontend should render for the current visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "page", rename_all = "camelCase")]
pub enum VisitorView {
    /// The visitor is registered; show their details back.
    Confirmation {
        /// Stored registration.
        registration: Registration,
    },
    /// Anonymous visitor; show the registration form.
    RegistrationForm,
}

fn map_validation_error(err: RegistrationValidationError) -> Error {
    let violations: Vec<_> = err
        .violations()
        .iter()
        .map(|violation| {
            json!({
                "field": violation.field(),
                "code": violation.code(),
                "message": violation.to_string(),
            })
        })
        .collect();
    debug!(count = violations.len(), "registration rejected by validation");
    Error::invalid_request(err.to_string()).with_details(json!({ "violations": violations }))
}

/// Confirmation for a registered visitor, or the form for everyone else.
#[utoipa::path(
    get,
    path = "/api/v1/registration",
    responses(
        (status = 200, description = "View to render", body = VisitorView),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["registration"],
    operation_id = "getVisitorView",
    security([])
)]
#[get("/registration")]
pub async fn visitor_view(
    state: web::Data<HttpState>,
    credential: SessionCredential,
) -> ApiResult<HttpResponse> {
    let Some(token) = credential.token() else {
        return Ok(HttpResponse::Ok().json(VisitorView::RegistrationForm));
    };
    match state.registrations_query.find_for_visitor(token).await? {
        Some(registration) => Ok(HttpResponse::Ok().json(VisitorView::Confirmation { registration })),
        None => Ok(HttpResponse::Ok()
            .cookie(removal_cookie(state.cookie_secure))
            .json(VisitorView::RegistrationForm)),
    }
}

/// Validate and store a registration, then bind the caller to it.
#[utoipa::path(
    post,
    path = "/api/v1/registrations",
    request_body = RegistrationRequest,
    responses(
        (status = 201, description = "Registration stored", body = Registration,
            headers(("Set-Cookie" = String, description = "Visitor session cookie"))),
        (status = 400, description = "Invalid or malformed request", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["registration"],
    operation_id = "register",
    security([])
)]
#[post("/registrations")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegistrationRequest>,
) -> ApiResult<HttpResponse> {
    let submission =
        RegistrationSubmission::try_from(payload.into_inner()).map_err(map_validation_error)?;
    let registration = state.registrations.register(submission).await?;
    Ok(HttpResponse::Created()
        .cookie(issue_cookie(registration.token(), state.cookie_secure))
        .json(registration))
}

/// Forget the caller's session credential.
#[utoipa::path(
    post,
    path = "/api/v1/session/reset",
    responses(
        (status = 204, description = "Credential cleared",
            headers(("Set-Cookie" = String, description = "Removal cookie")))
    ),
    tags = ["registration"],
    operation_id = "resetSession",
    security([])
)]
#[post("/session/reset")]
pub async fn reset_session(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::NoContent()
        .cookie(removal_cookie(state.cookie_secure))
        .finish()
}
