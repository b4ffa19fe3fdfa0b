//! Route table for the `/api/v1` scope.

use actix_web::{Scope, web};

use super::admin::{delete_registration, export_csv, export_json, statistics};
use super::error::json_error_handler;
use super::registrations::{register, reset_session, visitor_view};

/// Largest accepted JSON body; registrations are four short strings.
const JSON_BODY_LIMIT: usize = 16 * 1024;

/// Build the versioned API scope.
///
/// Admin handlers are only mounted when `admin_enabled` is set, so a
/// disabled deployment answers `404` for them.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use registration::inbound::http::routes::api_scope;
///
/// let app = App::new().service(api_scope(false));
/// ```
pub fn api_scope(admin_enabled: bool) -> Scope {
    let scope = web::scope("/api/v1")
        .app_data(
            web::JsonConfig::default()
                .limit(JSON_BODY_LIMIT)
                .error_handler(json_error_handler),
        )
        .service(visitor_view)
        .service(register)
        .service(reset_session);

    if admin_enabled {
        scope
            .service(statistics)
            .service(export_csv)
            .service(export_json)
            .service(delete_registration)
    } else {
        scope
    }
}
