//! Visitor session credential carried in a cookie.
//!
//! The cookie value is the registration token itself, so whoever holds the
//! cookie can read that registration back. Handlers never touch cookies
//! directly; they take a [`SessionCredential`] and use the builders here to
//! issue or clear it.

use std::convert::Infallible;

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::RegistrationToken;

/// Name of the cookie carrying the visitor token.
pub const SESSION_COOKIE_NAME: &str = "registration";

/// Lifetime of the visitor cookie.
pub const SESSION_MAX_AGE: Duration = Duration::days(3);

/// Token presented by the caller, if any.
///
/// Extraction never fails: a missing or empty cookie is an anonymous visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredential {
    token: Option<String>,
}

impl SessionCredential {
    /// Presented token, unvalidated.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl FromRequest for SessionCredential {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .cookie(SESSION_COOKIE_NAME)
            .map(|cookie| cookie.value().to_owned())
            .filter(|value| !value.is_empty());
        ready(Ok(Self { token }))
    }
}

fn base_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE_NAME, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .finish()
}

/// Cookie binding the caller to `token` for [`SESSION_MAX_AGE`].
pub fn issue_cookie(token: &RegistrationToken, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(token.to_string(), secure);
    cookie.set_max_age(SESSION_MAX_AGE);
    cookie
}

/// Cookie instructing the client to forget its credential.
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(String::new(), secure);
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    async fn extract(request: TestRequest) -> SessionCredential {
        let (req, mut payload) = request.to_http_parts();
        SessionCredential::from_request(&req, &mut payload)
            .await
            .unwrap_or_else(|never| match never {})
    }

    #[actix_web::test]
    async fn reads_token_from_cookie() {
        let credential = extract(
            TestRequest::default().cookie(Cookie::new(SESSION_COOKIE_NAME, "abc123")),
        )
        .await;
        assert_eq!(credential.token(), Some("abc123"));
    }

    #[rstest]
    #[case(TestRequest::default())]
    #[case(TestRequest::default().cookie(Cookie::new(SESSION_COOKIE_NAME, "")))]
    #[case(TestRequest::default().cookie(Cookie::new("other", "abc123")))]
    #[actix_web::test]
    async fn missing_cookie_is_anonymous(#[case] request: TestRequest) {
        assert_eq!(extract(request).await.token(), None);
    }

    #[rstest]
    fn issued_cookie_is_scoped_and_hardened() {
        let token = RegistrationToken::from_stored("q2VbL3cM4m1Qm0JvTtP0mA");
        let cookie = issue_cookie(&token, true);

        assert_eq!(cookie.value(), "q2VbL3cM4m1Qm0JvTtP0mA");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(3)));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn removal_cookie_expires_immediately(#[case] secure: bool) {
        let cookie = removal_cookie(secure);

        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.secure(), Some(secure));
    }
}
