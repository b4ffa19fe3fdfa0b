//! Static shared-credential gate for privileged operations.
//!
//! There is one admin account with a fixed username and a configured secret.
//! Every privileged request carries the pair and is checked independently;
//! there is no admin session, expiry, or lockout.

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::Error;

/// The only accepted admin username.
pub const ADMIN_USERNAME: &str = "admin";

/// Domain error returned when admin credential values are unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCredentialsError {
    /// Username was blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for AdminCredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "admin username must not be empty"),
            Self::EmptyPassword => write!(f, "admin password must not be empty"),
        }
    }
}

impl std::error::Error for AdminCredentialsError {}

/// Credentials presented on a privileged request.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller whitespace.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl AdminCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, AdminCredentialsError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AdminCredentialsError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(AdminCredentialsError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Presented username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Presented password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Compares presented credentials against the configured admin secret.
///
/// # Examples
/// ```
/// use registration::domain::{AdminCredentials, AdminGate};
///
/// let gate = AdminGate::new("s3cret").unwrap();
/// let creds = AdminCredentials::try_from_parts("admin", "s3cret").unwrap();
/// assert!(gate.authorise(&creds).is_ok());
/// ```
#[derive(Clone)]
pub struct AdminGate {
    secret: Zeroizing<String>,
}

impl AdminGate {
    /// Build a gate for the configured secret.
    ///
    /// A blank secret would let an empty password through, so it is refused.
    pub fn new(secret: impl Into<String>) -> Result<Self, AdminCredentialsError> {
        let secret = Zeroizing::new(secret.into());
        if secret.trim().is_empty() {
            return Err(AdminCredentialsError::EmptyPassword);
        }
        Ok(Self { secret })
    }

    /// Accept only the fixed username with the configured secret.
    pub fn authorise(&self, credentials: &AdminCredentials) -> Result<(), Error> {
        let username_ok = credentials
            .username()
            .as_bytes()
            .ct_eq(ADMIN_USERNAME.as_bytes());
        let password_ok = credentials
            .password()
            .as_bytes()
            .ct_eq(self.secret.as_bytes());
        if bool::from(username_ok & password_ok) {
            Ok(())
        } else {
            Err(Error::unauthorized("invalid admin credentials"))
        }
    }
}

impl fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminGate").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use rstest_bdd_macros::{given, then, when};

    fn admin_gate() -> AdminGate {
        AdminGate::new("correct horse").expect("non-blank secret")
    }

    #[given("the configured admin credentials")]
    fn configured_admin_credentials() -> AdminCredentials {
        AdminCredentials::try_from_parts("admin", "correct horse").expect("credentials shape")
    }

    #[given("a wrong admin password")]
    fn wrong_admin_password() -> AdminCredentials {
        AdminCredentials::try_from_parts("admin", "wrong").expect("credentials shape")
    }

    #[when("the gate checks the credentials")]
    fn gate_checks(credentials: AdminCredentials) -> Result<(), Error> {
        admin_gate().authorise(&credentials)
    }

    #[then("the request is authorised")]
    fn authorised(result: Result<(), Error>) {
        assert!(result.is_ok(), "expected the gate to pass");
    }

    #[then("the request is rejected as unauthorised")]
    fn rejected_as_unauthorised(result: Result<(), Error>) {
        let error = result.expect_err("gate must reject");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn gate_happy_path() {
        authorised(gate_checks(configured_admin_credentials()));
    }

    #[rstest]
    fn gate_unhappy_path() {
        rejected_as_unauthorised(gate_checks(wrong_admin_password()));
    }

    #[rstest]
    #[case("root", "correct horse")]
    #[case("admin", "correct horse ")]
    #[case("admin", "correct")]
    fn near_misses_are_rejected(#[case] username: &str, #[case] password: &str) {
        let credentials =
            AdminCredentials::try_from_parts(username, password).expect("credentials shape");
        rejected_as_unauthorised(admin_gate().authorise(&credentials));
    }

    #[rstest]
    #[case("", "pw", AdminCredentialsError::EmptyUsername)]
    #[case("  ", "pw", AdminCredentialsError::EmptyUsername)]
    #[case("admin", "", AdminCredentialsError::EmptyPassword)]
    fn blank_credentials_are_refused(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: AdminCredentialsError,
    ) {
        let err = AdminCredentials::try_from_parts(username, password)
            .expect_err("blank input must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn blank_secret_is_refused() {
        assert!(AdminGate::new("   ").is_err());
    }

    #[rstest]
    fn debug_output_hides_password() {
        let creds = AdminCredentials::try_from_parts("admin", "hunter2").expect("shape");
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
