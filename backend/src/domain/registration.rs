//! Registration record, identity token, and submission validation.
//!
//! A [`Registration`] is the only persisted entity. Its [`RegistrationToken`]
//! doubles as the storage primary key and as the visitor's bearer credential,
//! so token generation must draw from the operating system's CSPRNG.

use std::fmt;
use std::sync::OnceLock;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;

/// Number of random bytes behind every token (128 bits).
pub const TOKEN_BYTES: usize = 16;

/// Opaque identity token, URL-safe base64 without padding.
///
/// Tokens read back from storage or presented by a caller are wrapped
/// unchanged; only [`RegistrationToken::generate`] mints new ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RegistrationToken(String);

impl RegistrationToken {
    /// Mint a fresh token from [`OsRng`].
    ///
    /// # Examples
    /// ```
    /// use registration::domain::RegistrationToken;
    ///
    /// let token = RegistrationToken::generate();
    /// assert_eq!(token.as_ref().len(), 22);
    /// ```
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Wrap a token previously issued by [`RegistrationToken::generate`].
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl AsRef<str> for RegistrationToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RegistrationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldViolation {
    /// First name was blank once trimmed.
    EmptyFirstName,
    /// Last name was blank once trimmed.
    EmptyLastName,
    /// Email did not look like `local@domain.tld`.
    InvalidEmail,
    /// Phone contained disallowed characters or too few digits.
    InvalidPhone,
}

impl FieldViolation {
    /// Name of the offending request field, as sent by clients.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyFirstName => "firstName",
            Self::EmptyLastName => "lastName",
            Self::InvalidEmail => "email",
            Self::InvalidPhone => "phone",
        }
    }

    /// Stable machine-readable violation code.
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyFirstName => "empty_first_name",
            Self::EmptyLastName => "empty_last_name",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidPhone => "invalid_phone",
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
            Self::EmptyLastName => write!(f, "last name must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@example.org"),
            Self::InvalidPhone => write!(
                f,
                "phone may only contain digits, spaces, hyphens, parentheses and a leading + \
                 and must have at least {PHONE_MIN_DIGITS} digits"
            ),
        }
    }
}

/// Every violation found in one submission.
///
/// ## Invariants
/// - `violations` is never empty and keeps field order
///   (first name, last name, phone, email).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationValidationError {
    violations: Vec<FieldViolation>,
}

impl RegistrationValidationError {
    /// Violations in the order they were detected.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.violations {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for RegistrationValidationError {}

/// Minimum number of digits a phone number must carry.
pub const PHONE_MIN_DIGITS: usize = 6;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z]{2,}$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        // Digit count is enforced separately.
        Regex::new(r"^\+?[0-9 ()\-]+$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone)
        && phone.chars().filter(char::is_ascii_digit).count() >= PHONE_MIN_DIGITS
}

/// Contact details that passed validation, trimmed and ready to persist.
///
/// # Examples
/// ```
/// use registration::domain::RegistrationSubmission;
///
/// let submission =
///     RegistrationSubmission::try_from_parts(" Jo ", " Ann ", "jo@ex.io", "+1 (555) 123-4567")
///         .unwrap();
/// assert_eq!(submission.first_name(), "Jo");
/// assert_eq!(submission.last_name(), "Ann");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationSubmission {
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
}

impl RegistrationSubmission {
    /// Trim every field and collect all violations before failing.
    pub fn try_from_parts(
        first_name: &str,
        last_name: &str,
        email: &str,
        phone: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        let email = email.trim();
        let phone = phone.trim();

        let mut violations = Vec::new();
        if first_name.is_empty() {
            violations.push(FieldViolation::EmptyFirstName);
        }
        if last_name.is_empty() {
            violations.push(FieldViolation::EmptyLastName);
        }
        if !is_valid_phone(phone) {
            violations.push(FieldViolation::InvalidPhone);
        }
        if !email_regex().is_match(email) {
            violations.push(FieldViolation::InvalidEmail);
        }
        if !violations.is_empty() {
            return Err(RegistrationValidationError { violations });
        }

        Ok(Self {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email: email.to_owned(),
            phone: phone.to_owned(),
        })
    }

    /// Trimmed first name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Trimmed last name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Trimmed email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Trimmed phone number.
    pub fn phone(&self) -> &str {
        &self.phone
    }
}

/// Round `instant` up to the next whole millisecond.
fn ceil_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    let truncated = instant.trunc_subsecs(3);
    if truncated == instant {
        return instant;
    }
    truncated
        .checked_add_signed(TimeDelta::milliseconds(1))
        .unwrap_or(truncated)
}

/// Persisted attendee registration.
///
/// ## Invariants
/// - `token` never changes once assigned.
/// - `created_at` has millisecond precision, matching the stored
///   representation, so a record read back compares equal to the one written.
/// - `created_at` is never earlier than the clock reading it was built from;
///   sub-millisecond readings round up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[schema(value_type = String, example = "q2VbL3cM4m1Qm0JvTtP0mA")]
    token: RegistrationToken,
    #[schema(example = "Ada")]
    first_name: String,
    #[schema(example = "Lovelace")]
    last_name: String,
    #[schema(example = "ada@example.org")]
    email: String,
    #[schema(example = "+44 20 7946 0000")]
    phone: String,
    created_at: DateTime<Utc>,
}

impl Registration {
    /// Bind a validated submission to its token and creation time.
    pub fn new(
        token: RegistrationToken,
        submission: RegistrationSubmission,
        created_at: DateTime<Utc>,
    ) -> Self {
        let RegistrationSubmission {
            first_name,
            last_name,
            email,
            phone,
        } = submission;
        Self {
            token,
            first_name,
            last_name,
            email,
            phone,
            created_at: ceil_to_millis(created_at),
        }
    }

    /// Rehydrate a record that was validated before it was stored.
    pub fn from_stored(
        token: RegistrationToken,
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            first_name,
            last_name,
            email,
            phone,
            created_at,
        }
    }

    /// Primary key and bearer credential.
    pub fn token(&self) -> &RegistrationToken {
        &self.token
    }

    /// Attendee first name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Attendee last name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Attendee email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Attendee phone number.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Moment the registration was accepted.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests;
