//! Tests for token minting and submission validation.

use std::collections::HashSet;

use super::*;
use chrono::TimeZone;
use rstest::rstest;

#[rstest]
fn generated_tokens_are_url_safe_and_128_bit() {
    let token = RegistrationToken::generate();
    let decoded = URL_SAFE_NO_PAD
        .decode(token.as_ref())
        .expect("token decodes as url-safe base64");
    assert_eq!(decoded.len(), TOKEN_BYTES);
    assert!(
        token
            .as_ref()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );
}

#[rstest]
fn generated_tokens_do_not_repeat() {
    let tokens: HashSet<_> = (0..1_000).map(|_| RegistrationToken::generate()).collect();
    assert_eq!(tokens.len(), 1_000);
}

#[rstest]
fn empty_first_name_is_the_only_violation() {
    let err = RegistrationSubmission::try_from_parts("", "Doe", "a@b.co", "123456")
        .expect_err("empty first name must fail");
    assert_eq!(err.violations(), &[FieldViolation::EmptyFirstName]);
    assert!(err.to_string().contains("first name"));
}

#[rstest]
fn malformed_email_is_the_only_violation() {
    let err = RegistrationSubmission::try_from_parts("A", "B", "not-an-email", "555-1234")
        .expect_err("email shape must fail");
    assert_eq!(err.violations(), &[FieldViolation::InvalidEmail]);
}

#[rstest]
fn padded_fields_are_trimmed() {
    let submission =
        RegistrationSubmission::try_from_parts(" Jo ", " Ann ", "jo@ex.io", "+1 (555) 123-4567")
            .expect("valid submission");
    assert_eq!(submission.first_name(), "Jo");
    assert_eq!(submission.last_name(), "Ann");
    assert_eq!(submission.email(), "jo@ex.io");
    assert_eq!(submission.phone(), "+1 (555) 123-4567");
}

#[rstest]
fn every_violation_is_reported_together() {
    let err = RegistrationSubmission::try_from_parts("  ", "", "nope", "abc")
        .expect_err("all fields invalid");
    assert_eq!(
        err.violations(),
        &[
            FieldViolation::EmptyFirstName,
            FieldViolation::EmptyLastName,
            FieldViolation::InvalidPhone,
            FieldViolation::InvalidEmail,
        ]
    );
    assert_eq!(err.to_string().matches("; ").count(), 3);
}

#[rstest]
#[case("12345")]
#[case("++123456")]
#[case("123456+")]
#[case("12 34 5")]
#[case("555.123.4567")]
#[case("")]
fn rejects_phone_shapes(#[case] phone: &str) {
    let err = RegistrationSubmission::try_from_parts("A", "B", "a@b.co", phone)
        .expect_err("phone shape must fail");
    assert_eq!(err.violations(), &[FieldViolation::InvalidPhone]);
}

#[rstest]
#[case("a@b")]
#[case("a@b.c")]
#[case("@b.co")]
#[case("a b@c.de")]
#[case("a@b.c0")]
fn rejects_email_shapes(#[case] email: &str) {
    let err = RegistrationSubmission::try_from_parts("A", "B", email, "123456")
        .expect_err("email shape must fail");
    assert_eq!(err.violations(), &[FieldViolation::InvalidEmail]);
}

#[rstest]
#[case::sub_millisecond(123_456_789, 1_700_000_000, 124_000_000)]
#[case::just_past_boundary(123_000_001, 1_700_000_000, 124_000_000)]
#[case::exact_millisecond(123_000_000, 1_700_000_000, 123_000_000)]
#[case::carries_into_next_second(999_999_999, 1_700_000_001, 0)]
fn created_at_rounds_up_to_milliseconds(
    #[case] nanos: u32,
    #[case] expected_secs: i64,
    #[case] expected_nanos: u32,
) {
    let instant = Utc
        .timestamp_opt(1_700_000_000, nanos)
        .single()
        .expect("valid instant");
    let submission = RegistrationSubmission::try_from_parts("A", "B", "a@b.co", "123456")
        .expect("valid submission");

    let registration = Registration::new(RegistrationToken::generate(), submission, instant);

    assert!(registration.created_at() >= instant);
    assert_eq!(registration.created_at().timestamp(), expected_secs);
    assert_eq!(
        registration.created_at().timestamp_subsec_nanos(),
        expected_nanos
    );
}

#[rstest]
fn serialises_with_camel_case_fields() {
    let instant = Utc
        .timestamp_millis_opt(1_700_000_000_000)
        .single()
        .expect("valid instant");
    let submission = RegistrationSubmission::try_from_parts("Ada", "Lovelace", "ada@ex.org", "123456")
        .expect("valid submission");
    let registration =
        Registration::new(RegistrationToken::from_stored("tok"), submission, instant);
    let value = serde_json::to_value(&registration).expect("serialise");
    assert_eq!(value["token"], "tok");
    assert_eq!(value["firstName"], "Ada");
    assert_eq!(value["lastName"], "Lovelace");
    assert_eq!(value["createdAt"], "2023-11-14T22:13:20Z");
}
