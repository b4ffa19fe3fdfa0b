//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! `diesel print-schema` omits SQLite's implicit `rowid`; it is declared by
//! hand here because recent-first listings use it to order same-millisecond
//! inserts. Keep it when regenerating.

diesel::table! {
    /// Attendee registrations keyed by their bearer token.
    registrations (token) {
        /// Implicit SQLite row identifier; increases with every insert.
        rowid -> BigInt,
        /// Primary key: URL-safe base64 token.
        token -> Text,
        /// Trimmed first name.
        first_name -> Text,
        /// Trimmed last name.
        last_name -> Text,
        /// Email address.
        email -> Text,
        /// Phone number as entered.
        phone -> Text,
        /// Creation time in milliseconds since the Unix epoch (UTC).
        created_at -> BigInt,
    }
}
