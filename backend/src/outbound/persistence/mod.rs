//! SQLite persistence adapters using Diesel ORM.
//!
//! This module provides the concrete implementation of the registration
//! store port backed by a SQLite file via Diesel, with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: The store only translates between Diesel models and
//!   domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Embedded migrations**: The schema is created or upgraded before the
//!   pool hands out its first connection.
//! - **Strongly typed errors**: All database errors are mapped to
//!   `RegistrationStoreError` variants.
//!
//! # Example
//!
//! ```ignore
//! use registration::outbound::persistence::{DieselRegistrationStore, PoolConfig};
//!
//! let store = DieselRegistrationStore::open(PoolConfig::new("registrations.db")).await?;
//! ```

mod diesel_error_mapping;
mod diesel_registration_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_registration_store::DieselRegistrationStore;
pub use migrations::run_migrations;
pub use pool::{DbPool, PoolConfig, PoolError, SqliteAsyncConnection};
