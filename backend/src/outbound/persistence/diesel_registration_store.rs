//! SQLite-backed `RegistrationStore` implementation using Diesel ORM.
//!
//! Each port operation is a single statement, so SQLite's statement-level
//! atomicity is the only transaction boundary. The ordered scan sorts by
//! `created_at` then `rowid`, both descending, so same-millisecond inserts
//! come back latest first.

use async_trait::async_trait;
use chrono::DateTime;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RegistrationStore, RegistrationStoreError};
use crate::domain::{Registration, RegistrationToken};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::migrations::run_migrations;
use super::models::{NewRegistrationRow, RegistrationRow};
use super::pool::{DbPool, PoolConfig, PoolError};
use super::schema::registrations;

/// Diesel-backed implementation of the `RegistrationStore` port.
#[derive(Clone)]
pub struct DieselRegistrationStore {
    pool: DbPool,
}

impl DieselRegistrationStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Apply migrations, then build the pool.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Build` when the database cannot be opened or
    /// migrated.
    pub async fn open(config: PoolConfig) -> Result<Self, PoolError> {
        run_migrations(&config).await?;
        let pool = DbPool::new(config).await?;
        Ok(Self::new(pool))
    }

    /// Checkpoint and close the underlying pool.
    ///
    /// Every later operation fails with [`RegistrationStoreError::Unavailable`].
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Convert a database row to a domain Registration.
fn row_to_registration(row: RegistrationRow) -> Result<Registration, RegistrationStoreError> {
    let created_at = DateTime::from_timestamp_millis(row.created_at).ok_or_else(|| {
        RegistrationStoreError::unavailable(format!(
            "stored created_at {} is out of range",
            row.created_at
        ))
    })?;
    Ok(Registration::from_stored(
        RegistrationToken::from_stored(row.token),
        row.first_name,
        row.last_name,
        row.email,
        row.phone,
        created_at,
    ))
}

fn rows_to_registrations(
    rows: Vec<RegistrationRow>,
) -> Result<Vec<Registration>, RegistrationStoreError> {
    rows.into_iter().map(row_to_registration).collect()
}

#[async_trait]
impl RegistrationStore for DieselRegistrationStore {
    async fn insert(&self, registration: &Registration) -> Result<(), RegistrationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewRegistrationRow {
            token: registration.token().as_ref(),
            first_name: registration.first_name(),
            last_name: registration.last_name(),
            email: registration.email(),
            phone: registration.phone(),
            created_at: registration.created_at().timestamp_millis(),
        };
        diesel::insert_into(registrations::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "insert"))?;
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Registration, RegistrationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = registrations::table
            .filter(registrations::token.eq(token))
            .select(RegistrationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find_by_token"))?;
        row.ok_or_else(RegistrationStoreError::not_found)
            .and_then(row_to_registration)
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), RegistrationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(registrations::table.filter(registrations::token.eq(token)))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "delete_by_token"))?;
        match deleted {
            0 => Err(RegistrationStoreError::not_found()),
            _ => Ok(()),
        }
    }

    async fn list_all(&self) -> Result<Vec<Registration>, RegistrationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RegistrationRow> = registrations::table
            .select(RegistrationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list_all"))?;
        rows_to_registrations(rows)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Registration>, RegistrationStoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RegistrationRow> = registrations::table
            .select(RegistrationRow::as_select())
            .order((registrations::created_at.desc(), registrations::rowid.desc()))
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list_recent"))?;
        rows_to_registrations(rows)
    }

    async fn count(&self) -> Result<u64, RegistrationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = registrations::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "count"))?;
        u64::try_from(total)
            .map_err(|_| RegistrationStoreError::unavailable("negative registration count"))
    }
}
