//! Backend entry-point: loads settings, opens the store, and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ortho_config::OrthoConfig;
use registration::config::RegistrationSettings;
use registration::domain::AdminGate;
use registration::inbound::http::health::HealthState;
use registration::outbound::persistence::{DieselRegistrationStore, PoolConfig};

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        RegistrationSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let config = build_server_config(&settings).await?;
    let store = config.store.clone();

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).wrap_err("failed to start server")?;
    info!(
        addr = %settings.bind_addr()?,
        in_memory = settings.in_memory,
        admin_enabled = settings.admin_enabled,
        "registration server listening"
    );
    let outcome = server.await;

    health_state.mark_unhealthy();
    if let Some(store) = store {
        store.close().await;
    }
    outcome.wrap_err("server terminated with an error")
}

async fn build_server_config(settings: &RegistrationSettings) -> Result<ServerConfig> {
    let mut config = ServerConfig::new(settings.cookie_secure(), settings.bind_addr()?);

    if let Some(secret) = settings.admin_secret()? {
        let gate = AdminGate::new(secret).wrap_err("invalid admin password")?;
        config = config.with_admin_gate(gate);
    }

    if settings.in_memory {
        warn!("registrations are kept in memory and lost on shutdown");
        return Ok(config);
    }

    let pool_config = PoolConfig::from_path(settings.database_path())
        .wrap_err("invalid database path")?
        .with_max_size(settings.pool_size()?);
    let store = DieselRegistrationStore::open(pool_config)
        .await
        .wrap_err_with(|| {
            format!(
                "failed to open registration store at {}",
                settings.database_path().display()
            )
        })?;
    Ok(config.with_store(store))
}
