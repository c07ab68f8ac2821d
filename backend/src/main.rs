//! Employee service entry-point: loads settings, migrates the schema and
//! serves the REST API until a signal or fatal error stops it.

mod server;

use std::sync::Arc;

use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{Instrument, info, info_span};
use tracing_subscriber::{EnvFilter, fmt};

use employee_service::inbound::http::middleware::install_panic_hook;
use employee_service::outbound::persistence::{
    DbPool, DieselEmployeeRepository, PoolConfig, run_pending_migrations,
};
use employee_service::settings::ServiceSettings;

use server::{ServerConfig, create_server, shut_down, wait_for_shutdown, wire};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let settings = ServiceSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    init_tracing(&settings)?;
    install_panic_hook();

    let span = info_span!(
        "service",
        service = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION")
    );
    run(settings).instrument(span).await
}

fn init_tracing(settings: &ServiceSettings) -> Result<()> {
    let default_level = if settings.log_debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = fmt().with_env_filter(filter);
    let installed = if settings.log_json {
        builder.json().try_init()
    } else {
        builder.pretty().try_init()
    };
    installed.map_err(|err| eyre!("tracing init failed: {err}"))
}

async fn run(settings: ServiceSettings) -> Result<()> {
    let database_url = settings
        .database_url()
        .ok_or_else(|| eyre!("EMPLOYEE_DATABASE_URL is required"))?
        .to_owned();

    let pool = DbPool::new(
        PoolConfig::new(database_url.as_str())
            .with_max_size(settings.db_max_connections())
            .with_min_idle(Some(settings.db_min_idle()))
            .with_connection_timeout(settings.db_connect_timeout()),
    )
    .await
    .wrap_err("failed to build database pool")?;

    let applied = run_pending_migrations(&database_url)
        .await
        .wrap_err("failed to migrate database")?;
    info!(applied, "database schema up to date");

    let repository =
        DieselEmployeeRepository::new(pool).with_query_timeout(settings.query_timeout());
    let config = ServerConfig::from_settings(&settings);
    let mut wiring = wire(Arc::new(repository), &config);

    let server = create_server(wiring.health_state.clone(), wiring.dispatcher, &config)
        .wrap_err("failed to start HTTP server")?;
    let handle = server.handle();
    let running = actix_web::rt::spawn(server);
    info!(host = settings.host(), port = settings.port(), "listening");

    let cause = wait_for_shutdown(&mut wiring.listener).await;
    shut_down(&wiring.health_state, handle, &cause).await;

    running
        .await
        .wrap_err("server task failed")?
        .wrap_err("server exited with an error")
}
