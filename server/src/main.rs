//! Quick Index service entrypoint.

use clap::{value_parser, Arg, Command};
use prometheus_client::registry::Registry;
use quickindex_engine::{Dataset, Engine, Policy};
use quickindex_server::{
    api::{self, AppState, Metrics},
    config::Config,
    telemetry,
};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse arguments
    let matches = Command::new("quickindex")
        .version(api::crate_version())
        .about("Answer nearest-value lookups against a static, sorted dataset.")
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to YAML config file")
                .default_value("config/config.yaml")
                .value_parser(value_parser!(PathBuf)),
        )
        .get_matches();

    // Load config
    let config_file = matches.get_one::<PathBuf>("config").unwrap();
    let config = match Config::load(config_file) {
        Ok(config) => config,
        Err(e) => {
            // The logger is configured from this file, so it is not up yet.
            eprintln!("could not load config from {}: {e}", config_file.display());
            return ExitCode::FAILURE;
        }
    };

    // Create logger
    telemetry::init_logging(config.level());
    info!(
        config = %config_file.display(),
        host = %config.server.host,
        port = config.server.port,
        "starting quickindex"
    );

    // Load dataset; failure is fatal before any listener binds
    let policy = if config.data.skip_malformed {
        Policy::Skip
    } else {
        Policy::Fail
    };
    let dataset = match Dataset::load(&config.data.input_file, policy) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!(?e, path = %config.data.input_file.display(), "could not load dataset");
            return ExitCode::FAILURE;
        }
    };
    info!(
        values = dataset.len(),
        path = %config.data.input_file.display(),
        "loaded dataset"
    );

    // Construct the engine and shared state
    let engine = Engine::with_tolerance(dataset, config.search.tolerance_percent);
    let metrics = Metrics::default();
    let mut registry = Registry::default();
    metrics.register(&mut registry);
    let state = Arc::new(AppState::new(engine, metrics));

    // Serve metrics on a dedicated listener, if configured
    if let Some(port) = config.metrics.port {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
        let registry = Arc::new(registry);
        tokio::spawn(async move {
            info!(%addr, "serving metrics");
            if let Err(e) = telemetry::serve_metrics(addr, registry).await {
                error!(?e, "could not serve metrics");
            }
        });
    }

    // Serve the API
    let bind = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(?e, %bind, "could not bind to server address");
            return ExitCode::FAILURE;
        }
    };
    info!(%bind, "serving");
    if let Err(e) = axum::serve(listener, api::router(state).into_make_service()).await {
        error!(?e, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
