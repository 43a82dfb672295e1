//! Specmock CLI
//!
//! Usage:
//!   specmock --specification openapi.yaml [OPTIONS]
//!   specmock --config specmock.yaml

use anyhow::Context;
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use specmock::config::{Config, LogFormat};
use specmock::generator::{MediaGenerators, ResponseGenerator};
use specmock::{MockServer, Router, ServerState, Specification};

/// Serve mocked responses for an OpenAPI document
#[derive(Parser, Debug)]
#[command(name = "specmock")]
#[command(author, version, about)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "SPECMOCK_CONFIG")]
    config: Option<PathBuf>,

    /// OpenAPI document (overrides specification.path)
    #[arg(short, long, env = "SPECMOCK_SPECIFICATION")]
    specification: Option<PathBuf>,

    #[arg(long, env = "SPECMOCK_HOST")]
    host: Option<IpAddr>,

    #[arg(short, long, env = "SPECMOCK_PORT")]
    port: Option<u16>,

    /// Pick a random declared response instead of the lowest success code
    #[arg(short, long, env = "SPECMOCK_RANDOM_RESPONSE")]
    random_response: bool,

    #[arg(long, env = "SPECMOCK_LOG_LEVEL")]
    log_level: Option<String>,

    #[arg(long, value_enum, env = "SPECMOCK_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

impl Args {
    fn into_config(self) -> Result<Config, anyhow::Error> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(specification) = self.specification {
            config.specification.path = Some(specification);
        }
        if let Some(host) = self.host {
            config.listen.host = host;
        }
        if let Some(port) = self.port {
            config.listen.port = port;
        }
        if self.random_response {
            config.generation.random_response = true;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(config: &Config) -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("Invalid log level")?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Args::parse().into_config()?;
    init_tracing(&config)?;

    // validate() guarantees a path
    let spec_path = config
        .specification
        .path
        .as_deref()
        .context("No specification configured")?;
    let spec = Specification::from_file(spec_path)
        .with_context(|| format!("Failed to load specification {}", spec_path.display()))?;
    info!(
        "Loaded '{}' {} from {}",
        spec.info.title,
        spec.info.version,
        spec_path.display()
    );

    let router = Router::from_specification(spec)?;
    let generator = ResponseGenerator::new(
        MediaGenerators::with_defaults(config.generation.data.clone()),
        config.generation.policy(),
    );
    let server = MockServer::new(
        config.listen.socket_addr(),
        ServerState {
            router,
            generator,
            health_path: config.listen.health_path.clone(),
        },
    );

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }

    Ok(())
}
