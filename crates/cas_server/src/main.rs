use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use cas_server::{init_tracing, serve, LogFormat, ServerConfig};

/// Serve the word-problem solver over HTTP.
#[derive(Parser, Debug)]
#[command(name = "cas-server", version, about)]
struct Cli {
    /// TOML file with server settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,

    /// Overrides LOG_FORMAT
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn resolve(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        }
        .with_env()?;
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().resolve().context("invalid configuration")?;
    init_tracing(config.log_format)?;
    tracing::info!(?config, "starting");
    serve(config).await?;
    Ok(())
}
