//! Zen Den share server entry point.

use clap::Parser;
use std::path::PathBuf;
use zenden_server::ServerConfig;

#[derive(Debug, Parser)]
#[command(name = "zenden-server", version, about = "Serves Zen Den share links")]
struct Args {
    /// TOML configuration file.
    #[arg(long, env = "ZEN_DEN_CONFIG")]
    config: Option<PathBuf>,
    /// Listen address, e.g. 0.0.0.0:8787.
    #[arg(long)]
    bind: Option<String>,
    /// SQLite database file.
    #[arg(long)]
    db: Option<PathBuf>,
    /// Public base URL used in generated share links.
    #[arg(long)]
    public_url: Option<String>,
}

impl Args {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(db) = self.db {
            config.database_path = db;
        }
        if let Some(public_url) = self.public_url {
            config.public_base_url = Some(public_url);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = ServerConfig::load(args.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok())?;
    args.apply(&mut config);

    let log_dir = config
        .log_dir
        .as_ref()
        .map(|dir| dir.to_string_lossy().into_owned());
    zenden_core::init_logging(&config.log_level, log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    zenden_server::serve(config).await
}
