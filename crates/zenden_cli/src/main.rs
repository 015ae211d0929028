//! Command-line companion for Zen Den.
//!
//! # Responsibility
//! - Smoke-check `zenden_core` linkage (`ping`).
//! - Share and fetch gardens against a local share database.
//! - Manage a file-backed garden library outside the browser.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use zenden_core::db::open_db;
use zenden_core::{
    init_logging, FileStore, Garden, GardenLibrary, ImportOutcome, ShareLink, ShareService,
    SqliteShareRepository,
};

#[derive(Debug, Parser)]
#[command(name = "zenden", version, about = "Zen Den garden tools")]
struct Cli {
    /// Log level written to stderr.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core linkage and version.
    Ping,
    /// Check a garden file without storing it.
    Validate { file: PathBuf },
    /// Store a garden file and print its share id and link.
    Share {
        file: PathBuf,
        #[arg(long)]
        db: PathBuf,
        #[arg(long, default_value = "http://localhost:8787")]
        base_url: String,
    },
    /// Print the garden stored under a share id.
    Fetch {
        id: String,
        #[arg(long)]
        db: PathBuf,
    },
    /// List gardens saved in a library file.
    List {
        #[arg(long)]
        store: PathBuf,
    },
    /// Copy a shared garden into a library file.
    Import {
        id: String,
        #[arg(long)]
        db: PathBuf,
        #[arg(long)]
        store: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, None).map_err(anyhow::Error::msg)?;

    match cli.command {
        Command::Ping => {
            println!("zenden_core ping={}", zenden_core::ping());
            println!("zenden_core version={}", zenden_core::core_version());
        }
        Command::Validate { file } => {
            let garden = read_garden(&file)?;
            garden
                .validate()
                .with_context(|| format!("`{}` is not a valid garden", file.display()))?;
            println!("ok: {} items", garden.items.len());
        }
        Command::Share { file, db, base_url } => {
            let body = share_body(&file)?;
            let conn = open_db(&db)?;
            let service =
                ShareService::new(SqliteShareRepository::new(&conn), ShareLink::new(base_url));
            let receipt = service.share_json(&body)?;
            println!("{}", json!({ "id": receipt.id, "shareUrl": receipt.share_url }));
        }
        Command::Fetch { id, db } => {
            let garden = fetch(&db, &id)?;
            println!("{}", serde_json::to_string_pretty(&json!({ "garden": garden }))?);
        }
        Command::List { store } => {
            let library = GardenLibrary::new(FileStore::open(&store)?);
            for garden in library.list()? {
                println!("{}\t{}\t{} items", garden.id, garden.name, garden.items.len());
            }
        }
        Command::Import { id, db, store } => {
            let garden = fetch(&db, &id)?;
            let mut library = GardenLibrary::new(FileStore::open(&store)?);
            match library.import_shared(garden)? {
                ImportOutcome::Added(id) => println!("added {id}"),
                ImportOutcome::Unchanged(id) => println!("already saved {id}"),
                ImportOutcome::Copied { original_id, id } => {
                    println!("saved copy {id} (local {original_id} differs)")
                }
            }
        }
    }
    Ok(())
}

fn fetch(db: &Path, id: &str) -> anyhow::Result<Garden> {
    let conn = open_db(db)?;
    // Links are irrelevant for lookups.
    let service = ShareService::new(SqliteShareRepository::new(&conn), ShareLink::new(""));
    Ok(service.fetch(id)?)
}

/// Reads either a bare garden or a `{ "garden": ... }` envelope.
fn read_value(file: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read `{}`", file.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("`{}` is not JSON", file.display()))?;
    match value {
        Value::Object(mut map) if map.contains_key("garden") => {
            Ok(map.remove("garden").unwrap_or(Value::Null))
        }
        Value::Object(_) => Ok(value),
        _ => bail!("`{}` must contain a JSON object", file.display()),
    }
}

fn read_garden(file: &Path) -> anyhow::Result<Garden> {
    Ok(serde_json::from_value(read_value(file)?)?)
}

fn share_body(file: &Path) -> anyhow::Result<String> {
    Ok(json!({ "garden": read_value(file)? }).to_string())
}
