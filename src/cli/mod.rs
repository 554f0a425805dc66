//! CLI module for the produce inventory service
//!
//! Subcommands:
//! - `serve`: HTTP API server
//! - `import`: load a JSON product file into storage
//! - `migrate`: apply the PostgreSQL schema migrations

pub mod import;
pub mod migrate;
pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Produce Inventory - fruit and vegetable stock API
#[derive(Parser)]
#[command(name = "produce-inventory")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Import products from a JSON file
    Import {
        /// File to import. Defaults to `import.file_path` from the configuration.
        file: Option<PathBuf>,
    },

    /// Apply database migrations
    Migrate,
}

/// Loads `.env`, the layered configuration and the log subscriber
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["produce-inventory", "serve"]).unwrap();

        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_parse_import_with_file() {
        let cli = Cli::try_parse_from(["produce-inventory", "import", "stock.json"]).unwrap();

        match cli.command {
            Command::Import { file } => assert_eq!(file, Some(PathBuf::from("stock.json"))),
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn test_parse_import_default_file() {
        let cli = Cli::try_parse_from(["produce-inventory", "import"]).unwrap();

        assert!(matches!(cli.command, Command::Import { file: None }));
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(Cli::try_parse_from(["produce-inventory", "ui"]).is_err());
    }
}
