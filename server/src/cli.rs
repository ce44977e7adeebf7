//! # CLI Interface
//!
//! Defines the command-line argument structure for `vault-server` using
//! `clap` derive. Every flag also reads from a `VAULT_*` environment variable.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vault_store::config::{DEFAULT_ALLOWED_ORIGIN, DEFAULT_DATA_FILE, DEFAULT_PORT};
use vault_store::{StoreConfig, StoreMode};

use crate::logging::LogFormat;

/// HTTP backend for the vault.
#[derive(Parser, Debug)]
#[command(
    name = "vault-server",
    about = "HTTP backend for the vault",
    version,
    propagate_version = true
)]
pub struct VaultServerCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API.
    Run(RunArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Port for the HTTP API.
    #[arg(long, short = 'p', env = "VAULT_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The single browser origin allowed through CORS.
    #[arg(long, env = "VAULT_ALLOWED_ORIGIN", default_value = DEFAULT_ALLOWED_ORIGIN)]
    pub allowed_origin: String,

    /// JSON file the collection is mirrored to.
    #[arg(long, short = 'f', env = "VAULT_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// Keep the collection in memory only; `--data-file` is ignored.
    #[arg(long, env = "VAULT_IN_MEMORY")]
    pub in_memory: bool,

    /// `collection` (add/list/delete/edit) or `single-secret` (save/load).
    #[arg(long, short = 'm', env = "VAULT_MODE", default_value = "collection")]
    pub mode: StoreMode,

    /// Log output format.
    #[arg(long, env = "VAULT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this port. Disabled when omitted.
    #[arg(long, env = "VAULT_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

impl RunArgs {
    /// The store configuration these flags describe.
    pub fn store_config(&self) -> StoreConfig {
        let persistence = match (self.mode, self.in_memory) {
            (StoreMode::Collection, false) => Some(self.data_file.clone()),
            _ => None,
        };
        StoreConfig {
            mode: self.mode,
            persistence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        VaultServerCli::command().debug_assert();
    }

    fn run_args(argv: &[&str]) -> RunArgs {
        let cli = VaultServerCli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Run(args) => args,
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn defaults_describe_persisted_collection() {
        let args = run_args(&["vault-server", "run"]);
        assert_eq!(args.port, 8080);
        assert_eq!(args.allowed_origin, "http://localhost:5173");
        assert_eq!(args.metrics_port, None);
        assert_eq!(args.store_config(), StoreConfig::persistent("vault.json"));
    }

    #[test]
    fn in_memory_flag_drops_persistence() {
        let args = run_args(&["vault-server", "run", "--in-memory", "-f", "other.json"]);
        assert_eq!(args.store_config(), StoreConfig::in_memory());
    }

    #[test]
    fn single_secret_mode_is_memory_only() {
        let args = run_args(&["vault-server", "run", "--mode", "single-secret"]);
        assert_eq!(args.store_config(), StoreConfig::single_secret());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(VaultServerCli::try_parse_from(["vault-server", "run", "--mode", "ledger"]).is_err());
    }
}
