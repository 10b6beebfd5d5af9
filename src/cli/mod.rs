//! CLI argument definitions for Folio.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ServerOverrides;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("FOLIO_GIT_COMMIT"),
    ", built ",
    env!("FOLIO_BUILD_TIMESTAMP"),
    ")"
);

/// Folio - a single-user e-portfolio web server.
///
/// Runs `serve` when no command is given.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, long_version = LONG_VERSION, about = "A single-user e-portfolio web server", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Portfolio root holding the JSON collections and the uploads/ tree.
    /// Can also be set via FOLIO_ROOT environment variable.
    #[arg(short = 'C', long = "root", global = true, env = "FOLIO_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Server options, also accepted before the `serve` command
    #[command(flatten)]
    pub serve: ServeDefaults,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Server overrides for this invocation.
    ///
    /// Flags given after `serve` win, then flags given before it, then the
    /// `FOLIO_*` environment variables.
    pub fn serve_overrides(&self) -> ServerOverrides {
        let defaults = self.serve.clone();
        match &self.command {
            Some(Commands::Serve(args)) => ServerOverrides {
                host: args.host.clone().or(defaults.host),
                port: args.port.or(defaults.port),
                max_upload_mb: args.max_upload_mb.or(defaults.max_upload_mb),
            },
            _ => defaults.into(),
        }
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the portfolio web server
    Serve(ServeArgs),

    /// Print item counts per collection and upload category
    Stats,
}

/// Options for `folio serve`. Unset values fall back to the top-level
/// options, then folio.kdl, then defaults.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Port to listen on (default: 3000)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host address to bind to (default: 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// Largest accepted upload in MiB (default: 100)
    #[arg(long)]
    pub max_upload_mb: Option<u64>,
}

/// Server options given before any command, with environment fallbacks.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeDefaults {
    /// Port to listen on (default: 3000)
    #[arg(short, long, env = "FOLIO_PORT")]
    pub port: Option<u16>,

    /// Host address to bind to (default: 0.0.0.0)
    #[arg(long, env = "FOLIO_HOST")]
    pub host: Option<String>,

    /// Largest accepted upload in MiB (default: 100)
    #[arg(long, env = "FOLIO_MAX_UPLOAD_MB")]
    pub max_upload_mb: Option<u64>,
}

impl From<ServeDefaults> for ServerOverrides {
    fn from(args: ServeDefaults) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_upload_mb: args.max_upload_mb,
        }
    }
}
