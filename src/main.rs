//! Folio CLI - serve a single-user e-portfolio or inspect what it holds.

use clap::Parser;
use folio::cli::{Cli, Commands};
use folio::commands::{self, Output};
use folio::config::{ServerOverrides, resolve_config};
use std::path::Path;
use std::process;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "folio=info,tower_http=info";

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    init_tracing();

    let result = match cli.command {
        Some(Commands::Stats) => commands::stats(&cli.root).map(|r| output(&r, human)),
        // Bare `folio` serves too.
        Some(Commands::Serve(_)) | None => serve(&cli.root, cli.serve_overrides()),
    };

    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

/// Resolve configuration and run the web server until shutdown.
fn serve(root: &Path, overrides: ServerOverrides) -> folio::Result<()> {
    let config = resolve_config(root, &overrides)?;
    info!(
        root = %config.root.display(),
        host = %config.host.value,
        host_source = %config.host.source,
        port = config.port.value,
        port_source = %config.port.source,
        max_upload_mb = config.max_upload_mb.value,
        max_upload_source = %config.max_upload_mb.source,
        "configuration resolved"
    );

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| folio::Error::Other(format!("Failed to create runtime: {}", e)))?
        .block_on(folio::web::start_server(&config))
}
