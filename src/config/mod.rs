//! Server configuration.
//!
//! Settings come from three places, highest precedence first:
//!
//! 1. CLI flags (`--host`, `--port`, `--max-upload-mb`) or their `FOLIO_*`
//!    environment variables
//! 2. `folio.kdl` in the portfolio root
//! 3. Built-in defaults (`0.0.0.0:3000`, 100 MiB uploads)
//!
//! Use [`resolve_config`] to get the effective values with their sources.

pub mod resolver;
pub mod schema;

pub use resolver::{
    DEFAULT_HOST, DEFAULT_MAX_UPLOAD_MB, DEFAULT_PORT, Resolved, ResolvedConfig, ServerOverrides,
    ValueSource, resolve_config,
};
pub use schema::{CONFIG_FILE, FolioConfig};
