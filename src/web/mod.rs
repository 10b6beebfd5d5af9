//! Web layer: axum router, page handlers and HTML rendering.
//!
//! Pages are rendered server-side from [`crate::pages`] read models through
//! the minijinja templates in [`templates`]. Uploaded files are served
//! straight from the `uploads/` tree.

pub mod error;
pub mod handlers;
pub mod render;
pub mod server;
pub mod templates;

pub use error::WebError;
pub use server::{AppState, build_router, start_server};
