//! Folio - a single-user e-portfolio web server.
//!
//! This library provides the core functionality for the `folio` binary:
//! flat-file record and upload storage, the page aggregator that turns
//! stored content into per-page read models, and the axum web layer.

pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod pages;
pub mod storage;
pub mod web;


/// Library-level error type for Folio operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Folio operations.
pub type Result<T> = std::result::Result<T, Error>;
