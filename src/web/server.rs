//! Router construction and server lifecycle.

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

use super::handlers;
use crate::Result;
use crate::config::ResolvedConfig;
use crate::pages::Pages;
use crate::storage::{RecordStore, UploadStore, open_file_stores};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordStore>,
    pub uploads: Arc<dyn UploadStore>,
}

impl AppState {
    pub fn new<R, U>(records: R, uploads: U) -> Self
    where
        R: RecordStore + 'static,
        U: UploadStore + 'static,
    {
        Self {
            records: Arc::new(records),
            uploads: Arc::new(uploads),
        }
    }

    /// Page aggregator over this state's stores.
    pub fn pages(&self) -> Pages<'_> {
        Pages::new(self.records.as_ref(), self.uploads.as_ref())
    }
}

/// Build the router with every page route, the upload file tree under
/// `/uploads` and a 404 fallback.
pub fn build_router(state: AppState, upload_dir: &Path, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route(
            "/introduction",
            get(handlers::introduction).post(handlers::upload_video),
        )
        .route(
            "/assignments",
            get(handlers::assignments).post(handlers::upload_assignment),
        )
        .route(
            "/share/assignment/:filename",
            get(handlers::share_assignment),
        )
        .route(
            "/learning-log",
            get(handlers::learning_log).post(handlers::add_learning_log),
        )
        .route("/pse-lab", get(handlers::pse_lab))
        .route("/pese-lab", get(handlers::pese_lab))
        .route(
            "/gallery",
            get(handlers::gallery).post(handlers::upload_image),
        )
        .route(
            "/social",
            get(handlers::social).post(handlers::add_social_post),
        )
        .route("/dashboard", get(handlers::dashboard))
        .route(
            "/profile",
            get(handlers::profile).post(handlers::save_profile),
        )
        .route(
            "/contact",
            get(handlers::contact).post(handlers::add_contact),
        )
        .route("/share/portfolio", get(handlers::share_portfolio))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the stores under the configured root and serve until shutdown.
pub async fn start_server(config: &ResolvedConfig) -> Result<()> {
    let (records, uploads) = open_file_stores(&config.root)?;
    let upload_dir = uploads.uploads_root().to_path_buf();
    let app = build_router(
        AppState::new(records, uploads),
        &upload_dir,
        config.max_upload_bytes(),
    );

    let address = config.bind_addr();
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Portfolio running at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
