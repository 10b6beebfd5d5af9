//! Common test utilities for folio integration tests.
//!
//! Provides `TestEnv` for isolated portfolio roots, plus helpers that drive
//! the router in-process with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use assert_cmd::Command;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use folio::storage::open_file_stores;
use folio::web::{AppState, build_router};

pub use tempfile::TempDir;

/// Host header sent with every in-process request.
pub const TEST_HOST: &str = "portfolio.test";

/// Body limit for routers built by `TestEnv::router`.
pub const TEST_MAX_UPLOAD: usize = 1024 * 1024;

const BOUNDARY: &str = "folio-test-boundary";

/// A test environment with an isolated portfolio root.
pub struct TestEnv {
    pub root_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            root_dir: TempDir::new().unwrap(),
        }
    }

    /// Get the path to the portfolio root.
    pub fn path(&self) -> &std::path::Path {
        self.root_dir.path()
    }

    /// Get a Command for the folio binary rooted at this environment.
    ///
    /// Clears the `FOLIO_*` variables so the caller's shell cannot leak in.
    pub fn folio(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_folio"));
        cmd.env("FOLIO_ROOT", self.path());
        cmd.env_remove("FOLIO_PORT");
        cmd.env_remove("FOLIO_HOST");
        cmd.env_remove("FOLIO_MAX_UPLOAD_MB");
        cmd.env("RUST_LOG", "off");
        cmd
    }

    /// Router over file stores rooted at this environment.
    pub fn router(&self) -> Router {
        let (records, uploads) = open_file_stores(self.path()).unwrap();
        let upload_dir = uploads.uploads_root().to_path_buf();
        build_router(AppState::new(records, uploads), &upload_dir, TEST_MAX_UPLOAD)
    }

    /// Read a collection file as JSON.
    pub fn read_json(&self, file: &str) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.path().join(file)).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    /// Names of the files stored in an upload directory.
    pub fn stored_files(&self, dir: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.path().join("uploads").join(dir))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Status, redirect target, content type and body of a response.
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("text/html"))
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let header_value = |name: header::HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let location = header_value(header::LOCATION);
    let content_type = header_value(header::CONTENT_TYPE);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    TestResponse {
        status,
        location,
        content_type,
        body,
    }
}

pub async fn get(router: &Router, path: &str) -> TestResponse {
    let request = Request::builder()
        .uri(path)
        .header(header::HOST, TEST_HOST)
        .body(Body::empty())
        .unwrap();
    send(router, request).await
}

/// POST an urlencoded form body such as `title=a&content=b`.
pub async fn post_form(router: &Router, path: &str, body: &str) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::HOST, TEST_HOST)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

/// POST `body` with an arbitrary content type.
pub async fn post_raw(router: &Router, path: &str, content_type: &str, body: &str) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::HOST, TEST_HOST)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

/// POST a single file part as `multipart/form-data`.
pub async fn post_file(
    router: &Router,
    path: &str,
    field: &str,
    file_name: &str,
    bytes: &[u8],
) -> TestResponse {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::HOST, TEST_HOST)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(router, request).await
}
