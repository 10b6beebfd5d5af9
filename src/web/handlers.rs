//! Route handlers.
//!
//! GET handlers build a read model through [`crate::pages::Pages`] and render
//! it. POST handlers write through one of the stores and answer with a
//! `303 See Other` back to the page they came from.

use axum::{
    Form,
    extract::{
        Multipart, Path, State,
        multipart::MultipartRejection,
        rejection::{FormRejection, PathRejection},
    },
    http::{HeaderMap, StatusCode, Uri, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{debug, info};

use super::error::WebError;
use super::render::{self, ShareBase};
use super::server::AppState;
use crate::models::{Collection, Profile, Record, UploadCategory};

type PageResult = Result<Html<String>, WebError>;

/// Share link origin from the request's Host header.
fn share_base(headers: &HeaderMap) -> ShareBase {
    ShareBase::from_host(headers.get(header::HOST).and_then(|h| h.to_str().ok()))
}

/// A submitted field must be present and not blank.
fn required(value: Option<String>, field: &'static str) -> Result<String, WebError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(WebError::MissingField(field)),
    }
}

/// Run store I/O on the blocking pool.
async fn blocking<T, F>(state: &AppState, task: F) -> Result<T, WebError>
where
    F: FnOnce(&AppState) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    Ok(tokio::task::spawn_blocking(move || task(&state)).await??)
}

pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> PageResult {
    let view = blocking(&state, |s| s.pages().home()).await?;
    Ok(Html(render::home(&view, &share_base(&headers))?))
}

pub async fn introduction(State(state): State<AppState>) -> PageResult {
    let videos = blocking(&state, |s| s.pages().uploads(UploadCategory::Video)).await?;
    Ok(Html(render::introduction(&videos)?))
}

pub async fn assignments(State(state): State<AppState>, headers: HeaderMap) -> PageResult {
    let assignments =
        blocking(&state, |s| s.pages().uploads(UploadCategory::Assignment)).await?;
    Ok(Html(render::assignments(&assignments, &share_base(&headers))?))
}

pub async fn gallery(State(state): State<AppState>) -> PageResult {
    let images = blocking(&state, |s| s.pages().uploads(UploadCategory::Image)).await?;
    Ok(Html(render::gallery(&images)?))
}

/// Public page for a single assignment. Unknown names get the 404 page.
pub async fn share_assignment(
    State(state): State<AppState>,
    filename: Result<Path<String>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(filename) = filename?;
    let name = filename.clone();
    match blocking(&state, move |s| s.pages().assignment_share(&name)).await? {
        Some(view) => Ok(Html(render::assignment_share(&view)?).into_response()),
        None => {
            debug!(filename = %filename, "shared assignment not found");
            Ok((StatusCode::NOT_FOUND, Html(render::assignment_not_found()?)).into_response())
        }
    }
}

pub async fn learning_log(State(state): State<AppState>) -> PageResult {
    let view = blocking(&state, |s| s.pages().learning_log()).await?;
    Ok(Html(render::learning_log(&view)?))
}

pub async fn pse_lab(State(state): State<AppState>) -> PageResult {
    let view = blocking(&state, |s| s.pages().lab(Collection::PseLab)).await?;
    Ok(Html(render::lab(&view)?))
}

pub async fn pese_lab(State(state): State<AppState>) -> PageResult {
    let view = blocking(&state, |s| s.pages().lab(Collection::PeseLab)).await?;
    Ok(Html(render::lab(&view)?))
}

pub async fn social(State(state): State<AppState>) -> PageResult {
    let posts = blocking(&state, |s| Ok(s.pages().social())).await?;
    Ok(Html(render::social(&posts)?))
}

pub async fn dashboard(State(state): State<AppState>) -> PageResult {
    let view = blocking(&state, |s| s.pages().dashboard()).await?;
    Ok(Html(render::dashboard(&view)?))
}

pub async fn profile(State(state): State<AppState>) -> PageResult {
    let profile = blocking(&state, |s| Ok(s.pages().profile())).await?;
    Ok(Html(render::profile(&profile)?))
}

pub async fn contact(State(state): State<AppState>) -> PageResult {
    let messages = blocking(&state, |s| Ok(s.pages().contacts())).await?;
    Ok(Html(render::contact(&messages)?))
}

pub async fn share_portfolio(State(state): State<AppState>) -> PageResult {
    let view = blocking(&state, |s| s.pages().share()).await?;
    Ok(Html(render::share(&view)?))
}

pub async fn not_found(uri: Uri) -> Result<Response, WebError> {
    Ok((StatusCode::NOT_FOUND, Html(render::not_found(uri.path())?)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct LogForm {
    title: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostForm {
    name: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    name: Option<String>,
    bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
}

/// Append `record` to `collection` on the blocking pool.
async fn append(
    state: &AppState,
    collection: Collection,
    record: Record,
) -> Result<(), WebError> {
    blocking(state, move |s| s.records.append(collection, record).map(|_| ())).await
}

pub async fn add_learning_log(
    State(state): State<AppState>,
    form: Result<Form<LogForm>, FormRejection>,
) -> Result<Redirect, WebError> {
    let Form(form) = form?;
    let record = Record::new()
        .with("title", required(form.title, "title")?)
        .with("content", required(form.content, "content")?);
    append(&state, Collection::LearningLog, record).await?;
    Ok(Redirect::to("/learning-log"))
}

pub async fn add_social_post(
    State(state): State<AppState>,
    form: Result<Form<PostForm>, FormRejection>,
) -> Result<Redirect, WebError> {
    let Form(form) = form?;
    let record = Record::new()
        .with("name", required(form.name, "name")?)
        .with("message", required(form.message, "message")?);
    append(&state, Collection::Social, record).await?;
    Ok(Redirect::to("/social"))
}

pub async fn save_profile(
    State(state): State<AppState>,
    form: Result<Form<ProfileForm>, FormRejection>,
) -> Result<Redirect, WebError> {
    let Form(form) = form?;
    let profile = Profile::new(required(form.name, "name")?, required(form.bio, "bio")?);
    blocking(&state, move |s| s.records.save_profile(&profile)).await?;
    info!("profile updated");
    Ok(Redirect::to("/profile"))
}

pub async fn add_contact(
    State(state): State<AppState>,
    form: Result<Form<ContactForm>, FormRejection>,
) -> Result<Redirect, WebError> {
    let Form(form) = form?;
    let record = Record::new()
        .with("name", required(form.name, "name")?)
        .with("email", required(form.email, "email")?)
        .with("message", required(form.message, "message")?);
    append(&state, Collection::Contacts, record).await?;
    Ok(Redirect::to("/contact"))
}

/// Store the first file part sent under `category`'s form field.
async fn receive_upload(
    state: &AppState,
    category: UploadCategory,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, WebError> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if UploadCategory::from_field(field.name().unwrap_or_default()) != category {
            continue;
        }
        // Browsers send an empty file name when no file was chosen.
        let Some(file_name) = field
            .file_name()
            .filter(|n| !n.is_empty())
            .map(str::to_string)
        else {
            continue;
        };

        let bytes = field.bytes().await?;
        let size = bytes.len();
        let stored =
            blocking(state, move |s| s.uploads.save(category, &file_name, &bytes)).await?;
        info!(%category, stored = %stored, size, "upload saved");
        return Ok(stored);
    }
    Err(WebError::MissingUpload(category.form_field()))
}

pub async fn upload_video(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Redirect, WebError> {
    receive_upload(&state, UploadCategory::Video, multipart).await?;
    Ok(Redirect::to("/introduction"))
}

pub async fn upload_assignment(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Redirect, WebError> {
    receive_upload(&state, UploadCategory::Assignment, multipart).await?;
    Ok(Redirect::to("/assignments"))
}

pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Redirect, WebError> {
    receive_upload(&state, UploadCategory::Image, multipart).await?;
    Ok(Redirect::to("/gallery"))
}
