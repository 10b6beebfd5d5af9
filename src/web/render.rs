//! Page rendering.
//!
//! Builds template contexts from the read models in [`crate::pages`] and
//! renders them with the templates in [`super::templates`]. The minijinja
//! environment auto-escapes every interpolated value; links and dates built
//! here are handed over as safe strings once their parts are encoded.

use axum::http::StatusCode;
use chrono::{DateTime, Datelike, Utc};
use minijinja::{Environment, Value, context};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::templates;
use crate::models::{Collection, ContactMessage, LogEntry, Profile, SocialPost, Upload};
use crate::pages::{
    AssignmentShareView, DEFAULT_PROFILE_NAME, DashboardView, HomeView, LabView,
    LearningLogView, PREVIEW_LIMIT, Preview, ShareView,
};

pub type RenderResult = Result<String, minijinja::Error>;

/// Characters of a learning log entry shown on the public share page.
const SHARE_EXCERPT_CHARS: usize = 100;

/// Host used for share links when the request has no usable Host header.
const FALLBACK_HOST: &str = "localhost";

static HOST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9.-]+|\[[0-9A-Fa-f:.]+\])(?::[0-9]{1,5})?$")
        .expect("host pattern is valid")
});

static TEMPLATES: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.set_loader(|name| Ok(templates::source(name).map(str::to_string)));
    env.add_global("style", Value::from_safe_string(templates::STYLE.to_string()));
    env.add_function("current_year", || Utc::now().year());
    env.add_function("today", || date_value(Some(Utc::now())));
    env
});

fn render<S: Serialize>(name: &str, ctx: S) -> RenderResult {
    TEMPLATES.get_template(name)?.render(ctx)
}

/// Percent-encode `s` as a single URL path segment.
///
/// Only RFC 3986 unreserved characters pass through unchanged.
pub fn encode_path_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

/// Format a timestamp as a short date (`10/19/2026`).
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(d) => d.format("%-m/%-d/%Y").to_string(),
        None => "Unknown date".to_string(),
    }
}

fn date_value(date: Option<DateTime<Utc>>) -> Value {
    Value::from_safe_string(format_date(date))
}

/// Link target for a stored upload.
fn upload_href(upload: &Upload) -> String {
    format!(
        "{}/{}",
        upload.category.url_prefix(),
        encode_path_segment(&upload.stored_name)
    )
}

fn excerpt(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// `http://<host>` origin for absolute share links.
///
/// Only hosts made of name, IP literal and port characters are accepted;
/// anything else falls back to `localhost`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareBase(String);

impl ShareBase {
    pub fn from_host(host: Option<&str>) -> Self {
        let host = host
            .filter(|h| HOST_PATTERN.is_match(h))
            .unwrap_or(FALLBACK_HOST);
        Self(format!("http://{}", host))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Public link to the share page for one assignment.
    pub fn assignment_link(&self, stored_name: &str) -> String {
        format!("{}/share/assignment/{}", self.0, encode_path_segment(stored_name))
    }

    fn portfolio_link(&self) -> String {
        format!("{}/share/portfolio", self.0)
    }
}

#[derive(Serialize)]
struct UploadLink {
    name: String,
    href: Value,
}

impl From<&Upload> for UploadLink {
    fn from(upload: &Upload) -> Self {
        Self {
            name: upload.stored_name.clone(),
            href: Value::from_safe_string(upload_href(upload)),
        }
    }
}

fn upload_links(uploads: &[Upload]) -> Vec<UploadLink> {
    uploads.iter().map(UploadLink::from).collect()
}

#[derive(Serialize)]
struct AssignmentLink {
    name: String,
    href: Value,
    share_link: Value,
}

#[derive(Serialize)]
struct EntryItem {
    title: String,
    content: String,
    date: Value,
}

impl EntryItem {
    fn new(entry: &LogEntry, content: String) -> Self {
        Self {
            title: entry.title.clone(),
            content,
            date: date_value(entry.date),
        }
    }
}

impl From<&LogEntry> for EntryItem {
    fn from(entry: &LogEntry) -> Self {
        Self::new(entry, entry.content.clone())
    }
}

#[derive(Serialize)]
struct PostItem {
    name: String,
    message: String,
    date: Value,
}

impl From<&SocialPost> for PostItem {
    fn from(post: &SocialPost) -> Self {
        Self {
            name: post.name.clone(),
            message: post.message.clone(),
            date: date_value(post.date),
        }
    }
}

#[derive(Serialize)]
struct MessageItem {
    name: String,
    email: String,
    message: String,
    date: Value,
}

#[derive(Serialize)]
struct PreviewContext<T> {
    items: Vec<T>,
    total: usize,
    has_more: bool,
}

impl<T> PreviewContext<T> {
    fn new<S>(preview: &Preview<S>, item: impl Fn(&S) -> T) -> Self {
        Self {
            items: preview.items.iter().map(item).collect(),
            total: preview.total,
            has_more: preview.has_more(),
        }
    }
}

pub fn home(view: &HomeView, base: &ShareBase) -> RenderResult {
    render(
        "home.html",
        context! {
            portfolio_link => Value::from_safe_string(base.portfolio_link()),
            assignments => view.assignments,
            videos => usize::from(view.latest_video.is_some()),
            gallery => view.gallery,
            learning_entries => view.learning_entries,
            latest_video => view.latest_video.as_ref().map(UploadLink::from),
        },
    )
}

pub fn introduction(videos: &[Upload]) -> RenderResult {
    render("introduction.html", context! { videos => upload_links(videos) })
}

pub fn assignments(assignments: &[Upload], base: &ShareBase) -> RenderResult {
    let assignments: Vec<AssignmentLink> = assignments
        .iter()
        .map(|a| AssignmentLink {
            name: a.stored_name.clone(),
            href: Value::from_safe_string(upload_href(a)),
            share_link: Value::from_safe_string(base.assignment_link(&a.stored_name)),
        })
        .collect();
    render("assignments.html", context! { assignments })
}

pub fn assignment_share(view: &AssignmentShareView) -> RenderResult {
    let profile = &view.profile;
    render(
        "assignment_share.html",
        context! {
            upload => UploadLink::from(&view.upload),
            uploaded => date_value(Some(view.upload.created_at.unwrap_or(view.upload.modified))),
            student => or_placeholder(&profile.name, "(No name set)"),
            from_name => or_placeholder(&profile.name, DEFAULT_PROFILE_NAME),
            about_name => or_placeholder(&profile.name, "(Name not set)"),
            about_bio => or_placeholder(&profile.bio, "(Bio not set)"),
        },
    )
}

pub fn assignment_not_found() -> RenderResult {
    render("assignment_not_found.html", context! {})
}

pub fn learning_log(view: &LearningLogView) -> RenderResult {
    let entries: Vec<EntryItem> = view
        .entries
        .iter()
        .chain(view.lab.iter())
        .map(EntryItem::from)
        .collect();
    render(
        "learning_log.html",
        context! {
            entries,
            custom_count => view.entries.len(),
            lab_count => view.lab.len(),
            total => view.total(),
        },
    )
}

pub fn lab(view: &LabView) -> RenderResult {
    let count = view.entries.len();
    let (title, heading, tagline, record, note) = match view.collection {
        Collection::PseLab => (
            "PSE Lab | Personality Enhancement".to_string(),
            "🧪 PSE Lab – Personality & Skill Enhancement",
            "Confidence Building & Public Speaking Development Record",
            format!("📘 Lab Record – {} Skill Enhancement Activities", count),
            "PSE Lab Record",
        ),
        _ => (
            format!("PESE Lab | {} Activities", count),
            "🧪 PESE Lab – Personality & Public Speaking Enhancement",
            "Skill Development Activities Record",
            format!("📘 Lab Record – {} Activities", count),
            "PESE Lab Record",
        ),
    };
    let entries: Vec<EntryItem> = view.entries.iter().map(EntryItem::from).collect();
    render(
        "lab.html",
        context! { title, heading, tagline, record, note, entries },
    )
}

pub fn gallery(images: &[Upload]) -> RenderResult {
    render("gallery.html", context! { images => upload_links(images) })
}

pub fn social(posts: &[SocialPost]) -> RenderResult {
    let posts: Vec<PostItem> = posts.iter().map(PostItem::from).collect();
    render("social.html", context! { posts })
}

pub fn dashboard(view: &DashboardView) -> RenderResult {
    render(
        "dashboard.html",
        context! {
            counts => view.counts,
            total => view.total,
            activity => view.activity.label(),
        },
    )
}

pub fn profile(profile: &Profile) -> RenderResult {
    render(
        "profile.html",
        context! {
            name => &profile.name,
            bio => &profile.bio,
            preview_name => or_placeholder(&profile.name, "(Your Name)"),
            preview_bio => or_placeholder(&profile.bio, "(Your bio will appear here)"),
        },
    )
}

pub fn contact(messages: &[ContactMessage]) -> RenderResult {
    let messages: Vec<MessageItem> = messages
        .iter()
        .map(|m| MessageItem {
            name: m.name.clone(),
            email: m.email.clone(),
            message: m.message.clone(),
            date: date_value(m.date),
        })
        .collect();
    render("contact.html", context! { messages })
}

pub fn share(view: &ShareView) -> RenderResult {
    render(
        "share.html",
        context! {
            name => view.display_name(),
            about_name => or_placeholder(&view.profile.name, "(Name not set)"),
            about_bio => or_placeholder(&view.profile.bio, "(Bio not set)"),
            videos => upload_links(&view.videos),
            assignments => upload_links(&view.assignments),
            gallery => upload_links(&view.gallery),
            learning_log => PreviewContext::new(&view.learning_log, |e| {
                EntryItem::new(e, excerpt(&e.content, SHARE_EXCERPT_CHARS))
            }),
            social => PreviewContext::new(&view.social, |p| PostItem::from(p)),
            preview_limit => PREVIEW_LIMIT,
        },
    )
}

pub fn not_found(path: &str) -> RenderResult {
    render("not_found.html", context! { path })
}

/// Error page for a failed request.
pub fn error_page(status: StatusCode, message: &str) -> RenderResult {
    render(
        "error.html",
        context! {
            code => status.as_u16(),
            reason => status.canonical_reason().unwrap_or("Error"),
            message,
        },
    )
}
