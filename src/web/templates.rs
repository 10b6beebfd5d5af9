//! Page templates.
//!
//! Every page is a stand-alone minijinja file under `templates/`, compiled
//! into the binary with `include_str!`. Pages extend `base.html`, which owns
//! the document shell, the stylesheet, navigation and footer. Child pages
//! fill its blocks:
//!
//! - `title`, `heading`: document title and page header
//! - `tagline`: markup under the header, usually one `<p>`
//! - `nav`: defaults to the full navigation; pages override it to hide it
//! - `content`: the page body
//! - `scripts`: extra `<script>` tags (`copy_script.html`)
//! - `footer_note`: text appended to the footer, including its ` | ` separator
//!
//! Shared fragments (stat boxes, log and post items, gallery grid) are macros
//! in `macros.html`, imported inside the blocks that use them.
//!
//! Names end in `.html` so minijinja auto-escapes every interpolated value.
//! Values that are already safe markup (percent-encoded links, formatted
//! dates, the stylesheet) are passed as safe strings from Rust.

/// Inline stylesheet for every page.
pub const STYLE: &str = include_str!("style.css");

const SOURCES: &[(&str, &str)] = &[
    ("base.html", include_str!("templates/base.html")),
    ("nav.html", include_str!("templates/nav.html")),
    ("copy_script.html", include_str!("templates/copy_script.html")),
    ("macros.html", include_str!("templates/macros.html")),
    ("home.html", include_str!("templates/home.html")),
    ("introduction.html", include_str!("templates/introduction.html")),
    ("assignments.html", include_str!("templates/assignments.html")),
    ("assignment_share.html", include_str!("templates/assignment_share.html")),
    (
        "assignment_not_found.html",
        include_str!("templates/assignment_not_found.html"),
    ),
    ("learning_log.html", include_str!("templates/learning_log.html")),
    ("lab.html", include_str!("templates/lab.html")),
    ("gallery.html", include_str!("templates/gallery.html")),
    ("social.html", include_str!("templates/social.html")),
    ("dashboard.html", include_str!("templates/dashboard.html")),
    ("profile.html", include_str!("templates/profile.html")),
    ("contact.html", include_str!("templates/contact.html")),
    ("share.html", include_str!("templates/share.html")),
    ("not_found.html", include_str!("templates/not_found.html")),
    ("error.html", include_str!("templates/error.html")),
];

/// Source of the named template, if there is one.
pub fn source(name: &str) -> Option<&'static str> {
    SOURCES
        .iter()
        .find(|(template, _)| *template == name)
        .map(|(_, source)| *source)
}

/// Names of all templates.
pub fn names() -> impl Iterator<Item = &'static str> {
    SOURCES.iter().map(|(name, _)| *name)
}
