//! Page property naming conventions.
//!
//! Workspaces name the same logical field in several ways. Each lookup tries
//! a fixed candidate list in order and takes the first present, non-empty value.

use super::{Page, PropertyTypeValue};
use lazy_static::lazy_static;
use regex::Regex;

pub const TITLE_CANDIDATES: &[&str] = &["Name", "Title", "name", "title"];
pub const SLUG_CANDIDATES: &[&str] = &["Slug-AI", "slug-ai", "Slug"];
pub const AUDIO_LINK_CANDIDATES: &[&str] = &["AudioLink", "audiolink"];
pub const VIDEO_LINK_CANDIDATES: &[&str] = &["VideoLink"];
pub const STATUS_CANDIDATES: &[&str] = &["Status", "status"];

/// Base name of the chunked base64 payload fields.
pub const CONTENT64_FIELD: &str = "Content64";

pub const UNTITLED: &str = "Untitled";

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").expect("static regex");
}

/// The page's display title.
///
/// Title properties contribute the plain text of their first span only.
pub fn page_title(page: &Page) -> String {
    TITLE_CANDIDATES
        .iter()
        .find_map(|name| page.property(name).and_then(first_span_text))
        .or_else(|| {
            page.properties
                .values()
                .find_map(|p| first_span_text(&p.type_specific_value))
        })
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn first_span_text(value: &PropertyTypeValue) -> Option<String> {
    match value {
        PropertyTypeValue::Title { title } => title
            .first()
            .map(|span| span.plain_text.trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// An explicit slug property, else the slugified title.
pub fn page_slug(page: &Page) -> String {
    first_text(page, SLUG_CANDIDATES).unwrap_or_else(|| slugify(&page_title(page)))
}

/// Lowercases, turns each run of non-alphanumerics into `-`, trims dashes.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    NON_ALNUM
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

pub fn audio_link(page: &Page) -> Option<String> {
    first_text(page, AUDIO_LINK_CANDIDATES)
}

pub fn video_link(page: &Page) -> Option<String> {
    first_text(page, VIDEO_LINK_CANDIDATES)
}

/// Workflow status as shown in the tracking sheet. Empty when unset.
pub fn page_status(page: &Page) -> String {
    first_text(page, STATUS_CANDIDATES).unwrap_or_default()
}

/// Name of the property holding the first audio link the page declares,
/// falling back to the canonical name when none exists yet.
pub fn audio_link_property(page: &Page) -> &'static str {
    AUDIO_LINK_CANDIDATES
        .iter()
        .copied()
        .find(|name| page.property(name).is_some())
        .unwrap_or(AUDIO_LINK_CANDIDATES[0])
}

pub fn video_link_property(page: &Page) -> &'static str {
    VIDEO_LINK_CANDIDATES
        .iter()
        .copied()
        .find(|name| page.property(name).is_some())
        .unwrap_or(VIDEO_LINK_CANDIDATES[0])
}

pub fn has_content64(page: &Page) -> bool {
    page.property(CONTENT64_FIELD)
        .and_then(PropertyTypeValue::as_text)
        .is_some()
}

/// `Content64` for index 1, `Content64_N` afterwards.
pub fn content64_field_name(index: usize) -> String {
    if index <= 1 {
        CONTENT64_FIELD.to_string()
    } else {
        format!("{}_{}", CONTENT64_FIELD, index)
    }
}

fn first_text(page: &Page, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find_map(|name| page.property(name).and_then(PropertyTypeValue::as_text))
}
