// src/output/paths.rs
//! Pure functions for path calculations and artifact naming.

use crate::error::AppError;
use crate::types::NotionId;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Sanitizes a string to be safe for use as a filename.
pub fn sanitize_filename(name: &str) -> String {
    let mut safe_name = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>();

    safe_name = safe_name.trim().trim_matches('.').to_string();

    if safe_name.chars().count() > 100 {
        safe_name = safe_name.chars().take(100).collect();
    }

    if safe_name.is_empty() {
        safe_name = "unnamed".to_string();
    }

    safe_name
}

/// File stem for a page slug: filesystem-safe, `untitled` when empty.
///
/// Every artifact keyed on a page (markdown, metadata, media sidecar, audio
/// object) goes through here so the names agree across commands.
pub fn file_stem(slug: &str) -> String {
    sanitize_filename(if slug.is_empty() { "untitled" } else { slug })
}

/// First eight hex digits of an id, used to tell colliding slugs apart.
pub fn short_id(id: &NotionId) -> &str {
    let raw = id.as_str();
    &raw[..raw.len().min(8)]
}

/// Hands out file stems that are unique within one export.
#[derive(Debug, Default)]
pub struct SlugAllocator {
    taken: HashSet<String>,
}

impl SlugAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `slug` itself, or `slug-<short id>` if it is already in use.
    pub fn allocate(&mut self, slug: &str, id: &NotionId) -> String {
        let base = file_stem(slug);
        let candidate = if self.taken.contains(&base) {
            format!("{}-{}", base, short_id(id))
        } else {
            base
        };
        self.taken.insert(candidate.clone());
        candidate
    }
}

/// `<dir>/<stem><suffix>`
pub fn artifact_path(dir: &Path, stem: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{}{}", stem, suffix))
}

/// Calculates a relative path from one directory to a file, with forward
/// slashes.
pub fn get_relative_path(from_dir: &Path, to: &Path) -> Result<String, AppError> {
    let relative = pathdiff::diff_paths(to, from_dir).ok_or_else(|| {
        AppError::PathError(format!(
            "Could not calculate relative path from {} to {}",
            from_dir.display(),
            to.display()
        ))
    })?;

    Ok(relative.to_string_lossy().replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Hello/World"), "Hello_World");
        assert_eq!(sanitize_filename("Test:File*Name"), "Test_File_Name");
        assert_eq!(sanitize_filename("   spaces   "), "spaces");
        assert_eq!(sanitize_filename("...dots..."), "dots");
        assert_eq!(sanitize_filename(""), "unnamed");
    }

    #[test]
    fn colliding_slugs_get_short_id_suffix() {
        let first = NotionId::parse("1234567890abcdef1234567890abcdef").unwrap();
        let second = NotionId::parse("abcdef0123456789abcdef0123456789").unwrap();
        let mut slugs = SlugAllocator::new();

        assert_eq!(slugs.allocate("intro", &first), "intro");
        assert_eq!(slugs.allocate("intro", &second), "intro-abcdef01");
        assert_eq!(slugs.allocate("", &first), "untitled");
    }

    #[test]
    fn file_stems_stay_inside_the_directory() {
        assert_eq!(file_stem("Q&A: intro"), "Q&A_ intro");
        assert_eq!(file_stem("../escape"), "_escape");
        assert_eq!(file_stem("a/b"), "a_b");
        assert_eq!(file_stem(""), "untitled");
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        let rel = get_relative_path(Path::new("/out"), Path::new("/out/pages/a.md")).unwrap();
        assert_eq!(rel, "pages/a.md");
    }
}
