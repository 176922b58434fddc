// src/output/export.rs
//! Export artifacts: per-page markdown and JSON metadata, the manifest and
//! the tracking sheet.

use super::csv::tracking_sheet;
use super::paths::{artifact_path, get_relative_path};
use super::types::{DeliveryTarget, OutputPlan};
use crate::constants::{MANIFEST_FILE_NAME, TRACKING_SHEET_FILE_NAME};
use crate::error::AppError;
use crate::model::properties::{audio_link, page_status, page_title, video_link};
use crate::model::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// `<slug>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// Markdown file, relative to the export directory.
    pub file: String,
    pub url: String,
    pub status: String,
    pub audio_url: Option<String>,
    pub video_url: Option<String>,
    pub exported_at: DateTime<Utc>,
}

impl PageMetadata {
    /// Metadata for `page` exported under the file stem `slug`.
    pub fn from_page(page: &Page, slug: &str, exported_at: DateTime<Utc>) -> Self {
        Self {
            id: page.id.to_dashed(),
            title: page_title(page),
            slug: slug.to_string(),
            file: format!("{}.md", slug),
            url: page.url.clone(),
            status: page_status(page),
            audio_url: audio_link(page),
            video_url: video_link(page),
            exported_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub file: String,
}

/// `manifest.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    /// The database the pages came from.
    pub source: String,
    pub exported_at: DateTime<Utc>,
    pub page_count: usize,
    pub pages: Vec<ManifestEntry>,
}

impl ExportManifest {
    pub fn find_slug(&self, slug: &str) -> Option<&ManifestEntry> {
        self.pages.iter().find(|entry| entry.slug == slug)
    }
}

/// One page ready to be written.
#[derive(Debug, Clone)]
pub struct ExportedPage {
    pub metadata: PageMetadata,
    /// Structured body text, without the title heading.
    pub body: String,
}

impl ExportedPage {
    pub fn markdown(&self) -> String {
        if self.body.is_empty() {
            format!("# {}\n", self.metadata.title)
        } else {
            format!("# {}\n\n{}", self.metadata.title, self.body)
        }
    }
}

/// Plans every file of an export into `out_dir`.
pub fn plan_export(
    out_dir: &Path,
    source: &str,
    pages: &[ExportedPage],
    exported_at: DateTime<Utc>,
) -> Result<OutputPlan, AppError> {
    let mut plan = OutputPlan::new().with_operation(DeliveryTarget::CreateDirectory {
        path: out_dir.to_path_buf(),
    });

    for page in pages {
        let stem = &page.metadata.slug;
        let markdown_path = artifact_path(out_dir, stem, ".md");
        // Guard against slugs that would escape the export directory.
        let relative = get_relative_path(out_dir, &markdown_path)?;
        if relative != page.metadata.file {
            return Err(AppError::PathError(format!(
                "{} does not resolve inside {}",
                page.metadata.file,
                out_dir.display()
            )));
        }

        plan.push(DeliveryTarget::write_file(markdown_path, page.markdown()));
        plan.push(DeliveryTarget::write_file(
            artifact_path(out_dir, stem, ".json"),
            to_pretty_json(&page.metadata)?,
        ));
    }

    let manifest = ExportManifest {
        source: source.to_string(),
        exported_at,
        page_count: pages.len(),
        pages: pages
            .iter()
            .map(|page| ManifestEntry {
                id: page.metadata.id.clone(),
                slug: page.metadata.slug.clone(),
                title: page.metadata.title.clone(),
                file: page.metadata.file.clone(),
            })
            .collect(),
    };
    plan.push(DeliveryTarget::write_file(
        out_dir.join(MANIFEST_FILE_NAME),
        to_pretty_json(&manifest)?,
    ));

    let metadata: Vec<PageMetadata> = pages.iter().map(|page| page.metadata.clone()).collect();
    plan.push(DeliveryTarget::write_file(
        out_dir.join(TRACKING_SHEET_FILE_NAME),
        tracking_sheet(&metadata),
    ));

    Ok(plan)
}

/// Reads `manifest.json` from an export directory.
pub fn read_manifest(dir: &Path) -> Result<ExportManifest, AppError> {
    let path = dir.join(MANIFEST_FILE_NAME);
    let text = std::fs::read_to_string(&path)?;
    serde_json::from_str(&text).map_err(|source| AppError::JsonParseError { path, source })
}

pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}
