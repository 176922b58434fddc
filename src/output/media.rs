// src/output/media.rs
//! `<slug>.media.json` sidecars recording where generated media lives.

use super::export::to_pretty_json;
use super::paths::artifact_path;
use crate::constants::MEDIA_SIDECAR_SUFFIX;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub slug: String,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    pub processed_at: DateTime<Utc>,
}

impl MediaRecord {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            audio_url: None,
            video_url: None,
            processed_at: Utc::now(),
        }
    }

    pub fn has_media(&self) -> bool {
        self.audio_url.is_some() || self.video_url.is_some()
    }
}

pub fn sidecar_path(dir: &Path, slug: &str) -> PathBuf {
    artifact_path(dir, slug, MEDIA_SIDECAR_SUFFIX)
}

pub fn read_sidecar(path: &Path) -> Result<MediaRecord, AppError> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| AppError::JsonParseError {
        path: path.to_path_buf(),
        source,
    })
}

/// Records a new audio URL, keeping any video URL already on file.
pub fn record_audio(dir: &Path, slug: &str, audio_url: &str) -> Result<PathBuf, AppError> {
    let path = sidecar_path(dir, slug);
    let mut record = if path.exists() {
        read_sidecar(&path)?
    } else {
        MediaRecord::new(slug)
    };
    record.audio_url = Some(audio_url.to_string());
    record.processed_at = Utc::now();

    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, to_pretty_json(&record)?)?;
    log::debug!("Wrote {}", path.display());
    Ok(path)
}

/// Every sidecar in `dir`, sorted by file name. Unreadable sidecars are
/// returned as errors alongside their path so the caller can report them.
pub fn scan_sidecars(dir: &Path) -> Result<Vec<(PathBuf, Result<MediaRecord, AppError>)>, AppError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(MEDIA_SIDECAR_SUFFIX))
        })
        .collect();
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|path| {
            let record = read_sidecar(&path);
            (path, record)
        })
        .collect())
}
