// src/output/mod.rs
//! Output handling with clear separation of planning and execution.
//!
//! Artifacts are planned by pure functions and written by `deliver`.

pub mod csv;
pub mod export;
pub mod media;
mod paths;
mod types;
mod writer;

// Re-export the public interface
pub use export::{plan_export, read_manifest, ExportManifest, ExportedPage, PageMetadata};
pub use media::{record_audio, scan_sidecars, MediaRecord};
pub use paths::{file_stem, get_relative_path, sanitize_filename, short_id, SlugAllocator};
pub use types::{DeliveryTarget, OutputPlan, OutputReport};
pub use writer::{deliver, deliver_all};
