// src/storage/mod.rs
//! Object storage for generated media.

mod r2;
pub mod sigv4;

pub use r2::R2ObjectStore;

use crate::constants::AUDIO_KEY_PREFIX;
use crate::error::AppError;

/// Somewhere to put bytes and get a URL back.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads `bytes` under `key` and returns the object's public URL.
    async fn put_object(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, AppError>;
}

/// `audio/<slug>.mp3`
pub fn audio_object_key(slug: &str) -> String {
    format!("{}/{}.mp3", AUDIO_KEY_PREFIX, slug)
}
