// src/speech/mod.rs
//! Text-to-speech synthesis.

mod openai;

pub use openai::OpenAiSpeechClient;

use crate::error::AppError;

/// Turns text into encoded audio.
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesizes `text` into one MP3 stream.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, AppError>;
}
