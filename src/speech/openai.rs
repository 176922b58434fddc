// src/speech/openai.rs
//! OpenAI speech endpoint client.

use super::SpeechSynthesizer;
use crate::chunking::split_for_synthesis;
use crate::config::SpeechSettings;
use crate::constants::{ERROR_BODY_PREVIEW_LENGTH, SPEECH_MAX_INPUT_CHARS, SPEECH_SPLIT_WINDOW};
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use reqwest::Client;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'static str,
}

/// Synthesizes long text by splitting it at sentence boundaries and
/// concatenating the MP3 streams of each piece.
#[derive(Clone)]
pub struct OpenAiSpeechClient {
    client: Client,
    settings: SpeechSettings,
    retry: RetryPolicy,
}

impl OpenAiSpeechClient {
    pub fn new(settings: SpeechSettings) -> Result<Self, AppError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            settings,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn synthesize_piece(&self, input: &str) -> Result<Vec<u8>, AppError> {
        let body = SpeechRequest {
            model: &self.settings.model,
            voice: &self.settings.voice,
            input,
            response_format: "mp3",
        };

        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(self.settings.api_key.expose())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Speech {
                status: status.as_u16(),
                message: text.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for OpenAiSpeechClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, AppError> {
        let pieces = split_for_synthesis(text, SPEECH_MAX_INPUT_CHARS, SPEECH_SPLIT_WINDOW);
        if pieces.is_empty() {
            return Err(AppError::Validation("Cannot synthesize empty text".to_string()));
        }

        let mut audio = Vec::new();
        for (i, piece) in pieces.iter().enumerate() {
            log::debug!(
                "Synthesizing piece {}/{} ({} chars)",
                i + 1,
                pieces.len(),
                piece.chars().count()
            );
            let bytes = retry_with_backoff(|| self.synthesize_piece(piece), &self.retry).await?;
            audio.extend_from_slice(&bytes);
        }
        Ok(audio)
    }
}
