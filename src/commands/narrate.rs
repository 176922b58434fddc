// src/commands/narrate.rs
//! `narrate`: page text → speech → object store → `AudioLink`.

use crate::api::{BlockTreeFetcher, NotionRepository, PropertyUpdate, PropertyUpdates};
use crate::chunking::ChunkedFieldWriter;
use crate::config::NarrateArgs;
use crate::constants::{AUDIO_CONTENT_TYPE, MIN_NARRATION_CHARS};
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::formatting::{assemble, ExtractMode};
use crate::model::properties::{audio_link, audio_link_property, has_content64, page_slug, page_title};
use crate::model::Page;
use crate::output::{file_stem, record_audio};
use crate::pipeline::{collect_pages, Scope};
use crate::report::RunReport;
use crate::speech::SpeechSynthesizer;
use crate::storage::{audio_object_key, ObjectStore};
use crate::types::NotionId;
use base64::prelude::*;

/// The external services narration talks to.
pub struct Narrator<'a> {
    pub repo: &'a dyn NotionRepository,
    pub speech: &'a dyn SpeechSynthesizer,
    pub store: &'a dyn ObjectStore,
    pub retry: RetryPolicy,
}

/// Why a page needs no narration, checked in order.
fn skip_reason(page: &Page, store_base64: bool) -> Option<&'static str> {
    if page.archived {
        Some("archived")
    } else if store_base64 && has_content64(page) {
        Some("already has Content64")
    } else if !store_base64 && audio_link(page).is_some() {
        Some("already has AudioLink")
    } else {
        None
    }
}

impl Narrator<'_> {
    pub async fn run(&self, args: &NarrateArgs) -> Result<RunReport, AppError> {
        let scope = Scope::from_args(args.scope.page.as_deref(), args.scope.database.as_deref())?;
        let pages = collect_pages(self.repo, &scope, &self.retry).await?;
        let writer = ChunkedFieldWriter::new(args.write_policy());
        let mut report = RunReport::new("narrate");

        for page in &pages {
            if args
                .batch
                .is_some_and(|limit| report.processed_count() >= limit)
            {
                report.note(format!(
                    "Batch limit of {} reached; remaining pages left for the next run",
                    report.processed_count()
                ));
                break;
            }

            let title = page_title(page);
            if let Some(reason) = skip_reason(page, args.store_base64) {
                report.skipped(&title, reason);
                continue;
            }

            match self.narrate_page(page, args, &writer, &mut report).await {
                Ok(true) => report.processed(&title),
                Ok(false) => {}
                Err(e) => report.failed(&title, e.to_string()),
            }
        }

        Ok(report)
    }

    /// Returns `Ok(false)` when the page was skipped for its content.
    async fn narrate_page(
        &self,
        page: &Page,
        args: &NarrateArgs,
        writer: &ChunkedFieldWriter,
        report: &mut RunReport,
    ) -> Result<bool, AppError> {
        let title = page_title(page);
        let tree = BlockTreeFetcher::new(self.retry.clone())
            .fetch(self.repo, &NotionId::from(&page.id))
            .await;
        let text = assemble(tree.blocks(), ExtractMode::Flat);
        let length = text.chars().count();
        if length < MIN_NARRATION_CHARS {
            report.skipped(&title, format!("text too short ({} chars)", length));
            return Ok(false);
        }
        if tree.truncated {
            report.note(format!("{}: narrated from an incomplete block tree", title));
        }

        log::info!("Narrating '{}' ({} chars)", title, length);
        let audio = self.speech.synthesize(&text).await?;

        let stem = file_stem(&page_slug(page));
        let url = self
            .store
            .put_object(&audio_object_key(&stem), &audio, AUDIO_CONTENT_TYPE)
            .await?;

        // Content64 before AudioLink: a page whose payload was not stored
        // keeps no AudioLink.
        if args.store_base64 {
            let encoded = BASE64_STANDARD.encode(&audio);
            let outcome = writer.write(self.repo, &page.id, &encoded).await?;
            if !outcome.complete {
                report.note(format!(
                    "{}: only {} of {} Content64 field(s) stored",
                    title, outcome.fields_written, outcome.fields_planned
                ));
            }
        }

        let mut updates = PropertyUpdates::new();
        updates.insert(
            audio_link_property(page).to_string(),
            PropertyUpdate::Url(Some(url.clone())),
        );
        retry_with_backoff(
            || self.repo.update_page_properties(&page.id, &updates),
            &self.retry,
        )
        .await?;

        if let Some(dir) = &args.media_dir {
            if let Err(e) = record_audio(dir, &stem, &url) {
                log::warn!("Could not write media sidecar for {}: {}", stem, e);
                report.note(format!("{}: sidecar not written ({})", title, e));
            }
        }

        Ok(true)
    }
}
