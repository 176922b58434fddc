// src/chunking/writer.rs
//! Chunked payload writer: lays a long string out across numbered rich-text
//! properties (`Content64`, `Content64_2`, …) and writes them one by one.

use super::split::slice_fixed;
use crate::api::{NotionRepository, PropertyUpdate, PropertyUpdates};
use crate::constants::{
    FRAGILE_FIELD_PAUSE, FRAGILE_FIELD_SHRINK, MUTATION_PAUSE, RICH_TEXT_SPANS_PER_PROPERTY,
    RICH_TEXT_SPAN_MAX_CHARS,
};
use crate::error::{AppError, Result};
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::model::properties::content64_field_name;
use crate::types::PageId;
use std::time::Duration;

/// Field layout and pacing for chunked writes.
#[derive(Debug, Clone)]
pub struct WritePolicy {
    pub span_max_chars: usize,
    pub spans_per_field: usize,
    /// 1-based field positions the provider is known to reject when full.
    pub fragile_fields: Vec<usize>,
    /// Capacity multiplier applied to fragile fields.
    pub fragile_shrink: f64,
    pub inter_write_pause: Duration,
    /// Extra wait before writing a fragile field.
    pub fragile_pause: Duration,
    pub retry: RetryPolicy,
}

impl Default for WritePolicy {
    fn default() -> Self {
        Self {
            span_max_chars: RICH_TEXT_SPAN_MAX_CHARS,
            spans_per_field: RICH_TEXT_SPANS_PER_PROPERTY,
            fragile_fields: Vec::new(),
            fragile_shrink: FRAGILE_FIELD_SHRINK,
            inter_write_pause: MUTATION_PAUSE,
            fragile_pause: FRAGILE_FIELD_PAUSE,
            retry: RetryPolicy::default(),
        }
    }
}

impl WritePolicy {
    pub fn with_fragile_fields(mut self, fields: Vec<usize>) -> Self {
        self.fragile_fields = fields;
        self
    }

    pub fn is_fragile(&self, index: usize) -> bool {
        self.fragile_fields.contains(&index)
    }

    /// Chars one field may hold. Never less than one.
    pub fn field_capacity(&self, index: usize) -> usize {
        let full = self.span_max_chars.max(1) * self.spans_per_field.max(1);
        let capacity = if self.is_fragile(index) {
            (full as f64 * self.fragile_shrink).floor() as usize
        } else {
            full
        };
        capacity.max(1)
    }
}

/// One planned property write.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChunk {
    /// 1-based position.
    pub index: usize,
    pub name: String,
    pub spans: Vec<String>,
}

impl FieldChunk {
    pub fn char_count(&self) -> usize {
        self.spans.iter().map(|span| span.chars().count()).sum()
    }
}

/// Result of a chunked write that stored at least one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub fields_written: usize,
    pub fields_planned: usize,
    /// False when a later field failed and the stored payload is a prefix.
    pub complete: bool,
}

/// Lays `payload` out across as many fields as it needs.
pub fn plan_fields(payload: &str, policy: &WritePolicy) -> Vec<FieldChunk> {
    let mut fields = Vec::new();
    let mut rest = payload;
    let mut index = 1;

    while !rest.is_empty() {
        let capacity = policy.field_capacity(index);
        let cut = rest
            .char_indices()
            .nth(capacity)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        fields.push(FieldChunk {
            index,
            name: content64_field_name(index),
            spans: slice_fixed(&rest[..cut], policy.span_max_chars),
        });
        rest = &rest[cut..];
        index += 1;
    }
    fields
}

/// Writes planned fields sequentially, in increasing index order.
#[derive(Debug, Clone, Default)]
pub struct ChunkedFieldWriter {
    policy: WritePolicy,
}

impl ChunkedFieldWriter {
    pub fn new(policy: WritePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &WritePolicy {
        &self.policy
    }

    /// Writes `payload` into the page's content fields.
    ///
    /// Stops at the first failure that survives retries. Returns `Err` only
    /// when not a single field was stored.
    pub async fn write(
        &self,
        repo: &dyn NotionRepository,
        page: &PageId,
        payload: &str,
    ) -> Result<WriteOutcome> {
        let plan = plan_fields(payload, &self.policy);
        if plan.is_empty() {
            return Err(AppError::Validation(format!(
                "Nothing to write for page {}",
                page
            )));
        }

        let mut written = 0;
        for (position, field) in plan.iter().enumerate() {
            if position > 0 {
                pause(self.policy.inter_write_pause).await;
            }
            if self.policy.is_fragile(field.index) {
                log::debug!("{} is fragile, waiting before write", field.name);
                pause(self.policy.fragile_pause).await;
            }

            let mut updates = PropertyUpdates::new();
            updates.insert(
                field.name.clone(),
                PropertyUpdate::RichTextChunks(field.spans.clone()),
            );

            let result = retry_with_backoff(
                || repo.update_page_properties(page, &updates),
                &self.policy.retry,
            )
            .await;

            match result {
                Ok(()) => {
                    written += 1;
                    log::debug!(
                        "Wrote {} ({} chars) to page {}",
                        field.name,
                        field.char_count(),
                        page
                    );
                }
                Err(e) if written == 0 => {
                    return Err(AppError::PayloadNotWritten {
                        field: field.name.clone(),
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    log::warn!(
                        "Stored {} of {} fields on page {}; {} failed: {}",
                        written,
                        plan.len(),
                        page,
                        field.name,
                        e
                    );
                    break;
                }
            }
        }

        Ok(WriteOutcome {
            fields_written: written,
            fields_planned: plan.len(),
            complete: written == plan.len(),
        })
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
