// src/transform/convert.rs
//! Block type conversion: append a re-typed copy after the original, then
//! delete the original.

use super::{TransformOptions, TransformOutcome};
use crate::api::{NewBlock, NotionRepository, WalkedBlock};
use crate::error::AppError;
use crate::error_recovery::retry_with_backoff;
use crate::model::BlockKind;
use crate::types::NotionId;

/// Source and destination block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeConversion {
    pub from: BlockKind,
    pub to: BlockKind,
}

impl TypeConversion {
    pub const CHECKBOXES: TypeConversion = TypeConversion {
        from: BlockKind::ToDo,
        to: BlockKind::BulletedListItem,
    };

    pub const QUOTES: TypeConversion = TypeConversion {
        from: BlockKind::Quote,
        to: BlockKind::Paragraph,
    };

    pub const H1_DEMOTION: TypeConversion = TypeConversion {
        from: BlockKind::Heading1,
        to: BlockKind::Heading2,
    };
}

/// Converts every block of `conversion.from` in the page's tree.
///
/// Blocks with children are skipped: deleting them would take their nested
/// content along. The walk still reaches those children.
pub async fn convert_blocks(
    repo: &dyn NotionRepository,
    page: &NotionId,
    conversion: &TypeConversion,
    options: &TransformOptions,
) -> TransformOutcome {
    let tree = options.fetch(repo, page).await;
    let mut outcome = TransformOutcome::from_tree(&tree);

    for entry in tree.entries.iter() {
        if entry.block.kind() != conversion.from {
            continue;
        }
        if entry.block.has_children() {
            log::debug!(
                "Skipping {} {}: it has nested children",
                conversion.from,
                entry.block.id()
            );
            outcome.skipped += 1;
            continue;
        }

        outcome.matched += 1;
        if options.dry_run {
            log::info!(
                "Would convert {} {}: {}",
                conversion.from,
                entry.block.id(),
                entry.block.plain_text()
            );
            continue;
        }

        match convert_one(repo, entry, conversion, options).await {
            Ok(()) => outcome.applied += 1,
            Err(e) => {
                let message = e.to_string();
                options.log_block_failure(entry.block.id(), &message);
                outcome.failed.push((entry.block.id().clone(), message));
            }
        }
    }

    log::info!(
        "{} -> {} on {}: {} matched, {} converted, {} skipped, {} failed",
        conversion.from,
        conversion.to,
        page,
        outcome.matched,
        outcome.applied,
        outcome.skipped,
        outcome.failed.len()
    );
    outcome
}

async fn convert_one(
    repo: &dyn NotionRepository,
    entry: &WalkedBlock,
    conversion: &TypeConversion,
    options: &TransformOptions,
) -> Result<(), AppError> {
    let id = entry.block.id();
    let content = entry.block.text().cloned().ok_or_else(|| {
        AppError::Validation(format!("{} {} has no text payload", conversion.from, id))
    })?;
    let replacement = NewBlock::new(conversion.to, content)?;
    let children = std::slice::from_ref(&replacement);

    retry_with_backoff(
        || repo.append_after(&entry.parent, Some(id), children),
        &options.retry,
    )
    .await?;
    options.pause_between_mutations().await;

    retry_with_backoff(|| repo.delete_block(id), &options.retry)
        .await
        .map_err(|e| {
            AppError::Validation(format!(
                "replacement appended but original not deleted: {}",
                e
            ))
        })?;
    options.pause_between_mutations().await;

    log::debug!("Converted {} {} to {}", conversion.from, id, conversion.to);
    Ok(())
}
