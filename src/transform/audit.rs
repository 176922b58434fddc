// src/transform/audit.rs
//! Heading-1 audit. Pages are expected to use their title as the only H1.

use super::TransformOptions;
use crate::api::NotionRepository;
use crate::model::BlockKind;
use crate::types::{NotionId, Warning};

/// The level-1 headings found in one page's tree.
#[derive(Debug, Clone, Default)]
pub struct HeadingAudit {
    pub headings: Vec<String>,
    pub warnings: Vec<Warning>,
    pub truncated: bool,
}

impl HeadingAudit {
    pub fn count(&self) -> usize {
        self.headings.len()
    }

    pub fn is_clean(&self) -> bool {
        self.headings.is_empty()
    }
}

pub async fn audit_h1(
    repo: &dyn NotionRepository,
    page: &NotionId,
    options: &TransformOptions,
) -> HeadingAudit {
    let tree = options.fetch(repo, page).await;
    let headings = tree
        .blocks()
        .filter(|block| block.kind() == BlockKind::Heading1)
        .map(|block| block.plain_text())
        .collect();

    HeadingAudit {
        headings,
        warnings: tree.warnings,
        truncated: tree.truncated,
    }
}
