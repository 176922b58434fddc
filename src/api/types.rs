// src/api/types.rs
//! Type definitions for the Notion API module.
//!
//! Requests are typed so that repository implementations (HTTP or in-memory)
//! share one vocabulary for writes.

use crate::model::{Block, BlockCommon, BlockKind, TextBlockContent};
use crate::types::ValidationError;
use indexmap::IndexMap;
use serde::Deserialize;

// --- API Response Types ---

/// Generic paginated response from Notion API.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedResponse<T> {
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// A response with no further pages.
    pub fn last(results: Vec<T>) -> Self {
        Self {
            results,
            next_cursor: None,
            has_more: false,
        }
    }
}

/// Result of a pagination operation.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub calls: usize,
}

// --- API Request Types ---

/// A block to be created, carrying the spans and color of its payload.
///
/// Only kinds whose payload is rich text can be created this way.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlock {
    kind: BlockKind,
    content: TextBlockContent,
}

impl NewBlock {
    pub fn new(kind: BlockKind, content: TextBlockContent) -> Result<Self, ValidationError> {
        if !kind.carries_rich_text() {
            return Err(ValidationError::InvalidBlockKind(format!(
                "{} does not carry rich text",
                kind
            )));
        }
        Ok(Self { kind, content })
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn content(&self) -> &TextBlockContent {
        &self.content
    }

    /// Materializes the block under the given identity.
    pub fn into_block(self, common: BlockCommon) -> Option<Block> {
        Block::from_text(common, self.kind, self.content)
    }
}

/// A new value for one page property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyUpdate {
    Url(Option<String>),
    /// Plain text written as consecutive spans, one per chunk.
    RichTextChunks(Vec<String>),
}

/// Property updates keyed by property name, sent in insertion order.
pub type PropertyUpdates = IndexMap<String, PropertyUpdate>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RichTextItem;

    #[test]
    fn new_block_rejects_non_text_kinds() {
        assert!(NewBlock::new(BlockKind::Divider, TextBlockContent::default()).is_err());
        assert!(NewBlock::new(BlockKind::ChildPage, TextBlockContent::default()).is_err());
        assert!(NewBlock::new(BlockKind::Paragraph, TextBlockContent::default()).is_ok());
    }

    #[test]
    fn new_block_materializes_with_kind() {
        let block = NewBlock::new(
            BlockKind::BulletedListItem,
            TextBlockContent::new(vec![RichTextItem::plain_text("x")]),
        )
        .unwrap()
        .into_block(BlockCommon::default())
        .unwrap();
        assert_eq!(block.kind(), BlockKind::BulletedListItem);
    }
}
