use super::common::BlockCommon;
use crate::types::{Color, RichTextItem};
use serde::{Deserialize, Serialize};

/// Spans plus color: the payload shared by every text-bearing block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextBlockContent {
    pub rich_text: Vec<RichTextItem>,
    pub color: Color,
}

impl TextBlockContent {
    pub fn new(rich_text: Vec<RichTextItem>) -> Self {
        Self {
            rich_text,
            color: Color::Default,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Block types whose payload is only `TextBlockContent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ToDoBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub common: BlockCommon,
    pub language: String,
    pub content: TextBlockContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DividerBlock {
    pub common: BlockCommon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    pub common: BlockCommon,
    pub table_width: usize,
    pub has_column_header: bool,
    pub has_row_header: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRowBlock {
    pub common: BlockCommon,
    pub cells: Vec<Vec<RichTextItem>>,
}

/// A sub-page listed inside the current page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildPageBlock {
    pub common: BlockCommon,
    pub title: String,
}

/// An inline or linked database listed inside the current page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildDatabaseBlock {
    pub common: BlockCommon,
    pub title: String,
}

/// Any block type this crate does not model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedBlock {
    pub common: BlockCommon,
    pub block_type: String,
}
