use super::blocks::*;
use super::common::BlockCommon;
use crate::types::{plain_text_of, BlockId, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to reduce boilerplate in Block enum methods
macro_rules! match_all_blocks {
    ($self:expr, $pattern:pat => $result:expr) => {
        match $self {
            Block::Paragraph($pattern) => $result,
            Block::Heading1($pattern) => $result,
            Block::Heading2($pattern) => $result,
            Block::Heading3($pattern) => $result,
            Block::BulletedListItem($pattern) => $result,
            Block::NumberedListItem($pattern) => $result,
            Block::ToDo($pattern) => $result,
            Block::Toggle($pattern) => $result,
            Block::Quote($pattern) => $result,
            Block::Callout($pattern) => $result,
            Block::Code($pattern) => $result,
            Block::Divider($pattern) => $result,
            Block::Table($pattern) => $result,
            Block::TableRow($pattern) => $result,
            Block::ChildPage($pattern) => $result,
            Block::ChildDatabase($pattern) => $result,
            Block::Unsupported($pattern) => $result,
        }
    };
}

/// A node in a page's content tree, as returned by one listing call.
///
/// Children are not nested here; the tree fetcher flattens them in pre-order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(TextBlock),
    Heading1(TextBlock),
    Heading2(TextBlock),
    Heading3(TextBlock),
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    ToDo(ToDoBlock),
    Toggle(TextBlock),
    Quote(TextBlock),
    Callout(TextBlock),
    Code(CodeBlock),
    Divider(DividerBlock),
    Table(TableBlock),
    TableRow(TableRowBlock),
    ChildPage(ChildPageBlock),
    ChildDatabase(ChildDatabaseBlock),
    Unsupported(UnsupportedBlock),
}

impl Block {
    pub fn id(&self) -> &BlockId {
        match_all_blocks!(self, b => &b.common.id)
    }

    pub fn common(&self) -> &BlockCommon {
        match_all_blocks!(self, b => &b.common)
    }

    pub fn common_mut(&mut self) -> &mut BlockCommon {
        match_all_blocks!(self, b => &mut b.common)
    }

    pub fn has_children(&self) -> bool {
        self.common().has_children
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Paragraph(_) => BlockKind::Paragraph,
            Block::Heading1(_) => BlockKind::Heading1,
            Block::Heading2(_) => BlockKind::Heading2,
            Block::Heading3(_) => BlockKind::Heading3,
            Block::BulletedListItem(_) => BlockKind::BulletedListItem,
            Block::NumberedListItem(_) => BlockKind::NumberedListItem,
            Block::ToDo(_) => BlockKind::ToDo,
            Block::Toggle(_) => BlockKind::Toggle,
            Block::Quote(_) => BlockKind::Quote,
            Block::Callout(_) => BlockKind::Callout,
            Block::Code(_) => BlockKind::Code,
            Block::Divider(_) => BlockKind::Divider,
            Block::Table(_) => BlockKind::Table,
            Block::TableRow(_) => BlockKind::TableRow,
            Block::ChildPage(_) => BlockKind::ChildPage,
            Block::ChildDatabase(_) => BlockKind::ChildDatabase,
            Block::Unsupported(_) => BlockKind::Unsupported,
        }
    }

    /// The provider's type tag; unsupported blocks keep their original tag.
    pub fn block_type(&self) -> &str {
        match self {
            Block::Unsupported(b) => &b.block_type,
            other => other.kind().as_str(),
        }
    }

    /// Spans and color, for block types that carry text.
    pub fn text(&self) -> Option<&TextBlockContent> {
        match self {
            Block::Paragraph(b)
            | Block::Heading1(b)
            | Block::Heading2(b)
            | Block::Heading3(b)
            | Block::BulletedListItem(b)
            | Block::NumberedListItem(b)
            | Block::Toggle(b)
            | Block::Quote(b)
            | Block::Callout(b) => Some(&b.content),
            Block::ToDo(b) => Some(&b.content),
            Block::Code(b) => Some(&b.content),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut TextBlockContent> {
        match self {
            Block::Paragraph(b)
            | Block::Heading1(b)
            | Block::Heading2(b)
            | Block::Heading3(b)
            | Block::BulletedListItem(b)
            | Block::NumberedListItem(b)
            | Block::Toggle(b)
            | Block::Quote(b)
            | Block::Callout(b) => Some(&mut b.content),
            Block::ToDo(b) => Some(&mut b.content),
            Block::Code(b) => Some(&mut b.content),
            _ => None,
        }
    }

    /// Concatenated span literals, or an empty string for non-text blocks.
    pub fn plain_text(&self) -> String {
        self.text()
            .map(|content| plain_text_of(&content.rich_text))
            .unwrap_or_default()
    }

    /// Builds a text-bearing block of the given kind.
    ///
    /// Returns `None` for kinds that do not carry a `TextBlockContent`.
    pub fn from_text(common: BlockCommon, kind: BlockKind, content: TextBlockContent) -> Option<Self> {
        let block = match kind {
            BlockKind::ToDo => Block::ToDo(ToDoBlock {
                common,
                content,
                checked: false,
            }),
            BlockKind::Code => Block::Code(CodeBlock {
                common,
                language: "plain text".to_string(),
                content,
            }),
            other => {
                let text = TextBlock { common, content };
                match other {
                    BlockKind::Paragraph => Block::Paragraph(text),
                    BlockKind::Heading1 => Block::Heading1(text),
                    BlockKind::Heading2 => Block::Heading2(text),
                    BlockKind::Heading3 => Block::Heading3(text),
                    BlockKind::BulletedListItem => Block::BulletedListItem(text),
                    BlockKind::NumberedListItem => Block::NumberedListItem(text),
                    BlockKind::Toggle => Block::Toggle(text),
                    BlockKind::Quote => Block::Quote(text),
                    BlockKind::Callout => Block::Callout(text),
                    _ => return None,
                }
            }
        };
        Some(block)
    }
}

/// The fixed enumeration of block type tags this crate distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    #[serde(rename = "heading_1")]
    Heading1,
    #[serde(rename = "heading_2")]
    Heading2,
    #[serde(rename = "heading_3")]
    Heading3,
    BulletedListItem,
    NumberedListItem,
    ToDo,
    Toggle,
    Quote,
    Callout,
    Code,
    Divider,
    Table,
    TableRow,
    ChildPage,
    ChildDatabase,
    Unsupported,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Heading1 => "heading_1",
            BlockKind::Heading2 => "heading_2",
            BlockKind::Heading3 => "heading_3",
            BlockKind::BulletedListItem => "bulleted_list_item",
            BlockKind::NumberedListItem => "numbered_list_item",
            BlockKind::ToDo => "to_do",
            BlockKind::Toggle => "toggle",
            BlockKind::Quote => "quote",
            BlockKind::Callout => "callout",
            BlockKind::Code => "code",
            BlockKind::Divider => "divider",
            BlockKind::Table => "table",
            BlockKind::TableRow => "table_row",
            BlockKind::ChildPage => "child_page",
            BlockKind::ChildDatabase => "child_database",
            BlockKind::Unsupported => "unsupported",
        }
    }

    /// Whether the block's payload is a `TextBlockContent`.
    pub fn carries_rich_text(&self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph
                | BlockKind::Heading1
                | BlockKind::Heading2
                | BlockKind::Heading3
                | BlockKind::BulletedListItem
                | BlockKind::NumberedListItem
                | BlockKind::ToDo
                | BlockKind::Toggle
                | BlockKind::Quote
                | BlockKind::Callout
                | BlockKind::Code
        )
    }

    /// Sub-pages and databases are addressable on their own and are not
    /// part of the enclosing page's content walk.
    pub fn is_separate_container(&self) -> bool {
        matches!(self, BlockKind::ChildPage | BlockKind::ChildDatabase)
    }
}

impl std::str::FromStr for BlockKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "paragraph" => BlockKind::Paragraph,
            "heading_1" => BlockKind::Heading1,
            "heading_2" => BlockKind::Heading2,
            "heading_3" => BlockKind::Heading3,
            "bulleted_list_item" => BlockKind::BulletedListItem,
            "numbered_list_item" => BlockKind::NumberedListItem,
            "to_do" => BlockKind::ToDo,
            "toggle" => BlockKind::Toggle,
            "quote" => BlockKind::Quote,
            "callout" => BlockKind::Callout,
            "code" => BlockKind::Code,
            "divider" => BlockKind::Divider,
            "table" => BlockKind::Table,
            "table_row" => BlockKind::TableRow,
            "child_page" => BlockKind::ChildPage,
            "child_database" => BlockKind::ChildDatabase,
            other => return Err(ValidationError::InvalidBlockKind(other.to_string())),
        };
        Ok(kind)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, RichTextItem};
    use std::str::FromStr;

    #[test]
    fn kind_names_round_trip() {
        for kind in [
            BlockKind::Heading1,
            BlockKind::ToDo,
            BlockKind::BulletedListItem,
            BlockKind::ChildDatabase,
        ] {
            assert_eq!(BlockKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(BlockKind::from_str("synced_block").is_err());
    }

    #[test]
    fn from_text_keeps_spans_and_color() {
        let content = TextBlockContent::new(vec![RichTextItem::plain_text("Buy milk")])
            .with_color(Color::LightYellow);
        let block =
            Block::from_text(BlockCommon::default(), BlockKind::BulletedListItem, content.clone())
                .unwrap();
        assert_eq!(block.kind(), BlockKind::BulletedListItem);
        assert_eq!(block.text(), Some(&content));
        assert_eq!(block.plain_text(), "Buy milk");
    }

    #[test]
    fn from_text_rejects_non_text_kinds() {
        assert!(Block::from_text(
            BlockCommon::default(),
            BlockKind::Divider,
            TextBlockContent::default()
        )
        .is_none());
    }

    #[test]
    fn unsupported_block_keeps_its_tag() {
        let block = Block::Unsupported(UnsupportedBlock {
            common: BlockCommon::default(),
            block_type: "synced_block".to_string(),
        });
        assert_eq!(block.block_type(), "synced_block");
        assert_eq!(block.kind(), BlockKind::Unsupported);
    }
}
