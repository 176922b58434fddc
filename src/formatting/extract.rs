// src/formatting/extract.rs
//! Rich-text extraction: one block to one string.

use crate::model::Block;
use crate::types::plain_text_of;

/// Which consumer the text is shaped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Speech-synthesis input: markers dropped, blocks separated by spaces.
    #[default]
    Flat,
    /// Markdown export.
    Structured,
}

/// Extracts a block's text according to its type.
///
/// Span literals are joined with no separator; link targets never appear.
/// Types without a rule produce an empty string.
pub fn extract_block_text(block: &Block, mode: ExtractMode) -> String {
    let text = || {
        block
            .text()
            .map(|content| plain_text_of(&content.rich_text))
            .unwrap_or_default()
    };

    match (mode, block) {
        (ExtractMode::Flat, Block::Heading1(_) | Block::Heading2(_)) => format!("{} ", text()),
        (ExtractMode::Flat, Block::Heading3(_)) => format!("{}\n", text()),
        (ExtractMode::Flat, Block::BulletedListItem(_) | Block::NumberedListItem(_)) => {
            format!("{}\n", text())
        }
        (ExtractMode::Flat, Block::Quote(_)) => format!("{}\n", text()),
        (ExtractMode::Flat, Block::ToDo(_) | Block::Paragraph(_) | Block::Callout(_)) => {
            format!("{} ", text())
        }
        (ExtractMode::Flat, Block::Code(_)) => text(),
        (ExtractMode::Flat, Block::Divider(_)) => "\n".to_string(),

        (ExtractMode::Structured, Block::Heading1(_)) => format!("\n# {}\n", text()),
        (ExtractMode::Structured, Block::Heading2(_)) => format!("\n## {}\n", text()),
        (ExtractMode::Structured, Block::Heading3(_)) => format!("\n### {}\n", text()),
        (ExtractMode::Structured, Block::BulletedListItem(_)) => format!("• {}\n", text()),
        (ExtractMode::Structured, Block::NumberedListItem(_)) => format!("1. {}\n", text()),
        (ExtractMode::Structured, Block::Quote(_)) => format!("> {}\n", text()),
        (ExtractMode::Structured, Block::ToDo(_) | Block::Paragraph(_) | Block::Callout(_)) => {
            format!("{}\n", text())
        }
        (ExtractMode::Structured, Block::Code(code)) => {
            format!("```{}\n{}\n```\n", code.language, text())
        }
        (ExtractMode::Structured, Block::Divider(_)) => "\n---\n".to_string(),

        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockCommon, BlockKind, CodeBlock, TextBlockContent};
    use crate::types::RichTextItem;

    fn block(kind: BlockKind, spans: &[&str]) -> Block {
        Block::from_text(
            BlockCommon::default(),
            kind,
            TextBlockContent::new(spans.iter().map(|s| RichTextItem::plain_text(s)).collect()),
        )
        .unwrap()
    }

    #[test]
    fn flat_rules_per_type() {
        let cases = [
            (BlockKind::Heading1, "T "),
            (BlockKind::Heading2, "T "),
            (BlockKind::Heading3, "T\n"),
            (BlockKind::BulletedListItem, "T\n"),
            (BlockKind::NumberedListItem, "T\n"),
            (BlockKind::Quote, "T\n"),
            (BlockKind::ToDo, "T "),
            (BlockKind::Paragraph, "T "),
            (BlockKind::Callout, "T "),
            (BlockKind::Code, "T"),
            (BlockKind::Toggle, ""),
        ];
        for (kind, expected) in cases {
            assert_eq!(
                extract_block_text(&block(kind, &["T"]), ExtractMode::Flat),
                expected,
                "{}",
                kind
            );
        }
    }

    #[test]
    fn structured_rules_per_type() {
        let cases = [
            (BlockKind::Heading1, "\n# T\n"),
            (BlockKind::Heading2, "\n## T\n"),
            (BlockKind::Heading3, "\n### T\n"),
            (BlockKind::BulletedListItem, "• T\n"),
            (BlockKind::NumberedListItem, "1. T\n"),
            (BlockKind::Quote, "> T\n"),
            (BlockKind::Paragraph, "T\n"),
        ];
        for (kind, expected) in cases {
            assert_eq!(
                extract_block_text(&block(kind, &["T"]), ExtractMode::Structured),
                expected,
                "{}",
                kind
            );
        }
    }

    #[test]
    fn numbered_items_have_no_running_counter() {
        let items: String = (0..3)
            .map(|_| {
                extract_block_text(
                    &block(BlockKind::NumberedListItem, &["x"]),
                    ExtractMode::Structured,
                )
            })
            .collect();
        assert_eq!(items, "1. x\n1. x\n1. x\n");
    }

    #[test]
    fn divider_and_code() {
        let divider = Block::Divider(Default::default());
        assert_eq!(extract_block_text(&divider, ExtractMode::Flat), "\n");
        assert_eq!(extract_block_text(&divider, ExtractMode::Structured), "\n---\n");

        let code = Block::Code(CodeBlock {
            common: BlockCommon::default(),
            language: "rust".to_string(),
            content: TextBlockContent::new(vec![RichTextItem::plain_text("fn main() {}")]),
        });
        assert_eq!(
            extract_block_text(&code, ExtractMode::Structured),
            "```rust\nfn main() {}\n```\n"
        );
    }

    #[test]
    fn spans_join_without_separator_and_drop_links() {
        let paragraph = Block::from_text(
            BlockCommon::default(),
            BlockKind::Paragraph,
            TextBlockContent::new(vec![
                RichTextItem::plain_text("See "),
                RichTextItem::link("here", "https://example.com"),
            ]),
        )
        .unwrap();
        assert_eq!(extract_block_text(&paragraph, ExtractMode::Flat), "See here ");
    }
}
