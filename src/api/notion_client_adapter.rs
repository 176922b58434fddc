// src/api/notion_client_adapter.rs
//! Adapter layer for converting notion-client types to our domain model.
//!
//! notion-client does the response validation; this module keeps only what
//! the operations need and preserves exact colors so written-back blocks
//! match their originals.

use crate::error::AppError;
use crate::model::blocks::*;
use crate::model::common::BlockCommon;
use crate::model::{Block, Page, PropertyTypeValue, PropertyValue};
use crate::types::{
    Annotations, BlockId, Color, Link, MentionData, PageId, PropertyName, RichTextItem,
    RichTextType,
};
use std::collections::HashMap;

/// Convert notion-client Page to our domain Page
pub fn convert_page(notion_page: notion_client::objects::page::Page) -> Result<Page, AppError> {
    let id = PageId::parse(&notion_page.id)?;

    Ok(Page {
        id,
        url: notion_page.url,
        properties: convert_page_properties(notion_page.properties),
        archived: notion_page.archived,
    })
}

/// Convert notion-client Block to our domain Block
pub fn convert_block(
    notion_block: notion_client::objects::block::Block,
) -> Result<Block, AppError> {
    let common = convert_block_common(&notion_block)?;

    use notion_client::objects::block::BlockType;

    let text = |common: BlockCommon,
                rich_text: Vec<notion_client::objects::rich_text::RichText>,
                color: Option<notion_client::objects::block::TextColor>|
     -> Result<TextBlock, AppError> {
        Ok(TextBlock {
            common,
            content: convert_text_block_content(rich_text, color)?,
        })
    };

    match notion_block.block_type {
        BlockType::Paragraph { paragraph } => Ok(Block::Paragraph(text(
            common,
            paragraph.rich_text,
            paragraph.color,
        )?)),

        BlockType::Heading1 { heading_1 } => Ok(Block::Heading1(text(
            common,
            heading_1.rich_text,
            heading_1.color,
        )?)),

        BlockType::Heading2 { heading_2 } => Ok(Block::Heading2(text(
            common,
            heading_2.rich_text,
            heading_2.color,
        )?)),

        BlockType::Heading3 { heading_3 } => Ok(Block::Heading3(text(
            common,
            heading_3.rich_text,
            heading_3.color,
        )?)),

        BlockType::BulletedListItem { bulleted_list_item } => Ok(Block::BulletedListItem(text(
            common,
            bulleted_list_item.rich_text,
            Some(bulleted_list_item.color),
        )?)),

        BlockType::NumberedListItem { numbered_list_item } => Ok(Block::NumberedListItem(text(
            common,
            numbered_list_item.rich_text,
            Some(numbered_list_item.color),
        )?)),

        BlockType::ToDo { to_do } => Ok(Block::ToDo(ToDoBlock {
            common,
            content: convert_text_block_content(to_do.rich_text, to_do.color)?,
            checked: to_do.checked.unwrap_or(false),
        })),

        BlockType::Toggle { toggle } => Ok(Block::Toggle(text(
            common,
            toggle.rich_text,
            Some(toggle.color),
        )?)),

        BlockType::Quote { quote } => Ok(Block::Quote(text(
            common,
            quote.rich_text,
            Some(quote.color),
        )?)),

        BlockType::Callout { callout } => Ok(Block::Callout(text(
            common,
            callout.rich_text,
            Some(callout.color),
        )?)),

        BlockType::Code { code } => Ok(Block::Code(CodeBlock {
            common,
            language: serde_json::to_value(&code.language)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_else(|| "plain text".to_string()),
            content: convert_text_block_content(code.rich_text, None)?,
        })),

        BlockType::Divider { .. } => Ok(Block::Divider(DividerBlock { common })),

        BlockType::Table { table } => Ok(Block::Table(TableBlock {
            common,
            table_width: table.table_width as usize,
            has_column_header: table.has_column_header,
            has_row_header: table.has_row_header,
        })),

        BlockType::TableRow { table_row } => Ok(Block::TableRow(TableRowBlock {
            common,
            cells: table_row
                .cells
                .into_iter()
                .map(convert_rich_text_array)
                .collect(),
        })),

        BlockType::ChildPage { child_page } => Ok(Block::ChildPage(ChildPageBlock {
            common,
            title: child_page.title,
        })),

        BlockType::ChildDatabase { child_database } => {
            Ok(Block::ChildDatabase(ChildDatabaseBlock {
                common,
                title: child_database.title,
            }))
        }

        other => Ok(Block::Unsupported(UnsupportedBlock {
            common,
            block_type: block_type_tag(&other),
        })),
    }
}

/// The provider's snake_case tag for a block type we don't model.
fn block_type_tag(block_type: &notion_client::objects::block::BlockType) -> String {
    serde_json::to_value(block_type)
        .ok()
        .and_then(|v| v.get("type").and_then(|t| t.as_str().map(str::to_string)))
        .unwrap_or_else(|| "unsupported".to_string())
}

/// Convert block common fields
fn convert_block_common(
    notion_block: &notion_client::objects::block::Block,
) -> Result<BlockCommon, AppError> {
    let id = BlockId::parse(&notion_block.id.clone().ok_or_else(|| {
        AppError::MalformedResponse("Block missing required ID field".to_string())
    })?)?;

    Ok(BlockCommon {
        id,
        has_children: notion_block.has_children.unwrap_or(false),
        archived: notion_block.archived.unwrap_or(false),
    })
}

/// Convert text block content (rich text + color)
fn convert_text_block_content(
    rich_text: Vec<notion_client::objects::rich_text::RichText>,
    color: Option<notion_client::objects::block::TextColor>,
) -> Result<TextBlockContent, AppError> {
    Ok(TextBlockContent {
        rich_text: convert_rich_text_array(rich_text),
        color: convert_block_color(
            color.unwrap_or(notion_client::objects::block::TextColor::Default),
        ),
    })
}

/// Convert array of rich text items
pub fn convert_rich_text_array(
    rich_texts: Vec<notion_client::objects::rich_text::RichText>,
) -> Vec<RichTextItem> {
    rich_texts.into_iter().map(convert_rich_text).collect()
}

/// Convert single rich text item
fn convert_rich_text(rich_text: notion_client::objects::rich_text::RichText) -> RichTextItem {
    use notion_client::objects::rich_text::RichText as NcRichText;

    match rich_text {
        NcRichText::Text {
            text,
            annotations,
            plain_text,
            href,
        } => {
            let plain_text = plain_text.unwrap_or_else(|| text.content.clone());
            RichTextItem {
                text_type: RichTextType::Text {
                    content: text.content,
                    link: text.link.map(|link| Link { url: link.url }),
                },
                annotations: annotations.map(convert_annotations).unwrap_or_default(),
                plain_text,
                href,
            }
        }

        NcRichText::Mention {
            mention,
            annotations,
            plain_text,
            href,
        } => RichTextItem {
            text_type: RichTextType::Mention(convert_mention(mention)),
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        },

        NcRichText::Equation {
            equation,
            annotations,
            plain_text,
            href,
        } => RichTextItem {
            text_type: RichTextType::Equation {
                expression: equation.expression,
            },
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        },

        #[allow(unreachable_patterns)]
        _ => {
            log::debug!("Unsupported rich text type encountered, keeping an empty span");
            RichTextItem::plain_text("")
        }
    }
}

/// Convert annotations
fn convert_annotations(annotations: notion_client::objects::rich_text::Annotations) -> Annotations {
    Annotations {
        bold: annotations.bold,
        italic: annotations.italic,
        strikethrough: annotations.strikethrough,
        underline: annotations.underline,
        code: annotations.code,
        color: convert_rich_text_color(annotations.color),
    }
}

/// Convert mention, keeping the targets that can be written back.
fn convert_mention(mention: notion_client::objects::rich_text::Mention) -> MentionData {
    use notion_client::objects::rich_text::Mention as NcMention;

    match mention {
        NcMention::User { user } => MentionData::User { id: user.id },
        NcMention::Page { page } => MentionData::Page { id: page.id },
        NcMention::Database { database } => MentionData::Database { id: database.id },
        NcMention::Date { date } => MentionData::Date {
            start: date.start.naive_utc().date(),
            end: date.end.map(|end| end.naive_utc().date()),
        },
        NcMention::LinkPreview { link_preview } => MentionData::LinkPreview {
            url: link_preview.url,
        },
        _ => {
            log::debug!("Unsupported mention type encountered, treating as plain text");
            MentionData::Other
        }
    }
}

/// Generates a color conversion function from a Notion color enum to our Color type.
/// Background variants map to the `Light*` colors so they survive a round trip.
macro_rules! impl_color_conversion {
    ($fn_name:ident, $source:ty) => {
        fn $fn_name(color: $source) -> Color {
            match color {
                <$source>::Default => Color::Default,
                <$source>::Gray => Color::Gray,
                <$source>::Brown => Color::Brown,
                <$source>::Orange => Color::Orange,
                <$source>::Yellow => Color::Yellow,
                <$source>::Green => Color::Green,
                <$source>::Blue => Color::Blue,
                <$source>::Purple => Color::Purple,
                <$source>::Pink => Color::Pink,
                <$source>::Red => Color::Red,
                <$source>::GrayBackground => Color::LightGray,
                <$source>::BrownBackground => Color::LightBrown,
                <$source>::OrangeBackground => Color::LightOrange,
                <$source>::YellowBackground => Color::LightYellow,
                <$source>::GreenBackground => Color::LightGreen,
                <$source>::BlueBackground => Color::LightBlue,
                <$source>::PurpleBackground => Color::LightPurple,
                <$source>::PinkBackground => Color::LightPink,
                <$source>::RedBackground => Color::LightRed,
            }
        }
    };
}

impl_color_conversion!(convert_block_color, notion_client::objects::block::TextColor);
impl_color_conversion!(
    convert_rich_text_color,
    notion_client::objects::rich_text::TextColor
);

/// Convert page properties, keeping every property under its name.
fn convert_page_properties(
    properties: HashMap<String, notion_client::objects::page::PageProperty>,
) -> HashMap<PropertyName, PropertyValue> {
    properties
        .into_iter()
        .map(|(name, property)| {
            let value = PropertyValue {
                id: PropertyName::new(name.as_str()),
                type_specific_value: convert_page_property(property),
            };
            (PropertyName::new(name), value)
        })
        .collect()
}

/// Convert individual page property. Types the operations never read keep
/// only their type name.
fn convert_page_property(property: notion_client::objects::page::PageProperty) -> PropertyTypeValue {
    use notion_client::objects::page::{FormulaPropertyValue, PageProperty};

    match property {
        PageProperty::Title { title, .. } => PropertyTypeValue::Title {
            title: convert_rich_text_array(title),
        },
        PageProperty::RichText { rich_text, .. } => PropertyTypeValue::RichText {
            rich_text: convert_rich_text_array(rich_text),
        },
        PageProperty::Url { url, .. } => PropertyTypeValue::Url { url },
        PageProperty::Checkbox { checkbox, .. } => PropertyTypeValue::Checkbox { checkbox },
        PageProperty::Number { number, .. } => PropertyTypeValue::Number {
            number: number.and_then(|n| n.as_f64()),
        },
        PageProperty::Select { select, .. } => PropertyTypeValue::Select {
            select: select.and_then(|s| s.name),
        },
        PageProperty::Formula { formula, .. } => PropertyTypeValue::Formula {
            string: match formula {
                Some(FormulaPropertyValue::String { string }) => string,
                _ => None,
            },
        },
        other => PropertyTypeValue::Other {
            type_name: serde_json::to_value(&other)
                .ok()
                .and_then(|v| v.get("type").and_then(|t| t.as_str().map(str::to_string)))
                .unwrap_or_else(|| "unknown".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_block(value: serde_json::Value) -> Block {
        let notion_block: notion_client::objects::block::Block =
            serde_json::from_value(value).unwrap();
        convert_block(notion_block).unwrap()
    }

    #[test]
    fn to_do_keeps_spans_color_and_checked() {
        let block = parse_block(json!({
            "object": "block",
            "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
            "has_children": false,
            "archived": false,
            "type": "to_do",
            "to_do": {
                "rich_text": [{
                    "type": "text",
                    "text": { "content": "Buy milk", "link": null },
                    "annotations": {
                        "bold": true, "italic": false, "strikethrough": false,
                        "underline": false, "code": false, "color": "default"
                    },
                    "plain_text": "Buy milk",
                    "href": null
                }],
                "checked": true,
                "color": "yellow_background"
            }
        }));

        match block {
            Block::ToDo(todo) => {
                assert!(todo.checked);
                assert_eq!(todo.content.color, Color::LightYellow);
                assert_eq!(todo.content.rich_text[0].literal(), "Buy milk");
                assert!(todo.content.rich_text[0].annotations.bold);
            }
            other => panic!("expected to_do, got {:?}", other),
        }
    }

    #[test]
    fn child_page_is_a_leaf_with_title() {
        let block = parse_block(json!({
            "object": "block",
            "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
            "has_children": true,
            "type": "child_page",
            "child_page": { "title": "Sub page" }
        }));
        assert!(matches!(&block, Block::ChildPage(p) if p.title == "Sub page"));
        assert!(block.kind().is_separate_container());
    }
}
