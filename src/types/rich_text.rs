use super::Color;
use serde::{Deserialize, Serialize};

/// The kind of rich text content.
///
/// Each variant carries its own data, so a mention without mention data
/// or an equation without an expression cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RichTextType {
    Text { content: String, link: Option<Link> },
    Mention(MentionData),
    Equation { expression: String },
}

/// One span of a block's text payload.
///
/// `plain_text` is the provider's rendering of the span, `href` its flat
/// link shortcut. Span order inside a block is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    pub text_type: RichTextType,
    pub annotations: Annotations,
    pub plain_text: String,
    pub href: Option<String>,
}

impl RichTextItem {
    /// A plain, unannotated text span.
    pub fn plain_text(text: &str) -> Self {
        Self {
            text_type: RichTextType::Text {
                content: text.to_string(),
                link: None,
            },
            annotations: Annotations::default(),
            plain_text: text.to_string(),
            href: None,
        }
    }

    /// A text span carrying a hyperlink.
    pub fn link(text: &str, url: &str) -> Self {
        Self {
            text_type: RichTextType::Text {
                content: text.to_string(),
                link: Some(Link {
                    url: url.to_string(),
                }),
            },
            annotations: Annotations::default(),
            plain_text: text.to_string(),
            href: Some(url.to_string()),
        }
    }

    /// The literal text of this span. Link targets never contribute.
    pub fn literal(&self) -> &str {
        match &self.text_type {
            RichTextType::Text { content, .. } => content,
            _ => &self.plain_text,
        }
    }
}

/// Joins span literals in order with no separator.
pub fn plain_text_of(items: &[RichTextItem]) -> String {
    items.iter().map(RichTextItem::literal).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

/// Inline mention targets that can be written back to Notion unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MentionData {
    User { id: String },
    Page { id: String },
    Database { id: String },
    Date {
        start: chrono::NaiveDate,
        end: Option<chrono::NaiveDate>,
    },
    LinkPreview { url: String },
    /// A mention kind with no writable form; written back as plain text.
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_ignores_link_target() {
        let items = vec![
            RichTextItem::plain_text("Read "),
            RichTextItem::link("the docs", "https://example.com/docs"),
            RichTextItem::plain_text("."),
        ];
        assert_eq!(plain_text_of(&items), "Read the docs.");
    }

    #[test]
    fn mention_literal_uses_plain_text() {
        let item = RichTextItem {
            text_type: RichTextType::Mention(MentionData::Page {
                id: "abc".to_string(),
            }),
            annotations: Annotations::default(),
            plain_text: "Linked page".to_string(),
            href: Some("https://www.notion.so/abc".to_string()),
        };
        assert_eq!(item.literal(), "Linked page");
    }
}
