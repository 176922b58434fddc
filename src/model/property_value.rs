use crate::types::*;
use serde::{Deserialize, Serialize};

/// Property value: a typed value together with its property ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub id: PropertyName,
    #[serde(flatten)]
    pub type_specific_value: PropertyTypeValue,
}

impl PropertyValue {
    /// Returns the Notion API type name for this property value.
    pub fn type_name(&self) -> &str {
        self.type_specific_value.type_name()
    }
}

/// The property types these operations read. Anything else keeps only its
/// type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyTypeValue {
    Title { title: Vec<RichTextItem> },
    RichText { rich_text: Vec<RichTextItem> },
    Url { url: Option<String> },
    Checkbox { checkbox: bool },
    Number { number: Option<f64> },
    Select { select: Option<String> },
    /// Only string formula results are kept.
    Formula { string: Option<String> },
    Other { type_name: String },
}

impl PropertyTypeValue {
    pub fn type_name(&self) -> &str {
        match self {
            PropertyTypeValue::Title { .. } => "title",
            PropertyTypeValue::RichText { .. } => "rich_text",
            PropertyTypeValue::Url { .. } => "url",
            PropertyTypeValue::Checkbox { .. } => "checkbox",
            PropertyTypeValue::Number { .. } => "number",
            PropertyTypeValue::Select { .. } => "select",
            PropertyTypeValue::Formula { .. } => "formula",
            PropertyTypeValue::Other { type_name } => type_name,
        }
    }

    /// A non-empty textual reading of the value, if it has one.
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            PropertyTypeValue::Title { title: items }
            | PropertyTypeValue::RichText { rich_text: items } => plain_text_of(items),
            PropertyTypeValue::Url { url: Some(url) } => url.clone(),
            PropertyTypeValue::Select { select: Some(name) } => name.clone(),
            PropertyTypeValue::Formula { string: Some(s) } => s.clone(),
            _ => return None,
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
