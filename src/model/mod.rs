mod block;
pub mod blocks;
pub mod common;
pub mod properties;
mod property_value;

pub use block::{Block, BlockKind};
pub use blocks::*;
pub use common::*;
pub use property_value::{PropertyTypeValue, PropertyValue};

use crate::types::{PageId, PropertyName};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A Notion page: a property bag plus the root of a block tree.
///
/// Blocks are not stored here; every operation walks them fresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub url: String,
    pub properties: HashMap<PropertyName, PropertyValue>,
    pub archived: bool,
}

impl Page {
    pub fn new(id: PageId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            properties: HashMap::new(),
            archived: false,
        }
    }

    pub fn with_property(mut self, name: &str, value: PropertyTypeValue) -> Self {
        self.properties.insert(
            PropertyName::from(name),
            PropertyValue {
                id: PropertyName::from(name),
                type_specific_value: value,
            },
        );
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyTypeValue> {
        self.properties.get(name).map(|p| &p.type_specific_value)
    }

    /// Display title resolved through the fixed candidate list.
    pub fn title(&self) -> String {
        properties::page_title(self)
    }
}
