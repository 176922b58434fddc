// src/api/responses.rs
//! API response types using notion-client library for parsing.

use serde::Deserialize;

// Re-export notion-client types for production use
pub use notion_client::objects::{
    block::Block as NotionBlock, error::Error as NotionError, page::Page as NotionPage,
};

/// List envelope with raw results, so one unparseable entry cannot fail the
/// whole page of results.
#[derive(Debug, Clone, Deserialize)]
pub struct RawListResponse {
    pub results: Vec<serde_json::Value>,
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Trait for converting notion-client types to domain types
pub trait ToDomain<T> {
    fn to_domain(self) -> Result<T, crate::error::AppError>;
}

impl ToDomain<crate::model::Page> for NotionPage {
    fn to_domain(self) -> Result<crate::model::Page, crate::error::AppError> {
        crate::api::notion_client_adapter::convert_page(self)
    }
}

impl ToDomain<crate::model::Block> for NotionBlock {
    fn to_domain(self) -> Result<crate::model::Block, crate::error::AppError> {
        crate::api::notion_client_adapter::convert_block(self)
    }
}
