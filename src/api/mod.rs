// src/api/mod.rs
//! Notion API interaction: reading and rewriting workspace content.
//!
//! Business logic depends on the `NotionRepository` trait, never on HTTP
//! details, so every operation can run against an in-memory repository.

pub mod client;
pub mod notion_client_adapter;
pub mod pagination;
pub mod parser;
pub mod requests;
mod responses;
pub mod tree;
pub mod types;

use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::{BlockId, NotionId, PageId};

pub use types::{NewBlock, PaginatedResponse, PropertyUpdate, PropertyUpdates};

/// The ability to read and change content in a Notion workspace.
///
/// List operations return one page of results; callers thread the cursor.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError>;

    /// One page of a container's direct children.
    async fn list_children(
        &self,
        parent: &NotionId,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Block>, AppError>;

    async fn query_database(
        &self,
        database: &NotionId,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Page>, AppError>;

    /// Pages shared with the integration.
    async fn search_pages(&self, cursor: Option<String>) -> Result<PaginatedResponse<Page>, AppError>;

    async fn update_page_properties(
        &self,
        page: &PageId,
        updates: &PropertyUpdates,
    ) -> Result<(), AppError>;

    /// Appends `children` under `parent`, directly after `after` when given.
    async fn append_after(
        &self,
        parent: &NotionId,
        after: Option<&BlockId>,
        children: &[NewBlock],
    ) -> Result<Vec<Block>, AppError>;

    /// Rewrites a block's text payload in place.
    async fn update_block_text(&self, block: &Block) -> Result<(), AppError>;

    async fn delete_block(&self, id: &BlockId) -> Result<(), AppError>;
}

// Re-export the public interface
pub use client::NotionHttpClient;
pub use tree::{fetch_block_tree, BlockTree, BlockTreeFetcher, WalkedBlock};
