// tests/common/mod.rs
//! In-memory Notion workspace for integration tests.
//!
//! Children listings are paginated with a configurable page size, writes
//! mutate the in-memory tree, and failures can be injected per container,
//! per property or per block.

#![allow(dead_code)]

use notion_ops::api::{NewBlock, NotionRepository, PaginatedResponse, PropertyUpdate, PropertyUpdates};
use notion_ops::error::NotionErrorCode;
use notion_ops::model::{Block, BlockCommon, BlockKind, Page, PropertyTypeValue, TextBlockContent};
use notion_ops::types::{BlockId, NotionId, PageId, RichTextItem};
use notion_ops::{AppError, RetryPolicy, TransformOptions};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// How an injected failure behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Fails with 503 this many times, then succeeds.
    Transient(usize),
    /// Fails with a validation error every time.
    Permanent,
    /// Fails the way the provider rejects unsupported block types.
    Unsupported,
}

pub fn service_error(code: &str, message: &str, status: u16) -> AppError {
    AppError::NotionService {
        code: NotionErrorCode::from_api_response(code),
        message: message.to_string(),
        status: reqwest::StatusCode::from_u16(status).unwrap(),
    }
}

fn trigger(failure: &mut Failure) -> Option<AppError> {
    match failure {
        Failure::Transient(0) => None,
        Failure::Transient(remaining) => {
            *remaining -= 1;
            Some(service_error("service_unavailable", "try again", 503))
        }
        Failure::Permanent => Some(service_error(
            "validation_error",
            "body failed validation",
            400,
        )),
        Failure::Unsupported => Some(service_error(
            "validation_error",
            "Block type ai_block is not supported via the API.",
            400,
        )),
    }
}

fn key(id: &NotionId) -> String {
    id.as_str().to_string()
}

#[derive(Default)]
struct State {
    pages: Vec<Page>,
    databases: HashMap<String, Vec<PageId>>,
    children: HashMap<String, Vec<Block>>,
    listing_failures: HashMap<String, Failure>,
    cursor_failures: HashMap<(String, String), Failure>,
    property_failures: HashMap<String, Failure>,
    block_failures: HashMap<String, Failure>,
    property_writes: Vec<(PageId, PropertyUpdates)>,
    deleted: Vec<BlockId>,
}

pub struct FakeNotion {
    state: Mutex<State>,
    page_size: usize,
    pub listing_calls: AtomicUsize,
    pub append_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
}

impl Default for FakeNotion {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeNotion {
    pub fn new() -> Self {
        Self::with_page_size(100)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            state: Mutex::new(State::default()),
            page_size,
            listing_calls: AtomicUsize::new(0),
            append_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
        }
    }

    pub fn add_page(&self, page: Page) {
        self.state.lock().unwrap().pages.push(page);
    }

    pub fn add_database(&self, database: &NotionId, pages: Vec<Page>) {
        let mut state = self.state.lock().unwrap();
        let ids = pages.iter().map(|p| p.id.clone()).collect();
        state.databases.insert(key(database), ids);
        state.pages.extend(pages);
    }

    pub fn set_children(&self, parent: &NotionId, blocks: Vec<Block>) {
        self.state
            .lock()
            .unwrap()
            .children
            .insert(key(parent), blocks);
    }

    pub fn children_of(&self, parent: &NotionId) -> Vec<Block> {
        self.state
            .lock()
            .unwrap()
            .children
            .get(&key(parent))
            .cloned()
            .unwrap_or_default()
    }

    pub fn fail_listing(&self, parent: &NotionId, failure: Failure) {
        self.state
            .lock()
            .unwrap()
            .listing_failures
            .insert(key(parent), failure);
    }

    /// Fails only the listing request that carries `cursor`.
    pub fn fail_listing_at(&self, parent: &NotionId, cursor: &str, failure: Failure) {
        self.state
            .lock()
            .unwrap()
            .cursor_failures
            .insert((key(parent), cursor.to_string()), failure);
    }

    pub fn fail_property(&self, name: &str, failure: Failure) {
        self.state
            .lock()
            .unwrap()
            .property_failures
            .insert(name.to_string(), failure);
    }

    pub fn fail_block(&self, id: &BlockId, failure: Failure) {
        self.state
            .lock()
            .unwrap()
            .block_failures
            .insert(id.as_str().to_string(), failure);
    }

    pub fn property_writes(&self) -> Vec<(PageId, PropertyUpdates)> {
        self.state.lock().unwrap().property_writes.clone()
    }

    pub fn deleted(&self) -> Vec<BlockId> {
        self.state.lock().unwrap().deleted.clone()
    }

    /// Number of write calls of any kind.
    pub fn mutation_calls(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
            + self.delete_calls.load(Ordering::SeqCst)
            + self.update_calls.load(Ordering::SeqCst)
    }

    pub fn page(&self, id: &PageId) -> Option<Page> {
        self.state
            .lock()
            .unwrap()
            .pages
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }
}

#[async_trait::async_trait]
impl NotionRepository for FakeNotion {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError> {
        let page_id = PageId::from(id);
        self.page(&page_id)
            .ok_or_else(|| service_error("object_not_found", "Could not find page", 404))
    }

    async fn list_children(
        &self,
        parent: &NotionId,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if let Some(failure) = state.listing_failures.get_mut(&key(parent)) {
            if let Some(err) = trigger(failure) {
                return Err(err);
            }
        }
        if let Some(cursor) = &cursor {
            if let Some(failure) = state.cursor_failures.get_mut(&(key(parent), cursor.clone())) {
                if let Some(err) = trigger(failure) {
                    return Err(err);
                }
            }
        }

        let all = state.children.get(&key(parent)).cloned().unwrap_or_default();
        let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let end = (start + self.page_size).min(all.len());
        let has_more = end < all.len();
        Ok(PaginatedResponse {
            results: all[start..end].to_vec(),
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }

    async fn query_database(
        &self,
        database: &NotionId,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Page>, AppError> {
        let state = self.state.lock().unwrap();
        let ids = state
            .databases
            .get(&key(database))
            .ok_or_else(|| service_error("object_not_found", "Could not find database", 404))?;
        let rows: Vec<Page> = ids
            .iter()
            .filter_map(|id| state.pages.iter().find(|p| &p.id == id).cloned())
            .collect();
        let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let end = (start + self.page_size).min(rows.len());
        let has_more = end < rows.len();
        Ok(PaginatedResponse {
            results: rows[start..end].to_vec(),
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }

    async fn search_pages(&self, cursor: Option<String>) -> Result<PaginatedResponse<Page>, AppError> {
        let state = self.state.lock().unwrap();
        let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let end = (start + self.page_size).min(state.pages.len());
        let has_more = end < state.pages.len();
        Ok(PaginatedResponse {
            results: state.pages[start..end].to_vec(),
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }

    async fn update_page_properties(
        &self,
        page: &PageId,
        updates: &PropertyUpdates,
    ) -> Result<(), AppError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        for name in updates.keys() {
            if let Some(failure) = state.property_failures.get_mut(name) {
                if let Some(err) = trigger(failure) {
                    return Err(err);
                }
            }
        }

        let target = state
            .pages
            .iter_mut()
            .find(|p| &p.id == page)
            .ok_or_else(|| service_error("object_not_found", "Could not find page", 404))?;
        for (name, update) in updates {
            let value = match update {
                PropertyUpdate::Url(url) => PropertyTypeValue::Url { url: url.clone() },
                PropertyUpdate::RichTextChunks(chunks) => PropertyTypeValue::RichText {
                    rich_text: chunks.iter().map(|c| RichTextItem::plain_text(c)).collect(),
                },
            };
            *target = target.clone().with_property(name, value);
        }
        state.property_writes.push((page.clone(), updates.clone()));
        Ok(())
    }

    async fn append_after(
        &self,
        parent: &NotionId,
        after: Option<&BlockId>,
        children: &[NewBlock],
    ) -> Result<Vec<Block>, AppError> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        let created: Vec<Block> = children
            .iter()
            .cloned()
            .filter_map(|child| child.into_block(BlockCommon::new(BlockId::new_v4())))
            .collect();

        let siblings = state.children.entry(key(parent)).or_default();
        let position = match after {
            Some(after) => siblings
                .iter()
                .position(|b| b.id() == after)
                .map(|i| i + 1)
                .ok_or_else(|| service_error("validation_error", "after block not found", 400))?,
            None => siblings.len(),
        };
        for (offset, block) in created.iter().enumerate() {
            siblings.insert(position + offset, block.clone());
        }
        Ok(created)
    }

    async fn update_block_text(&self, block: &Block) -> Result<(), AppError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if let Some(failure) = state.block_failures.get_mut(block.id().as_str()) {
            if let Some(err) = trigger(failure) {
                return Err(err);
            }
        }
        for siblings in state.children.values_mut() {
            if let Some(existing) = siblings.iter_mut().find(|b| b.id() == block.id()) {
                *existing = block.clone();
                return Ok(());
            }
        }
        Err(service_error("object_not_found", "Could not find block", 404))
    }

    async fn delete_block(&self, id: &BlockId) -> Result<(), AppError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if let Some(failure) = state.block_failures.get_mut(id.as_str()) {
            if let Some(err) = trigger(failure) {
                return Err(err);
            }
        }
        let mut found = false;
        for siblings in state.children.values_mut() {
            let before = siblings.len();
            siblings.retain(|b| b.id() != id);
            found |= siblings.len() != before;
        }
        if !found {
            return Err(service_error("object_not_found", "Could not find block", 404));
        }
        state.children.remove(&key(&NotionId::from(id)));
        state.deleted.push(id.clone());
        Ok(())
    }
}

// --- builders ---

pub fn page_id(n: u32) -> PageId {
    PageId::parse(&format!("{:032x}", n)).unwrap()
}

pub fn block_id(n: u32) -> BlockId {
    BlockId::parse(&format!("{:032x}", 0xb000_0000u32 as u64 + n as u64)).unwrap()
}

pub fn notion_id(id: &PageId) -> NotionId {
    NotionId::from(id)
}

pub fn titled_page(id: PageId, title: &str) -> Page {
    Page::new(id, format!("https://www.notion.so/{}", title.replace(' ', "-"))).with_property(
        "Name",
        PropertyTypeValue::Title {
            title: vec![RichTextItem::plain_text(title)],
        },
    )
}

pub fn text_block(id: BlockId, kind: BlockKind, text: &str) -> Block {
    Block::from_text(
        BlockCommon::new(id),
        kind,
        TextBlockContent::new(vec![RichTextItem::plain_text(text)]),
    )
    .unwrap()
}

pub fn parent_block(id: BlockId, kind: BlockKind, text: &str) -> Block {
    Block::from_text(
        BlockCommon::new(id).with_children(true),
        kind,
        TextBlockContent::new(vec![RichTextItem::plain_text(text)]),
    )
    .unwrap()
}

/// Options that never sleep.
pub fn fast_options() -> TransformOptions {
    TransformOptions {
        dry_run: false,
        retry: RetryPolicy::immediate(3),
        pause: Duration::ZERO,
        quiet: true,
    }
}
