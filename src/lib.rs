// src/lib.rs
//! notion-ops library: walks, rewrites, exports and narrates Notion workspace
//! content.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `FailureKind`, `ValidationError`
//! - **Domain model**: `Block`, `BlockKind`, `Page`, property conventions
//! - **API client**: `NotionRepository`, `NotionHttpClient`, the block tree fetcher
//! - **Formatting**: text extraction and assembly
//! - **Transforms**: type conversion, find and replace, H1 audit
//! - **Chunking**: synthesis splitting and the chunked payload writer
//! - **Speech / storage**: TTS and object store traits with their clients

pub mod api;
pub mod chunking;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod error_recovery;
pub mod formatting;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod speech;
pub mod storage;
pub mod transform;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, FailureKind, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, NotionSettings, ObjectStoreSettings, SpeechSettings};
pub use crate::error_recovery::RetryPolicy;

// --- Domain Model ---
pub use crate::model::{Block, BlockCommon, BlockKind, Page, PropertyTypeValue, TextBlockContent};

// --- Domain Types ---
pub use crate::types::{
    BlockId, Color, NotionId, PageId, RichTextItem, RichTextType, Warning, WarningLevel,
};

// --- API Client ---
pub use crate::api::{
    fetch_block_tree, BlockTree, BlockTreeFetcher, NewBlock, NotionHttpClient, NotionRepository,
    PaginatedResponse, PropertyUpdate, PropertyUpdates, WalkedBlock,
};

// --- Pipeline ---
pub use crate::chunking::{ChunkedFieldWriter, WriteOutcome, WritePolicy};
pub use crate::formatting::{assemble, extract_block_text, ExtractMode};
pub use crate::pipeline::{collect_pages, Scope};
pub use crate::report::RunReport;
pub use crate::speech::{OpenAiSpeechClient, SpeechSynthesizer};
pub use crate::storage::{ObjectStore, R2ObjectStore};
pub use crate::transform::{
    convert_blocks, replace_text, Substitution, TransformOptions, TransformOutcome,
    TypeConversion,
};
