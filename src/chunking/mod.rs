// src/chunking/mod.rs
//! Splitting long text for synthesis and storing long payloads across
//! several size-limited properties.

pub mod split;
pub mod writer;

pub use split::{slice_fixed, split_for_synthesis};
pub use writer::{plan_fields, ChunkedFieldWriter, FieldChunk, WriteOutcome, WritePolicy};
