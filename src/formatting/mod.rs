// src/formatting/mod.rs
//! Turns block trees into text for speech synthesis or markdown export.

pub mod assemble;
pub mod extract;

pub use assemble::{assemble, normalize_for_speech, tidy_markdown};
pub use extract::{extract_block_text, ExtractMode};
