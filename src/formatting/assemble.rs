// src/formatting/assemble.rs
//! Content assembly: many extracted blocks to one document.

use super::extract::{extract_block_text, ExtractMode};
use crate::constants::CHARS_PER_BLOCK_ESTIMATE;
use crate::model::Block;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("static regex");
    static ref SENTENCE_JOIN: Regex = Regex::new(r"([.!?])([A-Z])").expect("static regex");
    static ref SPACE_BEFORE_PUNCT: Regex = Regex::new(r"\s+([.,!?;:])").expect("static regex");
    static ref EXCESS_BLANK_LINES: Regex = Regex::new(r"\n{3,}").expect("static regex");
}

/// Concatenates the extracted text of `blocks` in order and normalizes it
/// for the chosen consumer.
pub fn assemble<'a, I>(blocks: I, mode: ExtractMode) -> String
where
    I: IntoIterator<Item = &'a Block>,
{
    let blocks = blocks.into_iter();
    let mut raw = String::with_capacity(blocks.size_hint().0 * CHARS_PER_BLOCK_ESTIMATE);
    for block in blocks {
        raw.push_str(&extract_block_text(block, mode));
    }

    match mode {
        ExtractMode::Flat => normalize_for_speech(&raw),
        ExtractMode::Structured => tidy_markdown(&raw),
    }
}

/// Whitespace and punctuation heuristics for speech-synthesis input.
///
/// Collapses whitespace, separates run-together sentences, drops spaces
/// before punctuation and trims. Intentional multi-space formatting is lost.
pub fn normalize_for_speech(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    let separated = SENTENCE_JOIN.replace_all(&collapsed, "$1 $2");
    let tightened = SPACE_BEFORE_PUNCT.replace_all(&separated, "$1");
    tightened.trim().to_string()
}

/// At most one blank line between blocks, a single trailing newline.
pub fn tidy_markdown(text: &str) -> String {
    let collapsed = EXCESS_BLANK_LINES.replace_all(text, "\n\n");
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}\n", trimmed)
    }
}
