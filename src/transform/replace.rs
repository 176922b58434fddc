// src/transform/replace.rs
//! In-place find and replace over block text.
//!
//! Matching is an exact, case-sensitive substring search with no word
//! boundaries: replacing `cat` also rewrites `category`.

use super::{TransformOptions, TransformOutcome};
use crate::api::NotionRepository;
use crate::error_recovery::retry_with_backoff;
use crate::model::Block;
use crate::types::{NotionId, RichTextItem, RichTextType, ValidationError};

/// A search string and its replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    search: String,
    replace: String,
}

impl Substitution {
    pub fn new(
        search: impl Into<String>,
        replace: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let search = search.into();
        if search.is_empty() {
            return Err(ValidationError::EmptyField("search"));
        }
        Ok(Self {
            search,
            replace: replace.into(),
        })
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn replacement(&self) -> &str {
        &self.replace
    }

    fn apply(&self, value: &mut String) -> bool {
        if !value.contains(&self.search) {
            return false;
        }
        *value = value.replace(&self.search, &self.replace);
        true
    }

    /// Rewrites text content, link targets and hrefs. Returns whether
    /// anything changed.
    pub fn apply_to_spans(&self, spans: &mut [RichTextItem]) -> bool {
        let mut changed = false;
        for span in spans.iter_mut() {
            if let RichTextType::Text { content, link } = &mut span.text_type {
                if self.apply(content) {
                    span.plain_text = content.clone();
                    changed = true;
                }
                if let Some(link) = link {
                    changed |= self.apply(&mut link.url);
                }
            }
            if let Some(href) = &mut span.href {
                changed |= self.apply(href);
            }
        }
        changed
    }

    /// The rewritten block, or `None` when nothing matches.
    pub fn apply_to_block(&self, block: &Block) -> Option<Block> {
        let mut rewritten = block.clone();
        let content = rewritten.text_mut()?;
        if self.apply_to_spans(&mut content.rich_text) {
            Some(rewritten)
        } else {
            None
        }
    }
}

/// Replaces text in every text-bearing block of the page's tree.
///
/// Each changed block is written back with a single update call.
pub async fn replace_text(
    repo: &dyn NotionRepository,
    page: &NotionId,
    substitution: &Substitution,
    options: &TransformOptions,
) -> TransformOutcome {
    let tree = options.fetch(repo, page).await;
    let mut outcome = TransformOutcome::from_tree(&tree);

    for block in tree.blocks() {
        let Some(rewritten) = substitution.apply_to_block(block) else {
            continue;
        };

        outcome.matched += 1;
        if options.dry_run {
            log::info!(
                "Would rewrite {} {}: {} -> {}",
                block.block_type(),
                block.id(),
                block.plain_text(),
                rewritten.plain_text()
            );
            continue;
        }

        match retry_with_backoff(|| repo.update_block_text(&rewritten), &options.retry).await {
            Ok(()) => {
                outcome.applied += 1;
                log::debug!("Rewrote {} {}", block.block_type(), block.id());
            }
            Err(e) => {
                let message = e.to_string();
                options.log_block_failure(block.id(), &message);
                outcome.failed.push((block.id().clone(), message));
            }
        }
        options.pause_between_mutations().await;
    }

    log::info!(
        "Replace '{}' -> '{}' on {}: {} matched, {} updated, {} failed",
        substitution.search,
        substitution.replace,
        page,
        outcome.matched,
        outcome.applied,
        outcome.failed.len()
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockCommon, BlockKind, TextBlockContent};
    use pretty_assertions::assert_eq;

    fn paragraph(spans: Vec<RichTextItem>) -> Block {
        Block::from_text(
            BlockCommon::default(),
            BlockKind::Paragraph,
            TextBlockContent::new(spans),
        )
        .unwrap()
    }

    #[test]
    fn replaces_every_occurrence() {
        let sub = Substitution::new("foo", "bar").unwrap();
        let block = paragraph(vec![RichTextItem::plain_text("foo is foofoo")]);
        let rewritten = sub.apply_to_block(&block).unwrap();
        assert_eq!(rewritten.plain_text(), "bar is barbar");
    }

    #[test]
    fn matching_ignores_word_boundaries() {
        let sub = Substitution::new("cat", "dog").unwrap();
        let block = paragraph(vec![RichTextItem::plain_text("the category")]);
        assert_eq!(
            sub.apply_to_block(&block).unwrap().plain_text(),
            "the dogegory"
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        let sub = Substitution::new("Foo", "bar").unwrap();
        let block = paragraph(vec![RichTextItem::plain_text("foo")]);
        assert!(sub.apply_to_block(&block).is_none());
    }

    #[test]
    fn link_targets_are_rewritten() {
        let sub = Substitution::new("old.example", "new.example").unwrap();
        let mut spans = vec![RichTextItem::link("docs", "https://old.example/a")];
        assert!(sub.apply_to_spans(&mut spans));
        assert_eq!(spans[0].href.as_deref(), Some("https://new.example/a"));
        match &spans[0].text_type {
            RichTextType::Text { content, link } => {
                assert_eq!(content, "docs");
                assert_eq!(link.as_ref().unwrap().url, "https://new.example/a");
            }
            other => panic!("unexpected span {:?}", other),
        }
    }

    #[test]
    fn empty_search_is_rejected() {
        assert!(Substitution::new("", "x").is_err());
    }

    #[test]
    fn non_text_blocks_never_match() {
        let sub = Substitution::new("a", "b").unwrap();
        assert!(sub.apply_to_block(&Block::Divider(Default::default())).is_none());
    }
}
