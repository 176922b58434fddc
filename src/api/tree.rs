// src/api/tree.rs
//! Block tree fetcher: flattens a page's block hierarchy in pre-order.
//!
//! The walk keeps an explicit stack of sibling queues instead of recursing,
//! so arbitrarily deep pages cannot exhaust the call stack.

use super::NotionRepository;
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::model::{Block, BlockKind};
use crate::types::{NotionId, Warning, WarningLevel};
use std::collections::VecDeque;

/// One block in walk order, with the container it was listed under.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkedBlock {
    pub block: Block,
    /// The page or block whose children listing returned this block.
    pub parent: NotionId,
    /// 0 for the root's direct children.
    pub depth: usize,
}

/// The flattened tree, possibly partial.
#[derive(Debug, Clone, Default)]
pub struct BlockTree {
    pub entries: Vec<WalkedBlock>,
    /// Provider listing calls made, one per result page.
    pub listing_calls: usize,
    pub warnings: Vec<Warning>,
    /// A listing failed somewhere and a subtree is missing.
    pub truncated: bool,
}

impl BlockTree {
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.entries.iter().map(|entry| &entry.block)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_kind(&self, kind: BlockKind) -> usize {
        self.blocks().filter(|block| block.kind() == kind).count()
    }
}

/// Walks block trees with a given retry policy for listing calls.
#[derive(Debug, Clone, Default)]
pub struct BlockTreeFetcher {
    retry: RetryPolicy,
    quiet: bool,
}

/// Children of one container still waiting to be emitted.
struct SiblingQueue {
    parent: NotionId,
    depth: usize,
    pending: VecDeque<Block>,
}

impl BlockTreeFetcher {
    pub fn new(retry: RetryPolicy) -> Self {
        Self {
            retry,
            quiet: false,
        }
    }

    /// Logs listing failures at debug level instead of warn.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Fetches every block under `root` in pre-order.
    ///
    /// Descends into any block with children except sub-pages and databases.
    /// A failed listing stops that subtree and is recorded as a warning; the
    /// walk continues with the remaining siblings.
    pub async fn fetch(&self, repo: &dyn NotionRepository, root: &NotionId) -> BlockTree {
        let mut tree = BlockTree::default();
        let root_children = self.list_all(repo, root, &mut tree).await;

        let mut stack = vec![SiblingQueue {
            parent: root.clone(),
            depth: 0,
            pending: root_children.into(),
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(block) = frame.pending.pop_front() else {
                stack.pop();
                continue;
            };
            let parent = frame.parent.clone();
            let depth = frame.depth;

            let descend = block.has_children() && !block.kind().is_separate_container();
            let id = NotionId::from(block.id());
            tree.entries.push(WalkedBlock {
                block,
                parent,
                depth,
            });

            if descend {
                let children = self.list_all(repo, &id, &mut tree).await;
                if !children.is_empty() {
                    stack.push(SiblingQueue {
                        parent: id,
                        depth: depth + 1,
                        pending: children.into(),
                    });
                }
            }
        }

        log::debug!(
            "Fetched {} blocks under {} with {} listing calls",
            tree.entries.len(),
            root,
            tree.listing_calls
        );
        tree
    }

    /// Lists all children of one container, keeping whatever was fetched
    /// before a failure.
    async fn list_all(
        &self,
        repo: &dyn NotionRepository,
        parent: &NotionId,
        tree: &mut BlockTree,
    ) -> Vec<Block> {
        let mut children = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            tree.listing_calls += 1;
            let request_cursor = cursor.clone();
            let result = retry_with_backoff(
                || repo.list_children(parent, request_cursor.clone()),
                &self.retry,
            )
            .await;

            match result {
                Ok(page) => {
                    children.extend(page.results);
                    match page.next_cursor {
                        Some(next) if page.has_more => cursor = Some(next),
                        _ => break,
                    }
                }
                Err(e) if e.is_unsupported() => {
                    log::debug!("Skipping children of {}: {}", parent, e);
                    break;
                }
                Err(e) => {
                    self.record_failure(parent, &e, tree);
                    break;
                }
            }
        }

        children
    }

    fn record_failure(&self, parent: &NotionId, error: &AppError, tree: &mut BlockTree) {
        if self.quiet {
            log::debug!("Failed to list children of {}: {}", parent, error);
        } else {
            log::warn!("Failed to list children of {}: {}", parent, error);
        }
        tree.warnings.push(
            Warning::new(
                WarningLevel::Warning,
                format!("Children of {} could not be listed", parent),
            )
            .with_context(error.to_string()),
        );
        tree.truncated = true;
    }
}

/// Fetches a block tree with the default retry policy.
pub async fn fetch_block_tree(repo: &dyn NotionRepository, root: &NotionId) -> BlockTree {
    BlockTreeFetcher::default().fetch(repo, root).await
}
