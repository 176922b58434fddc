// src/transform/mod.rs
//! Mutating transforms over a page's block tree.
//!
//! Every transform walks the tree produced by [`BlockTreeFetcher`], counts
//! matches the same way in dry-run and live mode, and records per-block
//! failures instead of aborting the page.

pub mod audit;
pub mod convert;
pub mod replace;

use crate::api::{BlockTree, BlockTreeFetcher, NotionRepository};
use crate::constants::MUTATION_PAUSE;
use crate::error_recovery::RetryPolicy;
use crate::types::{BlockId, NotionId, Warning};
use std::time::Duration;

pub use audit::{audit_h1, HeadingAudit};
pub use convert::{convert_blocks, TypeConversion};
pub use replace::{replace_text, Substitution};

/// Knobs shared by every transform.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Count matches without issuing any write or delete.
    pub dry_run: bool,
    pub retry: RetryPolicy,
    /// Spacing between consecutive mutations.
    pub pause: Duration,
    /// Lower per-block warnings to debug level.
    pub quiet: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            retry: RetryPolicy::default(),
            pause: MUTATION_PAUSE,
            quiet: false,
        }
    }
}

impl TransformOptions {
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub(crate) fn fetcher(&self) -> BlockTreeFetcher {
        BlockTreeFetcher::new(self.retry.clone()).quiet(self.quiet)
    }

    pub(crate) async fn fetch(&self, repo: &dyn NotionRepository, page: &NotionId) -> BlockTree {
        self.fetcher().fetch(repo, page).await
    }

    pub(crate) async fn pause_between_mutations(&self) {
        if !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }
    }

    pub(crate) fn log_block_failure(&self, id: &BlockId, message: &str) {
        if self.quiet {
            log::debug!("Block {} failed: {}", id, message);
        } else {
            log::warn!("Block {} failed: {}", id, message);
        }
    }
}

/// What one transform did to one page.
#[derive(Debug, Clone, Default)]
pub struct TransformOutcome {
    /// Blocks eligible for the transform. Identical in dry-run and live mode.
    pub matched: usize,
    /// Blocks actually rewritten. Always 0 in dry-run mode.
    pub applied: usize,
    /// Matching blocks left alone on purpose.
    pub skipped: usize,
    pub failed: Vec<(BlockId, String)>,
    pub warnings: Vec<Warning>,
    /// Part of the tree could not be listed.
    pub truncated: bool,
}

impl TransformOutcome {
    pub(crate) fn from_tree(tree: &BlockTree) -> Self {
        Self {
            warnings: tree.warnings.clone(),
            truncated: tree.truncated,
            ..Self::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && !self.truncated
    }
}
