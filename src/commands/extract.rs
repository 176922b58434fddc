// src/commands/extract.rs
//! `extract` prints a page's text; `test` checks credentials against a page.

use crate::api::{BlockTree, BlockTreeFetcher, NotionRepository};
use crate::config::{ExtractArgs, TestArgs};
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::formatting::{assemble, ExtractMode};
use crate::model::properties::page_title;
use crate::output::{deliver_all, DeliveryTarget, OutputPlan};
use crate::report::RunReport;
use crate::types::NotionId;

/// Fetches the page tree and assembles its text.
pub async fn page_text(
    repo: &dyn NotionRepository,
    page: &NotionId,
    mode: ExtractMode,
    retry: &RetryPolicy,
) -> (String, BlockTree) {
    let tree = BlockTreeFetcher::new(retry.clone()).fetch(repo, page).await;
    let text = assemble(tree.blocks(), mode);
    (text, tree)
}

pub async fn extract(
    repo: &dyn NotionRepository,
    args: &ExtractArgs,
    retry: &RetryPolicy,
) -> Result<RunReport, AppError> {
    let id = NotionId::parse(&args.page)?;
    let mode = if args.markdown {
        ExtractMode::Structured
    } else {
        ExtractMode::Flat
    };

    let (text, tree) = page_text(repo, &id, mode, retry).await;
    let mut report = RunReport::new("extract");
    for warning in &tree.warnings {
        report.note(warning.to_string());
    }

    let target = match &args.output {
        Some(path) => DeliveryTarget::write_file(path, text.as_str()),
        None => DeliveryTarget::PrintToStdout {
            content: text.clone(),
        },
    };
    deliver_all(OutputPlan::new().with_operation(target))?;

    report.processed(&id);
    report.note(format!(
        "{} blocks, {} chars",
        tree.len(),
        text.chars().count()
    ));
    Ok(report)
}

/// Reads one page and its first children listing.
pub async fn check(
    repo: &dyn NotionRepository,
    args: &TestArgs,
    retry: &RetryPolicy,
) -> Result<RunReport, AppError> {
    let id = NotionId::parse(&args.page)?;
    let page = retry_with_backoff(|| repo.retrieve_page(&id), retry).await?;
    let children = retry_with_backoff(|| repo.list_children(&id, None), retry).await?;

    let mut report = RunReport::new("test");
    report.note(format!(
        "Connected. '{}' has {} top-level block(s){}",
        page_title(&page),
        children.results.len(),
        if children.has_more { " and more" } else { "" }
    ));
    report.processed(&id);
    Ok(report)
}
