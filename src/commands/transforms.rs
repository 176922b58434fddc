// src/commands/transforms.rs
//! `checkboxes`, `quotes`, `replace`/`dry-run` and `audit-h1`.

use super::confirm::confirm_or_cancel;
use crate::api::NotionRepository;
use crate::config::{AuditArgs, MutationArgs};
use crate::error::AppError;
use crate::model::properties::page_title;
use crate::model::Page;
use crate::pipeline::{collect_pages, Scope};
use crate::report::RunReport;
use crate::transform::{
    audit_h1, convert_blocks, replace_text, Substitution, TransformOptions, TransformOutcome,
    TypeConversion,
};
use crate::types::NotionId;

/// What a mutating command does to each page.
#[derive(Debug, Clone)]
pub enum PageTransform {
    Convert(TypeConversion),
    Replace(Substitution),
}

impl PageTransform {
    fn describe(&self) -> String {
        match self {
            PageTransform::Convert(c) => format!("convert {} blocks to {}", c.from, c.to),
            PageTransform::Replace(s) => {
                format!("replace '{}' with '{}'", s.search(), s.replacement())
            }
        }
    }

    async fn apply(
        &self,
        repo: &dyn NotionRepository,
        page: &NotionId,
        options: &TransformOptions,
    ) -> TransformOutcome {
        match self {
            PageTransform::Convert(conversion) => {
                convert_blocks(repo, page, conversion, options).await
            }
            PageTransform::Replace(substitution) => {
                replace_text(repo, page, substitution, options).await
            }
        }
    }
}

/// Applies `transform` to every page in scope.
///
/// A page with failed blocks is reported as failed; the run continues.
pub async fn run_transform(
    repo: &dyn NotionRepository,
    label: &str,
    transform: &PageTransform,
    args: &MutationArgs,
    options: TransformOptions,
) -> Result<RunReport, AppError> {
    let scope = Scope::from_args(args.scope.page.as_deref(), args.scope.database.as_deref())?;
    let options = options.dry_run(args.dry_run).quiet(args.silent);

    if !options.dry_run {
        confirm_or_cancel(
            &format!("{} on {}?", transform.describe(), scope),
            args.yes,
        )?;
    }

    let pages = collect_pages(repo, &scope, &options.retry).await?;
    let mut report = RunReport::new(label);
    let mut matched = 0;
    let mut applied = 0;
    let mut nested = 0;

    for page in live_pages(&pages, &mut report) {
        let title = page_title(page);
        let outcome = transform.apply(repo, &NotionId::from(&page.id), &options).await;
        matched += outcome.matched;
        applied += outcome.applied;
        nested += outcome.skipped;

        if outcome.truncated {
            report.note(format!("{}: part of the block tree could not be listed", title));
        }
        if outcome.failed.is_empty() {
            report.processed(&title);
        } else {
            report.failed(
                &title,
                format!(
                    "{} of {} block(s) failed; first: {}",
                    outcome.failed.len(),
                    outcome.matched,
                    outcome.failed[0].1
                ),
            );
        }
    }

    if options.dry_run {
        report.note(format!("{} block(s) would change (dry run)", matched));
    } else {
        report.note(format!("{} of {} matching block(s) changed", applied, matched));
    }
    if nested > 0 {
        report.note(format!(
            "{} matching block(s) have nested children and were left unchanged; \
             they still match and no rerun will convert them",
            nested
        ));
    }
    Ok(report)
}

/// Reports level-1 headings per page and optionally demotes them.
pub async fn run_audit(
    repo: &dyn NotionRepository,
    args: &AuditArgs,
    options: TransformOptions,
) -> Result<RunReport, AppError> {
    let scope = Scope::from_args(args.scope.page.as_deref(), args.scope.database.as_deref())?;
    if args.demote {
        confirm_or_cancel(&format!("Demote every H1 on {}?", scope), args.yes)?;
    }

    let pages = collect_pages(repo, &scope, &options.retry).await?;
    let mut report = RunReport::new("audit-h1");
    let mut total = 0;

    for page in live_pages(&pages, &mut report) {
        let title = page_title(page);
        let id = NotionId::from(&page.id);
        let audit = audit_h1(repo, &id, &options).await;
        total += audit.count();

        if !audit.is_clean() {
            println!("{} has {} H1 heading(s):", title, audit.count());
            for heading in &audit.headings {
                println!("  # {}", heading);
            }
        }

        if args.demote && !audit.is_clean() {
            let outcome = convert_blocks(repo, &id, &TypeConversion::H1_DEMOTION, &options).await;
            if !outcome.failed.is_empty() {
                report.failed(&title, format!("{} heading(s) not demoted", outcome.failed.len()));
                continue;
            }
        }
        report.processed(&title);
    }

    report.note(format!("{} H1 heading(s) found", total));
    Ok(report)
}

/// Pages that are not archived; archived ones are reported as skipped.
pub(crate) fn live_pages<'a>(pages: &'a [Page], report: &mut RunReport) -> Vec<&'a Page> {
    pages
        .iter()
        .filter(|page| {
            if page.archived {
                report.skipped(page_title(page), "archived");
                false
            } else {
                true
            }
        })
        .collect()
}
