// src/commands/export.rs
//! `pull` exports a database to disk; `sync` pushes recorded media links back.

use super::transforms::live_pages;
use crate::api::{BlockTreeFetcher, NotionRepository, PropertyUpdate, PropertyUpdates};
use crate::config::{PullArgs, SyncArgs};
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::formatting::{assemble, ExtractMode};
use crate::model::properties::{
    audio_link, audio_link_property, page_slug, page_title, video_link, video_link_property,
};
use crate::output::{
    deliver_all, plan_export, read_manifest, scan_sidecars, ExportedPage, MediaRecord,
    PageMetadata, SlugAllocator,
};
use crate::pipeline::{collect_pages, Scope};
use crate::report::RunReport;
use crate::types::{NotionId, PageId};
use chrono::Utc;

pub async fn pull(
    repo: &dyn NotionRepository,
    args: &PullArgs,
    retry: &RetryPolicy,
) -> Result<RunReport, AppError> {
    let database = NotionId::parse(&args.database)?;
    let pages = collect_pages(repo, &Scope::Database(database.clone()), retry).await?;
    let fetcher = BlockTreeFetcher::new(retry.clone());
    let exported_at = Utc::now();

    let mut report = RunReport::new("pull");
    let mut slugs = SlugAllocator::new();
    let mut exported = Vec::new();

    for page in live_pages(&pages, &mut report) {
        let title = page_title(page);
        let id = NotionId::from(&page.id);
        let tree = fetcher.fetch(repo, &id).await;
        if tree.truncated {
            report.note(format!("{}: exported from an incomplete block tree", title));
        }

        let slug = slugs.allocate(&page_slug(page), &id);
        exported.push(ExportedPage {
            metadata: PageMetadata::from_page(page, &slug, exported_at),
            body: assemble(tree.blocks(), ExtractMode::Structured),
        });
        report.processed(&title);
    }

    let plan = plan_export(&args.out, &database.to_hyphenated(), &exported, exported_at)?;
    let delivered = deliver_all(plan)?;
    report.note(format!(
        "Wrote {} file(s), {} bytes, to {}",
        delivered.stats.operations_completed.saturating_sub(1),
        delivered.stats.bytes_written,
        args.out.display()
    ));
    Ok(report)
}

/// Property updates needed to bring `page` in line with `record`.
pub fn media_updates(page: &crate::model::Page, record: &MediaRecord) -> PropertyUpdates {
    let mut updates = PropertyUpdates::new();
    if let Some(url) = &record.audio_url {
        if audio_link(page).as_deref() != Some(url.as_str()) {
            updates.insert(
                audio_link_property(page).to_string(),
                PropertyUpdate::Url(Some(url.clone())),
            );
        }
    }
    if let Some(url) = &record.video_url {
        if video_link(page).as_deref() != Some(url.as_str()) {
            updates.insert(
                video_link_property(page).to_string(),
                PropertyUpdate::Url(Some(url.clone())),
            );
        }
    }
    updates
}

pub async fn sync(
    repo: &dyn NotionRepository,
    args: &SyncArgs,
    retry: &RetryPolicy,
) -> Result<RunReport, AppError> {
    let manifest = read_manifest(&args.dir)?;
    let mut report = RunReport::new("sync");

    for (path, record) in scan_sidecars(&args.dir)? {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                report.failed(path.display(), e.to_string());
                continue;
            }
        };
        let Some(entry) = manifest.find_slug(&record.slug) else {
            report.skipped(&record.slug, "not in manifest");
            continue;
        };
        if !record.has_media() {
            report.skipped(&record.slug, "no media URLs recorded");
            continue;
        }

        let result = sync_one(repo, &entry.id, &record, args.dry_run, retry).await;
        match result {
            Ok(0) => report.skipped(&record.slug, "already up to date"),
            Ok(_) => report.processed(&record.slug),
            Err(e) => report.failed(&record.slug, e.to_string()),
        }
    }

    Ok(report)
}

/// Returns the number of properties written (or that would be written).
async fn sync_one(
    repo: &dyn NotionRepository,
    page_id: &str,
    record: &MediaRecord,
    dry_run: bool,
    retry: &RetryPolicy,
) -> Result<usize, AppError> {
    let page_id = PageId::parse(page_id)?;
    let notion_id = NotionId::from(&page_id);
    let page = retry_with_backoff(|| repo.retrieve_page(&notion_id), retry).await?;
    let updates = media_updates(&page, record);

    if updates.is_empty() {
        return Ok(0);
    }
    if dry_run {
        for name in updates.keys() {
            log::info!("Would update {} on {}", name, record.slug);
        }
        return Ok(updates.len());
    }

    retry_with_backoff(|| repo.update_page_properties(&page_id, &updates), retry).await?;
    Ok(updates.len())
}
