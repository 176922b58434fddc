// tests/tree_walk.rs
//! Block tree fetching against an in-memory workspace.

mod common;

use common::*;
use notion_ops::model::ChildPageBlock;
use notion_ops::{Block, BlockCommon, BlockKind, BlockTreeFetcher, NotionId, RetryPolicy};
use pretty_assertions::assert_eq;
use std::sync::atomic::Ordering;

fn fetcher() -> BlockTreeFetcher {
    BlockTreeFetcher::new(RetryPolicy::immediate(3)).quiet(true)
}

fn texts(tree: &notion_ops::BlockTree) -> Vec<String> {
    tree.blocks().map(|b| b.plain_text()).collect()
}

#[tokio::test]
async fn paginated_listing_returns_every_child_in_order() {
    let repo = FakeNotion::with_page_size(100);
    let page = notion_id(&page_id(1));
    let blocks: Vec<Block> = (0..250)
        .map(|i| text_block(block_id(i), BlockKind::Paragraph, &format!("p{}", i)))
        .collect();
    repo.set_children(&page, blocks);

    let tree = fetcher().fetch(&repo, &page).await;

    assert_eq!(tree.len(), 250);
    assert_eq!(tree.listing_calls, 3);
    assert_eq!(repo.listing_calls.load(Ordering::SeqCst), 3);
    assert_eq!(texts(&tree)[0], "p0");
    assert_eq!(texts(&tree)[249], "p249");
    assert!(!tree.truncated);
}

#[tokio::test]
async fn failure_on_a_later_page_keeps_earlier_children() {
    let repo = FakeNotion::with_page_size(100);
    let page = notion_id(&page_id(1));
    let blocks: Vec<Block> = (0..250)
        .map(|i| text_block(block_id(i), BlockKind::Paragraph, &format!("p{}", i)))
        .collect();
    repo.set_children(&page, blocks);
    repo.fail_listing_at(&page, "100", Failure::Permanent);

    let tree = fetcher().fetch(&repo, &page).await;

    assert_eq!(tree.len(), 100);
    assert_eq!(texts(&tree)[0], "p0");
    assert_eq!(texts(&tree)[99], "p99");
    assert!(tree.truncated);
    assert_eq!(tree.warnings.len(), 1);
    assert_eq!(tree.listing_calls, 2);
    assert_eq!(repo.listing_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn nested_blocks_come_out_in_pre_order() {
    let repo = FakeNotion::new();
    let page = notion_id(&page_id(1));
    let a = parent_block(block_id(1), BlockKind::Toggle, "A");
    let a1 = parent_block(block_id(2), BlockKind::BulletedListItem, "A1");
    let a1a = text_block(block_id(3), BlockKind::Paragraph, "A1a");
    let a2 = text_block(block_id(4), BlockKind::Paragraph, "A2");
    let b = text_block(block_id(5), BlockKind::Paragraph, "B");

    repo.set_children(&page, vec![a.clone(), b]);
    repo.set_children(&NotionId::from(a.id()), vec![a1.clone(), a2]);
    repo.set_children(&NotionId::from(a1.id()), vec![a1a]);

    let tree = fetcher().fetch(&repo, &page).await;

    assert_eq!(texts(&tree), vec!["A", "A1", "A1a", "A2", "B"]);
    let depths: Vec<usize> = tree.entries.iter().map(|e| e.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 1, 0]);
    assert_eq!(tree.entries[1].parent, NotionId::from(a.id()));
    assert_eq!(tree.entries[4].parent, page);
}

#[tokio::test]
async fn child_pages_are_listed_but_not_entered() {
    let repo = FakeNotion::new();
    let page = notion_id(&page_id(1));
    let sub_page = Block::ChildPage(ChildPageBlock {
        common: BlockCommon::new(block_id(1)).with_children(true),
        title: "Sub".to_string(),
    });
    repo.set_children(&page, vec![sub_page.clone()]);
    repo.set_children(
        &NotionId::from(sub_page.id()),
        vec![text_block(block_id(2), BlockKind::Paragraph, "hidden")],
    );

    let tree = fetcher().fetch(&repo, &page).await;

    assert_eq!(tree.len(), 1);
    assert_eq!(tree.count_kind(BlockKind::ChildPage), 1);
    assert_eq!(tree.listing_calls, 1);
}

#[tokio::test]
async fn failed_subtree_is_recorded_and_siblings_continue() {
    let repo = FakeNotion::new();
    let page = notion_id(&page_id(1));
    let broken = parent_block(block_id(1), BlockKind::Toggle, "broken");
    repo.set_children(
        &page,
        vec![
            broken.clone(),
            text_block(block_id(2), BlockKind::Paragraph, "after"),
        ],
    );
    repo.fail_listing(&NotionId::from(broken.id()), Failure::Permanent);

    let tree = fetcher().fetch(&repo, &page).await;

    assert_eq!(texts(&tree), vec!["broken", "after"]);
    assert!(tree.truncated);
    assert_eq!(tree.warnings.len(), 1);
}

#[tokio::test]
async fn unsupported_children_are_skipped_silently() {
    let repo = FakeNotion::new();
    let page = notion_id(&page_id(1));
    let odd = parent_block(block_id(1), BlockKind::Callout, "odd");
    repo.set_children(&page, vec![odd.clone()]);
    repo.fail_listing(&NotionId::from(odd.id()), Failure::Unsupported);

    let tree = fetcher().fetch(&repo, &page).await;

    assert_eq!(tree.len(), 1);
    assert!(!tree.truncated);
    assert!(tree.warnings.is_empty());
}

#[tokio::test]
async fn transient_listing_failures_are_retried() {
    let repo = FakeNotion::new();
    let page = notion_id(&page_id(1));
    repo.set_children(
        &page,
        vec![text_block(block_id(1), BlockKind::Paragraph, "ok")],
    );
    repo.fail_listing(&page, Failure::Transient(2));

    let tree = fetcher().fetch(&repo, &page).await;

    assert_eq!(texts(&tree), vec!["ok"]);
    assert_eq!(repo.listing_calls.load(Ordering::SeqCst), 3);
    assert_eq!(tree.listing_calls, 1);
    assert!(!tree.truncated);
}

#[tokio::test]
async fn exhausted_retries_truncate_the_root() {
    let repo = FakeNotion::new();
    let page = notion_id(&page_id(1));
    repo.set_children(
        &page,
        vec![text_block(block_id(1), BlockKind::Paragraph, "never seen")],
    );
    repo.fail_listing(&page, Failure::Transient(5));

    let tree = fetcher().fetch(&repo, &page).await;

    assert!(tree.is_empty());
    assert!(tree.truncated);
    assert_eq!(repo.listing_calls.load(Ordering::SeqCst), 3);
}
