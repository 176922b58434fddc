// src/api/pagination.rs
//! Cursor threading for paginated list endpoints.

use super::types::{PaginatedResponse, PaginationResult};
use crate::error::AppError;

/// Fetches all pages using async closures directly.
///
/// The closure receives the cursor of the previous response; the first call
/// gets `None`. Stops when the provider reports no more results.
pub async fn fetch_all_pages<T, F, Fut>(
    mut fetch_fn: F,
    max_pages: Option<usize>,
) -> Result<PaginationResult<T>, AppError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor = None;
    let mut calls = 0usize;

    loop {
        // Check if we've reached the page limit
        if let Some(max) = max_pages {
            if calls >= max {
                log::debug!("Reached maximum page limit: {}", max);
                break;
            }
        }

        let response = fetch_fn(cursor).await?;
        calls += 1;

        all_items.extend(response.results);
        cursor = response.next_cursor;

        if !response.has_more || cursor.is_none() {
            break;
        }
    }

    Ok(PaginationResult {
        items: all_items,
        calls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn threads_cursor_until_exhausted() {
        let seen = Mutex::new(Vec::new());
        let result = fetch_all_pages(
            |cursor: Option<String>| {
                seen.lock().unwrap().push(cursor.clone());
                async move {
                    Ok(match cursor.as_deref() {
                        None => PaginatedResponse {
                            results: vec![1, 2],
                            next_cursor: Some("c1".to_string()),
                            has_more: true,
                        },
                        Some("c1") => PaginatedResponse {
                            results: vec![3],
                            next_cursor: Some("c2".to_string()),
                            has_more: true,
                        },
                        _ => PaginatedResponse::last(vec![4]),
                    })
                }
            },
            None,
        )
        .await
        .unwrap();

        assert_eq!(result.items, vec![1, 2, 3, 4]);
        assert_eq!(result.calls, 3);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[tokio::test]
    async fn respects_page_limit() {
        let result = fetch_all_pages(
            |_cursor| async {
                Ok(PaginatedResponse {
                    results: vec!['a'],
                    next_cursor: Some("more".to_string()),
                    has_more: true,
                })
            },
            Some(2),
        )
        .await
        .unwrap();
        assert_eq!(result.items.len(), 2);
    }
}
