// src/api/parser.rs
//! Response parsing using notion-client library types.

use super::client::ApiResponse;
use super::responses::{NotionBlock, NotionError, NotionPage, RawListResponse, ToDomain};
use super::types::PaginatedResponse;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionClientError, NotionErrorCode};
use crate::model::{Block, BlockCommon, Page, UnsupportedBlock};
use crate::types::BlockId;
use reqwest::StatusCode;
use serde_json::Value;

/// Parse any Notion API response using notion-client types
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_with_notion_client(&result.data, &result.url)
    } else {
        Err(parse_error_with_notion_client(
            &result.data,
            result.status,
            &result.url,
        ))
    }
}

/// Accepts any successful response, discarding the body.
pub fn expect_success(result: ApiResponse<String>) -> Result<(), AppError> {
    if result.status.is_success() {
        Ok(())
    } else {
        Err(parse_error_with_notion_client(
            &result.data,
            result.status,
            &result.url,
        ))
    }
}

/// Parse successful response using notion-client's robust parsing
fn parse_with_notion_client<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        NotionClientError::Deserialization {
            source: e,
            body: preview(body),
        }
        .into()
    })
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

/// Parse error response using notion-client error types
fn parse_error_with_notion_client(body: &str, status: StatusCode, url: &str) -> AppError {
    // Try to parse as NotionError first
    if let Ok(notion_error) = serde_json::from_str::<NotionError>(body) {
        return NotionClientError::NotionApi {
            status: notion_error.status,
            code: notion_error.code,
            message: notion_error.message,
            request_id: notion_error.request_id,
        }
        .into();
    }

    // Fallback to generic error with HTTP status code
    AppError::NotionService {
        code: NotionErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}: {}", status, url, preview(body)),
        status,
    }
}

/// Parse page response using notion-client
pub fn parse_page_response(result: ApiResponse<String>) -> Result<Page, AppError> {
    let notion_page: NotionPage = parse_api_response(result)?;
    ToDomain::to_domain(notion_page)
}

/// Converts one raw block. Types notion-client cannot deserialize become
/// `Unsupported` with their original tag.
pub fn parse_block_value(raw: Value) -> Result<Block, AppError> {
    let block_type = raw
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    match serde_json::from_value::<NotionBlock>(raw.clone()) {
        Ok(notion_block) => match ToDomain::to_domain(notion_block)? {
            Block::Unsupported(mut unsupported) => {
                unsupported.block_type = block_type;
                Ok(Block::Unsupported(unsupported))
            }
            block => Ok(block),
        },
        Err(e) => {
            log::debug!("Keeping {} block as unsupported: {}", block_type, e);
            let id = raw.get("id").and_then(Value::as_str).ok_or_else(|| {
                AppError::MalformedResponse("Block missing required ID field".to_string())
            })?;
            let has_children = raw
                .get("has_children")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            Ok(Block::Unsupported(UnsupportedBlock {
                common: BlockCommon::new(BlockId::parse(id)?).with_children(has_children),
                block_type,
            }))
        }
    }
}

/// Pagination function for blocks - returns PaginatedResponse
pub fn parse_blocks_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Block>, AppError> {
    let response: RawListResponse = parse_api_response(result)?;
    let blocks = response
        .results
        .into_iter()
        .map(parse_block_value)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PaginatedResponse {
        results: blocks,
        next_cursor: response.next_cursor,
        has_more: response.has_more,
    })
}

/// Pagination function for pages - returns PaginatedResponse
///
/// Search results can include databases; only page objects are kept.
pub fn parse_pages_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Page>, AppError> {
    let response: RawListResponse = parse_api_response(result)?;
    let mut pages = Vec::with_capacity(response.results.len());
    for raw in response.results {
        if raw.get("object").and_then(Value::as_str) != Some("page") {
            continue;
        }
        let notion_page: NotionPage =
            serde_json::from_value(raw).map_err(|e| NotionClientError::Deserialization {
                source: e,
                body: String::new(),
            })?;
        pages.push(notion_page.to_domain()?);
    }

    Ok(PaginatedResponse {
        results: pages,
        next_cursor: response.next_cursor,
        has_more: response.has_more,
    })
}

/// Returns the blocks created by an append call.
pub fn parse_appended_blocks(result: ApiResponse<String>) -> Result<Vec<Block>, AppError> {
    Ok(parse_blocks_pagination(result)?.results)
}
