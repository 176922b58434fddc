// src/api/client.rs
//! Thin HTTP client wrapper for the Notion API.
//!
//! Handles authentication and the raw request/response exchange. Parsing
//! lives in `parser`, request bodies in `requests`.

use super::parser;
use super::requests;
use super::types::{NewBlock, PaginatedResponse, PropertyUpdates};
use super::NotionRepository;
use crate::constants::{NOTION_API_BASE, NOTION_API_PAGE_SIZE, NOTION_API_VERSION};
use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::{ApiKey, BlockId, NotionId, PageId};
use reqwest::{header, Client, Response};
use serde::Serialize;

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        Self::with_base_url(api_key, NOTION_API_BASE)
    }

    /// Creates a client against a different API root.
    pub fn with_base_url(api_key: &ApiKey, base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Makes a GET request to the specified endpoint.
    pub async fn get(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<String>, AppError> {
        let url = self.url(endpoint);
        log::debug!("GET {} {:?}", url, query);
        let response = self.client.get(url).query(query).send().await?;
        extract_response_text(response).await
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<ApiResponse<String>, AppError> {
        let url = self.url(endpoint);
        log::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        extract_response_text(response).await
    }

    /// Makes a PATCH request with JSON body to the specified endpoint.
    pub async fn patch<T: Serialize>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<ApiResponse<String>, AppError> {
        let url = self.url(endpoint);
        log::debug!("PATCH {}", url);
        let response = self.client.patch(url).json(body).send().await?;
        extract_response_text(response).await
    }

    /// Makes a DELETE request to the specified endpoint.
    pub async fn delete(&self, endpoint: &str) -> Result<ApiResponse<String>, AppError> {
        let url = self.url(endpoint);
        log::debug!("DELETE {}", url);
        let response = self.client.delete(url).send().await?;
        extract_response_text(response).await
    }
}

#[async_trait::async_trait]
impl NotionRepository for NotionHttpClient {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError> {
        let endpoint = format!("pages/{}", id.to_hyphenated());
        parser::parse_page_response(self.get(&endpoint, &[]).await?)
    }

    async fn list_children(
        &self,
        parent: &NotionId,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", parent.to_hyphenated());
        let mut query = vec![("page_size", NOTION_API_PAGE_SIZE.to_string())];
        if let Some(cursor) = cursor {
            query.push(("start_cursor", cursor));
        }
        parser::parse_blocks_pagination(self.get(&endpoint, &query).await?)
    }

    async fn query_database(
        &self,
        database: &NotionId,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Page>, AppError> {
        let endpoint = format!("databases/{}/query", database.to_hyphenated());
        let body = requests::query_body(NOTION_API_PAGE_SIZE, cursor.as_deref());
        parser::parse_pages_pagination(self.post(&endpoint, &body).await?)
    }

    async fn search_pages(&self, cursor: Option<String>) -> Result<PaginatedResponse<Page>, AppError> {
        let body = requests::search_pages_body(NOTION_API_PAGE_SIZE, cursor.as_deref());
        parser::parse_pages_pagination(self.post("search", &body).await?)
    }

    async fn update_page_properties(
        &self,
        page: &PageId,
        updates: &PropertyUpdates,
    ) -> Result<(), AppError> {
        let endpoint = format!("pages/{}", page.to_dashed());
        let body = requests::property_updates_body(updates);
        parser::expect_success(self.patch(&endpoint, &body).await?)
    }

    async fn append_after(
        &self,
        parent: &NotionId,
        after: Option<&BlockId>,
        children: &[NewBlock],
    ) -> Result<Vec<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", parent.to_hyphenated());
        let body = requests::append_children_body(children, after);
        parser::parse_appended_blocks(self.patch(&endpoint, &body).await?)
    }

    async fn update_block_text(&self, block: &Block) -> Result<(), AppError> {
        let body = requests::update_block_body(block).ok_or_else(|| {
            AppError::Validation(format!("{} blocks carry no text", block.block_type()))
        })?;
        let endpoint = format!("blocks/{}", block.id().to_dashed());
        parser::expect_success(self.patch(&endpoint, &body).await?)
    }

    async fn delete_block(&self, id: &BlockId) -> Result<(), AppError> {
        let endpoint = format!("blocks/{}", id.to_dashed());
        parser::expect_success(self.delete(&endpoint).await?)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
