// src/pipeline.rs
//! Scope resolution: which pages a command runs over.

use crate::api::pagination::fetch_all_pages;
use crate::api::NotionRepository;
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::model::Page;
use crate::types::NotionId;
use std::fmt;

/// The set of pages a command operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Page(NotionId),
    /// Every row of a database.
    Database(NotionId),
    /// Every page shared with the integration.
    Workspace,
}

impl Scope {
    /// `--page` wins over `--database`; neither means the whole workspace.
    pub fn from_args(page: Option<&str>, database: Option<&str>) -> Result<Self, AppError> {
        match (page, database) {
            (Some(_), Some(_)) => Err(AppError::Validation(
                "--page and --database are mutually exclusive".to_string(),
            )),
            (Some(page), None) => Ok(Scope::Page(NotionId::parse(page)?)),
            (None, Some(database)) => Ok(Scope::Database(NotionId::parse(database)?)),
            (None, None) => Ok(Scope::Workspace),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Page(id) => write!(f, "page {}", id),
            Scope::Database(id) => write!(f, "database {}", id),
            Scope::Workspace => write!(f, "all shared pages"),
        }
    }
}

/// Resolves a scope into pages, in provider order.
pub async fn collect_pages(
    repo: &dyn NotionRepository,
    scope: &Scope,
    retry: &RetryPolicy,
) -> Result<Vec<Page>, AppError> {
    let pages = match scope {
        Scope::Page(id) => vec![retry_with_backoff(|| repo.retrieve_page(id), retry).await?],
        Scope::Database(id) => {
            let result = fetch_all_pages(
                |cursor| async move {
                    retry_with_backoff(|| repo.query_database(id, cursor.clone()), retry).await
                },
                None,
            )
            .await?;
            log::debug!("Database {} listed in {} calls", id, result.calls);
            result.items
        }
        Scope::Workspace => {
            let result = fetch_all_pages(
                |cursor| async move {
                    retry_with_backoff(|| repo.search_pages(cursor.clone()), retry).await
                },
                None,
            )
            .await?;
            log::debug!("Search listed {} pages in {} calls", result.items.len(), result.calls);
            result.items
        }
    };

    log::info!("Resolved {} to {} page(s)", scope, pages.len());
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_from_args() {
        let id = "1234567890abcdef1234567890abcdef";
        assert_eq!(
            Scope::from_args(Some(id), None).unwrap(),
            Scope::Page(NotionId::parse(id).unwrap())
        );
        assert_eq!(
            Scope::from_args(None, Some(id)).unwrap(),
            Scope::Database(NotionId::parse(id).unwrap())
        );
        assert_eq!(Scope::from_args(None, None).unwrap(), Scope::Workspace);
        assert!(Scope::from_args(Some(id), Some(id)).is_err());
        assert!(Scope::from_args(Some("not an id"), None).is_err());
    }
}
