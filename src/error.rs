// src/error.rs
//! Application error types with structured error handling.
//!
//! Every error can be classified with [`AppError::failure_kind`], which is
//! what the retry loop and the command loops dispatch on.

use std::fmt;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded; back off and retry
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited | Self::ServiceUnavailable | Self::InternalError => true,
            Self::HttpStatus(status) => is_transient_status(*status),
            _ => false,
        }
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// How a failure should be handled by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Missing or invalid configuration. Fatal before any work starts.
    Configuration,
    /// Rate limits, server errors and transport failures. Retried.
    Transient,
    /// Validation failures, missing objects. Never retried.
    Permanent,
    /// The provider cannot list or edit this block type. Skipped silently.
    Unsupported,
}

/// 429 and 5xx are worth another attempt.
pub fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Speech synthesis failed ({status}): {message}")]
    Speech { status: u16, message: String },

    #[error("Object store upload failed ({status}): {message}")]
    ObjectStore { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },

    #[error("No payload field was written; {field} failed: {source}")]
    PayloadNotWritten {
        field: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("JSON parse error for {path}: {source}")]
    JsonParseError {
        path: std::path::PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),

    #[error(transparent)]
    NotionClient(#[from] NotionClientError),
}

impl AppError {
    /// Classifies this error for retry and skip decisions.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            AppError::MissingConfiguration(_) | AppError::ValidationError(_) => {
                FailureKind::Configuration
            }
            AppError::NetworkFailure(_) => FailureKind::Transient,
            AppError::NotionService {
                code,
                message,
                status,
            } => classify_notion(code, message, status.as_u16()),
            AppError::NotionClient(NotionClientError::NotionApi {
                status,
                code,
                message,
                ..
            }) => classify_notion(
                &NotionErrorCode::from_api_response(code),
                message,
                u16::try_from(*status).unwrap_or(0),
            ),
            AppError::NotionClient(NotionClientError::Transport { .. }) => FailureKind::Transient,
            AppError::Speech { status, .. } | AppError::ObjectStore { status, .. } => {
                if is_transient_status(*status) {
                    FailureKind::Transient
                } else {
                    FailureKind::Permanent
                }
            }
            AppError::PayloadNotWritten { source, .. } => source.failure_kind(),
            _ => FailureKind::Permanent,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.failure_kind() == FailureKind::Transient
    }

    pub fn is_unsupported(&self) -> bool {
        self.failure_kind() == FailureKind::Unsupported
    }
}

fn classify_notion(code: &NotionErrorCode, message: &str, status: u16) -> FailureKind {
    if code.is_retryable() || is_transient_status(status) {
        FailureKind::Transient
    } else if *code == NotionErrorCode::ValidationFailed && message.contains("not supported") {
        FailureKind::Unsupported
    } else {
        FailureKind::Permanent
    }
}

// Allow converting from anyhow::Error, preserving error chain
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: err.to_string(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Notion client error mapping
#[derive(Error, Debug)]
pub enum NotionClientError {
    #[error("Failed to serialize request: {source}")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to deserialize response: {source}\nBody: {body}")]
    Deserialization {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("HTTP transport error: {message}")]
    Transport { message: String },

    #[error("Invalid authentication header: {message}")]
    InvalidHeader { message: String },

    #[error("Notion API error ({status}): {code} - {message}")]
    NotionApi {
        status: u32,
        code: String,
        message: String,
        request_id: Option<String>,
    },
}

// Convert notion_client errors to our error hierarchy
impl From<notion_client::NotionClientError> for NotionClientError {
    fn from(err: notion_client::NotionClientError) -> Self {
        use notion_client::NotionClientError as NcError;

        match err {
            NcError::FailedToSerialize { source } => Self::Serialization { source },
            NcError::FailedToDeserialize { source, body } => Self::Deserialization { source, body },
            NcError::FailedToRequest { source }
            | NcError::FailedToText { source }
            | NcError::FailedToBuildRequest { source } => Self::Transport {
                message: source.to_string(),
            },
            NcError::InvalidHeader { source } => Self::InvalidHeader {
                message: source.to_string(),
            },
            NcError::InvalidStatusCode { error } => Self::NotionApi {
                status: error.status,
                code: error.code,
                message: error.message,
                request_id: error.request_id,
            },
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn service(code: &str, message: &str, status: u16) -> AppError {
        AppError::NotionService {
            code: NotionErrorCode::from_api_response(code),
            message: message.to_string(),
            status: reqwest::StatusCode::from_u16(status).unwrap(),
        }
    }

    #[test]
    fn rate_limits_and_server_errors_are_transient() {
        assert_eq!(
            service("rate_limited", "slow down", 429).failure_kind(),
            FailureKind::Transient
        );
        assert_eq!(
            service("internal_server_error", "oops", 500).failure_kind(),
            FailureKind::Transient
        );
        assert_eq!(
            service("whatever", "bad gateway", 502).failure_kind(),
            FailureKind::Transient
        );
    }

    #[test]
    fn unsupported_block_type_is_classified() {
        let err = service(
            "validation_error",
            "Block type ai_block is not supported via the API.",
            400,
        );
        assert_eq!(err.failure_kind(), FailureKind::Unsupported);
        assert!(err.is_unsupported());
    }

    #[test]
    fn validation_and_missing_objects_are_permanent() {
        assert_eq!(
            service("validation_error", "body.children should be defined", 400).failure_kind(),
            FailureKind::Permanent
        );
        assert_eq!(
            service("object_not_found", "Could not find block", 404).failure_kind(),
            FailureKind::Permanent
        );
    }

    #[test]
    fn client_errors_classified_like_service_errors() {
        let err = AppError::NotionClient(NotionClientError::NotionApi {
            status: 503,
            code: "service_unavailable".to_string(),
            message: "try later".to_string(),
            request_id: None,
        });
        assert!(err.is_transient());
    }

    #[test]
    fn configuration_errors_are_fatal() {
        assert_eq!(
            AppError::MissingConfiguration("NOTION_API_KEY".into()).failure_kind(),
            FailureKind::Configuration
        );
    }

    #[test]
    fn payload_error_inherits_cause_kind() {
        let err = AppError::PayloadNotWritten {
            field: "Content64".to_string(),
            source: Box::new(AppError::Speech {
                status: 503,
                message: "busy".to_string(),
            }),
        };
        assert_eq!(err.failure_kind(), FailureKind::Transient);
    }
}
