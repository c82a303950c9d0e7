//! Error types for the Zendesk MCP server.
//!
//! This module defines `ZendeskError`, the unified error type used throughout
//! the crate, and `ErrorKind`, a coarse classification callers can match on
//! without inspecting message text.
//!
//! # Security
//!
//! All error messages are sanitized to ensure the API token is never leaked
//! in logs or error responses. Use `sanitize_message()` when constructing
//! error messages from external sources.

use reqwest::StatusCode;
use thiserror::Error;

/// Coarse classification of a failure.
///
/// Every `ZendeskError` maps to exactly one kind. The `Operation` wrapper is
/// transparent here: its kind is the kind of the underlying cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The ticket, section or other resource does not exist.
    NotFound,
    /// The request never produced an HTTP response (DNS, TLS, connection reset).
    Transport,
    /// Credentials were rejected.
    Auth,
    /// Zendesk answered, but with an error status or an unusable body.
    Upstream,
    /// Local misconfiguration or invalid caller input.
    Invalid,
}

/// Unified error type for all Zendesk operations.
#[derive(Error, Debug)]
pub enum ZendeskError {
    /// Configuration error - missing or invalid environment variables.
    #[error("configuration error: {0}")]
    Config(String),

    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// HTTP request failed during transmission.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Authentication failed - HTTP 401 or 403.
    #[error("authentication failed - check ZENDESK_EMAIL and ZENDESK_API_TOKEN")]
    Authentication,

    /// Requested resource was not found (HTTP 404).
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource, e.g. `ticket 42`.
        resource: String,
    },

    /// HTTP response returned a non-success status code.
    #[error("HTTP {} - {reason}. {body}", .status.as_u16())]
    HttpStatus {
        /// The HTTP status code returned.
        status: StatusCode,
        /// Canonical reason phrase for the status.
        reason: String,
        /// The response body, sanitized and truncated.
        body: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Ticket creation succeeded but the response carried no ticket id.
    #[error("ticket creation response did not include a ticket id")]
    MissingTicketId,

    /// Connection test failed.
    #[error("connection test failed: {message}")]
    ConnectionTest {
        /// Details about why the connection test failed.
        message: String,
    },

    /// A public operation failed; wraps the underlying cause.
    #[error("Failed to {operation}: {source}")]
    Operation {
        /// Operation name with identifiers, e.g. `get ticket 42`.
        operation: String,
        /// The underlying failure.
        #[source]
        source: Box<ZendeskError>,
    },
}

impl ZendeskError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        ZendeskError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ZendeskError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ZendeskError::Validation(message.into())
    }

    /// Creates a not found error for the given resource description.
    pub fn not_found(resource: impl Into<String>) -> Self {
        ZendeskError::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates a connection test error.
    pub fn connection_test(message: impl Into<String>) -> Self {
        ZendeskError::ConnectionTest {
            message: message.into(),
        }
    }

    /// Wraps this error as the failure of `operation`.
    pub fn in_operation(self, operation: impl Into<String>) -> Self {
        ZendeskError::Operation {
            operation: operation.into(),
            source: Box::new(self),
        }
    }

    /// Classifies this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ZendeskError::Config(_)
            | ZendeskError::Validation(_)
            | ZendeskError::HttpClient(_) => ErrorKind::Invalid,
            ZendeskError::Http(_) => ErrorKind::Transport,
            ZendeskError::Authentication => ErrorKind::Auth,
            ZendeskError::NotFound { .. } => ErrorKind::NotFound,
            ZendeskError::HttpStatus { .. }
            | ZendeskError::Serialization(_)
            | ZendeskError::MissingTicketId
            | ZendeskError::ConnectionTest { .. } => ErrorKind::Upstream,
            ZendeskError::Operation { source, .. } => source.kind(),
        }
    }

    /// Returns the innermost error, looking through `Operation` wrappers.
    #[must_use]
    pub fn root(&self) -> &ZendeskError {
        match self {
            ZendeskError::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// Sanitizes an error message to remove any occurrence of the API token.
    ///
    /// # Returns
    ///
    /// The message with any occurrence of the token replaced with `[REDACTED]`
    #[must_use]
    pub fn sanitize_message(message: &str, api_token: &str) -> String {
        if api_token.is_empty() {
            return message.to_string();
        }
        message.replace(api_token, "[REDACTED]")
    }

    /// Creates a sanitized version of this error's display message.
    #[must_use]
    pub fn sanitized_display(&self, api_token: &str) -> String {
        Self::sanitize_message(&self.to_string(), api_token)
    }
}
