//! Configuration management for the Zendesk MCP server.
//!
//! This module handles loading configuration from environment variables,
//! with validation to ensure all required values are present.

use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::ZendeskError;

/// Configuration for connecting to Zendesk.
///
/// The API token is stored but never logged or exposed in error messages;
/// the `Debug` implementation redacts it.
#[derive(Clone)]
pub struct Config {
    /// Zendesk subdomain (the `acme` in `acme.zendesk.com`).
    pub subdomain: String,

    /// Email address of the agent the token belongs to.
    pub email: String,

    /// API token for authentication.
    /// This value must never be logged or included in error messages.
    pub api_token: String,

    /// Optional override of the API base URL. When unset the base is
    /// derived from the subdomain.
    pub base_url_override: Option<String>,

    /// Whether to attach `sort_by`/`sort_order` to search requests.
    pub search_sort: bool,

    /// Optional transport timeout. `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
}

impl Config {
    /// Creates a configuration from explicit credentials, with defaults for
    /// every optional setting.
    pub fn new(
        subdomain: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            subdomain: subdomain.into(),
            email: email.into(),
            api_token: api_token.into(),
            base_url_override: None,
            search_sort: true,
            timeout: None,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `ZENDESK_SUBDOMAIN`: The Zendesk subdomain
    /// - `ZENDESK_EMAIL`: Email of the agent owning the token
    /// - `ZENDESK_API_TOKEN`: The API token
    ///
    /// # Optional Environment Variables
    ///
    /// - `ZENDESK_BASE_URL`: Override for the API base URL
    /// - `ZENDESK_SEARCH_SORT`: `false` drops sort parameters from search requests
    /// - `ZENDESK_TIMEOUT_SECS`: Transport timeout in seconds
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` if any required variable is missing
    /// or if values fail validation.
    pub fn from_env() -> Result<Self, ZendeskError> {
        let subdomain = Self::validate_subdomain(Self::get_required_env("ZENDESK_SUBDOMAIN")?)?;
        let email = Self::validate_email(Self::get_required_env("ZENDESK_EMAIL")?)?;
        let api_token = Self::get_required_env("ZENDESK_API_TOKEN")?;
        Self::validate_api_token(&api_token)?;

        let base_url_override = Self::get_optional_env("ZENDESK_BASE_URL")
            .map(Self::validate_base_url)
            .transpose()?;

        let search_sort = Self::get_optional_env("ZENDESK_SEARCH_SORT")
            .map(|v| Self::parse_bool("ZENDESK_SEARCH_SORT", &v))
            .transpose()?
            .unwrap_or(true);

        let timeout = Self::get_optional_env("ZENDESK_TIMEOUT_SECS")
            .map(|v| Self::parse_timeout(&v))
            .transpose()?;

        Ok(Config {
            subdomain,
            email,
            api_token,
            base_url_override,
            search_sort,
            timeout,
        })
    }

    /// Returns the API base URL, e.g. `https://acme.zendesk.com/api/v2`.
    pub fn base_url(&self) -> String {
        match &self.base_url_override {
            Some(url) => url.clone(),
            None => format!("https://{}.zendesk.com/api/v2", self.subdomain),
        }
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, ZendeskError> {
        Self::get_optional_env(name).ok_or_else(|| ZendeskError::missing_env(name))
    }

    fn get_optional_env(name: &str) -> Option<String> {
        env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Validates the subdomain contains only hostname-safe characters.
    fn validate_subdomain(subdomain: String) -> Result<String, ZendeskError> {
        let subdomain = subdomain.trim().to_lowercase();
        let valid = !subdomain.is_empty()
            && !subdomain.starts_with('-')
            && !subdomain.ends_with('-')
            && subdomain
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-');

        if !valid {
            return Err(ZendeskError::invalid_config(
                "ZENDESK_SUBDOMAIN must contain only letters, digits and '-' (e.g. 'acme', not 'acme.zendesk.com')",
            ));
        }
        Ok(subdomain)
    }

    fn validate_email(email: String) -> Result<String, ZendeskError> {
        let email = email.trim().to_string();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
            _ => Err(ZendeskError::invalid_config(
                "ZENDESK_EMAIL must be an email address",
            )),
        }
    }

    /// Validates and normalizes the base URL override.
    fn validate_base_url(url: String) -> Result<String, ZendeskError> {
        let url = url.trim().trim_end_matches('/').to_string();

        let parsed = Url::parse(&url).map_err(|e| {
            ZendeskError::invalid_config(format!("ZENDESK_BASE_URL is not a valid URL: {}", e))
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ZendeskError::invalid_config(
                "ZENDESK_BASE_URL must start with http:// or https://",
            ));
        }

        Ok(url)
    }

    /// Validates the API token is not a placeholder value.
    fn validate_api_token(token: &str) -> Result<(), ZendeskError> {
        let placeholders = [
            "your_api_token",
            "your_api_token_here",
            "your_token",
            "placeholder",
            "xxx",
            "changeme",
        ];

        let token_lower = token.trim().to_lowercase();
        if placeholders.contains(&token_lower.as_str())
            || token_lower.bytes().all(|b| b == b'x')
        {
            return Err(ZendeskError::invalid_config(
                "ZENDESK_API_TOKEN appears to be a placeholder value",
            ));
        }

        Ok(())
    }

    fn parse_bool(name: &str, value: &str) -> Result<bool, ZendeskError> {
        match value.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ZendeskError::invalid_config(format!(
                "{} must be true or false, got {:?}",
                name, value
            ))),
        }
    }

    fn parse_timeout(value: &str) -> Result<Duration, ZendeskError> {
        match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ZendeskError::invalid_config(
                "ZENDESK_TIMEOUT_SECS must be a positive number of seconds",
            )),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("subdomain", &self.subdomain)
            .field("email", &self.email)
            .field("api_token", &"[REDACTED]")
            .field("base_url_override", &self.base_url_override)
            .field("search_sort", &self.search_sort)
            .field("timeout", &self.timeout)
            .finish()
    }
}
