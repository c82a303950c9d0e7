//! HTTP client for the Zendesk API.
//!
//! This module provides the `ZendeskClient` struct for making authenticated
//! requests to the Zendesk REST API (`https://{subdomain}.zendesk.com/api/v2`).
//!
//! Every public operation either fully succeeds or returns a
//! `ZendeskError::Operation` naming the operation and the identifiers
//! involved. Failures are not retried.
//!
//! # Security
//!
//! The API token is never logged. Error bodies are sanitized before they are
//! stored in an error.

use std::sync::Arc;

use base64::prelude::{Engine as _, BASE64_STANDARD};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::ZendeskError;
use crate::models::{
    ArticleListResponse, ArticleSummary, Comment, CommentListResponse, CommentUpdate,
    CreateTicketResponse, KnowledgeBase, KnowledgeBaseSection, NewComment, NewTicket,
    SearchResponse, SectionListResponse, TicketEnvelope, TicketListResponse, TicketPage,
    TicketSummary, TicketUpdate,
};
use crate::query::TicketListParams;

/// Maximum length for HTTP error response bodies kept in errors.
const MAX_ERROR_BODY_LEN: usize = 500;

/// HTTP client for the Zendesk API.
///
/// Owns its HTTP connection pool, credentials and clock. Cloning is cheap
/// and clones share the connection pool; there is no other shared state.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let client = ZendeskClient::new(&config)?;
///
/// let page = client.list_tickets(&TicketListParams::new().with_last_hours(24)).await?;
/// ```
#[derive(Clone)]
pub struct ZendeskClient {
    /// The underlying HTTP client (cloning is cheap).
    http: Client,

    /// Base URL for the API (e.g., `https://acme.zendesk.com/api/v2`).
    base_url: String,

    /// Precomputed `Authorization` header value.
    /// SECURITY: Never log this value!
    auth_header: String,

    /// API token, kept only to scrub it from error text.
    api_token: String,

    /// Whether search requests carry sort parameters.
    search_sort: bool,

    /// Time source for relative filters.
    clock: Arc<dyn Clock>,
}

impl ZendeskClient {
    /// Creates a new Zendesk client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, ZendeskError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ZendeskError::HttpClient)?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            auth_header: Self::auth_header(&config.email, &config.api_token),
            api_token: config.api_token.clone(),
            search_sort: config.search_sort,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the clock used to resolve `last_hours` and `stale_hours`.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Builds the HTTP Basic credentials for API token authentication.
    fn auth_header(email: &str, api_token: &str) -> String {
        let credentials = format!("{email}/token:{api_token}");
        format!("Basic {}", BASE64_STANDARD.encode(credentials))
    }

    /// Returns the API token for sanitization purposes.
    ///
    /// This should ONLY be used for sanitizing error messages, never for logging.
    pub(crate) fn api_token_for_sanitization(&self) -> &str {
        &self.api_token
    }

    /// Validates that a ticket ID is usable in a URL path.
    fn validate_id(id: u64, field_name: &str) -> Result<(), ZendeskError> {
        if id == 0 {
            return Err(ZendeskError::validation(format!(
                "{} must be a positive integer",
                field_name
            )));
        }
        Ok(())
    }

    /// Tests connectivity to Zendesk.
    ///
    /// Lists a single ticket to verify the server is reachable and the
    /// credentials are accepted.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::ConnectionTest` describing the failure.
    pub async fn test_connection(&self) -> Result<(), ZendeskError> {
        tracing::debug!("Testing connection to Zendesk");

        let result = self
            .list_tickets(&TicketListParams::new().with_per_page(1))
            .await;

        match result {
            Ok(_) => {
                tracing::info!("Connection test successful");
                Ok(())
            }
            Err(e) => match e.root() {
                ZendeskError::Authentication => Err(ZendeskError::connection_test(
                    "Authentication failed - verify ZENDESK_EMAIL and ZENDESK_API_TOKEN",
                )),
                ZendeskError::Http(inner) => {
                    let message = ZendeskError::sanitize_message(&inner.to_string(), &self.api_token);
                    Err(ZendeskError::connection_test(format!(
                        "HTTP error: {} - verify ZENDESK_SUBDOMAIN is correct",
                        message
                    )))
                }
                other => Err(ZendeskError::connection_test(other.sanitized_display(&self.api_token))),
            },
        }
    }

    // ========================================================================
    // Ticket listing
    // ========================================================================

    /// Lists tickets, choosing the endpoint from the parameters.
    ///
    /// Without filters this pages through `GET /tickets.json`. With any of
    /// agent, organization, updated_since, last_hours or stale_hours it
    /// queries `GET /search.json` instead and echoes the resolved filters in
    /// `TicketPage::filters`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// // Open tickets assigned to agent 12345 untouched for a day
    /// let params = TicketListParams::new().with_agent("12345").with_stale_hours(24);
    /// let page = client.list_tickets(&params).await?;
    /// ```
    pub async fn list_tickets(&self, params: &TicketListParams) -> Result<TicketPage, ZendeskError> {
        let result = if params.has_filters() {
            self.search_tickets(params).await
        } else {
            self.list_all_tickets(params).await
        };
        result.map_err(|e| e.in_operation("get tickets"))
    }

    async fn list_all_tickets(&self, params: &TicketListParams) -> Result<TicketPage, ZendeskError> {
        let response: TicketListResponse = self.get("/tickets.json", &params.listing_query()).await?;
        Ok(TicketPage::from_listing(params.page_request(), response))
    }

    async fn search_tickets(&self, params: &TicketListParams) -> Result<TicketPage, ZendeskError> {
        let search = params.search_query(self.clock.now());
        tracing::debug!(query = %search.query, "Searching tickets");

        let query = params.search_params(&search.query, self.search_sort);
        let response: SearchResponse = self.get("/search.json", &query).await?;
        Ok(TicketPage::from_search(params.page_request(), response, search.filters))
    }

    // ========================================================================
    // Single tickets
    // ========================================================================

    /// Gets a single ticket.
    ///
    /// # Errors
    ///
    /// Wraps `ZendeskError::NotFound` if the ticket doesn't exist.
    pub async fn get_ticket(&self, id: u64) -> Result<TicketSummary, ZendeskError> {
        self.fetch_ticket(id)
            .await
            .map_err(|e| e.in_operation(format!("get ticket {}", id)))
    }

    async fn fetch_ticket(&self, id: u64) -> Result<TicketSummary, ZendeskError> {
        Self::validate_id(id, "ticket_id")?;
        let path = format!("/tickets/{}.json", id);

        let response: TicketEnvelope<TicketSummary> =
            self.get(&path, &[]).await.map_err(|e| {
                // Convert generic NotFound to one naming the ticket
                if matches!(e, ZendeskError::NotFound { .. }) {
                    ZendeskError::not_found(format!("ticket {}", id))
                } else {
                    e
                }
            })?;

        Ok(response.ticket)
    }

    /// Gets all comments on a ticket, oldest first.
    pub async fn get_ticket_comments(&self, ticket_id: u64) -> Result<Vec<Comment>, ZendeskError> {
        let result = async {
            Self::validate_id(ticket_id, "ticket_id")?;
            let path = format!("/tickets/{}/comments.json", ticket_id);
            let response: CommentListResponse = self.get(&path, &[]).await.map_err(|e| {
                if matches!(e, ZendeskError::NotFound { .. }) {
                    ZendeskError::not_found(format!("ticket {}", ticket_id))
                } else {
                    e
                }
            })?;
            Ok::<_, ZendeskError>(response.comments)
        }
        .await;

        result.map_err(|e| e.in_operation(format!("get comments for ticket {}", ticket_id)))
    }

    /// Adds a comment to a ticket.
    ///
    /// The ticket is loaded first so a missing ticket fails before anything
    /// is written. Public comments are visible to the requester.
    ///
    /// # Returns
    ///
    /// The submitted body, as acknowledgment.
    pub async fn post_comment(
        &self,
        ticket_id: u64,
        body: &str,
        public: bool,
    ) -> Result<String, ZendeskError> {
        let result = async {
            self.fetch_ticket(ticket_id).await?;

            let update = TicketEnvelope {
                ticket: CommentUpdate {
                    comment: NewComment {
                        html_body: body.to_string(),
                        public,
                    },
                },
            };
            self.put(&format!("/tickets/{}.json", ticket_id), &update)
                .await?;

            tracing::info!(ticket_id, public, "Posted comment");
            Ok::<_, ZendeskError>(body.to_string())
        }
        .await;

        result.map_err(|e| e.in_operation(format!("post comment on ticket {}", ticket_id)))
    }

    /// Creates a ticket and returns it as stored by Zendesk.
    ///
    /// The creation response is only used for the new ticket's ID; the
    /// ticket is then fetched so every field reflects server-side defaults
    /// and triggers.
    pub async fn create_ticket(&self, ticket: &NewTicket) -> Result<TicketSummary, ZendeskError> {
        let result = async {
            let response: CreateTicketResponse = self
                .post("/tickets.json", &TicketEnvelope { ticket })
                .await?;

            let id = response.ticket_id().ok_or(ZendeskError::MissingTicketId)?;
            tracing::info!(ticket_id = id, "Created ticket");

            self.fetch_ticket(id).await
        }
        .await;

        result.map_err(|e| e.in_operation("create ticket"))
    }

    /// Applies the set fields of `update` to a ticket and returns the
    /// ticket's fresh state.
    ///
    /// Unset fields are left unchanged. The update response is not read;
    /// the ticket is fetched again after the write.
    pub async fn update_ticket(
        &self,
        id: u64,
        update: &TicketUpdate,
    ) -> Result<TicketSummary, ZendeskError> {
        let result = async {
            self.fetch_ticket(id).await?;

            self.put(&format!("/tickets/{}.json", id), &TicketEnvelope { ticket: update })
                .await?;
            tracing::info!(ticket_id = id, "Updated ticket");

            self.fetch_ticket(id).await
        }
        .await;

        result.map_err(|e| e.in_operation(format!("update ticket {}", id)))
    }

    // ========================================================================
    // Help center
    // ========================================================================

    /// Fetches every help center section with its articles, keyed by
    /// section name.
    ///
    /// Only the first page of sections and of each section's articles is
    /// read. The map is ordered by section name.
    pub async fn get_knowledge_base(&self) -> Result<KnowledgeBase, ZendeskError> {
        let result = async {
            let sections: SectionListResponse =
                self.get("/help_center/sections.json", &[]).await?;

            let mut kb = KnowledgeBase::new();
            for section in sections.sections {
                let path = format!("/help_center/sections/{}/articles.json", section.id);
                let articles: ArticleListResponse = self.get(&path, &[]).await?;

                kb.insert(
                    section.display_name(),
                    KnowledgeBaseSection {
                        id: section.id,
                        description: section.description,
                        articles: articles
                            .articles
                            .into_iter()
                            .map(ArticleSummary::from)
                            .collect(),
                    },
                );
            }

            tracing::debug!(sections = kb.len(), "Fetched knowledge base");
            Ok::<_, ZendeskError>(kb)
        }
        .await;

        result.map_err(|e| e.in_operation("fetch knowledge base"))
    }

    // ========================================================================
    // Private helper methods for HTTP verbs
    // ========================================================================

    /// Makes a GET request and parses the JSON response.
    async fn get<T>(&self, path: &str, query: &[(&'static str, String)]) -> Result<T, ZendeskError>
    where
        T: DeserializeOwned,
    {
        let body = self.execute(Method::GET, path, query, None).await?;
        serde_json::from_str(&body).map_err(ZendeskError::Serialization)
    }

    /// Makes a POST request with a JSON body and parses the JSON response.
    async fn post<T, B>(&self, path: &str, payload: &B) -> Result<T, ZendeskError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_value(payload)?;
        let body = self.execute(Method::POST, path, &[], Some(payload)).await?;
        serde_json::from_str(&body).map_err(ZendeskError::Serialization)
    }

    /// Makes a PUT request with a JSON body. The response body is discarded.
    async fn put<B>(&self, path: &str, payload: &B) -> Result<(), ZendeskError>
    where
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_value(payload)?;
        self.execute(Method::PUT, path, &[], Some(payload)).await?;
        Ok(())
    }

    /// Makes a request to the Zendesk API and returns the raw body.
    ///
    /// Handles authentication headers and maps non-2xx responses to errors.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        payload: Option<serde_json::Value>,
    ) -> Result<String, ZendeskError> {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(
            method = %method,
            path = %path,
            "Making Zendesk API request"
        );

        let mut req = self
            .http
            .request(method, &url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(payload) = payload {
            req = req.json(&payload);
        }

        let response = req.send().await.map_err(ZendeskError::Http)?;
        let status = response.status();

        if !status.is_success() {
            return Err(self.handle_http_error(status, response, path).await);
        }

        let body = response.text().await.map_err(ZendeskError::Http)?;

        tracing::trace!(body = %body, "Zendesk API response");

        Ok(body)
    }

    /// Converts a non-success response into a `ZendeskError`.
    async fn handle_http_error(
        &self,
        status: StatusCode,
        response: reqwest::Response,
        path: &str,
    ) -> ZendeskError {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "No response body".to_string());
        let body = ZendeskError::sanitize_message(&body, &self.api_token);
        let body = truncate_body(body);

        tracing::warn!(status = %status, path = %path, "Zendesk API request failed");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ZendeskError::Authentication,
            StatusCode::NOT_FOUND => ZendeskError::not_found(path),
            _ => ZendeskError::HttpStatus {
                status,
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body,
            },
        }
    }
}

/// Truncates an error body on a character boundary.
fn truncate_body(body: String) -> String {
    if body.len() <= MAX_ERROR_BODY_LEN {
        return body;
    }
    let mut end = MAX_ERROR_BODY_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
