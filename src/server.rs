//! MCP server implementation for Zendesk.
//!
//! This module defines the `ZendeskServer` struct that implements the MCP
//! `ServerHandler` trait, exposing Zendesk ticket and help center
//! operations as tools. Every tool answers with pretty-printed JSON.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use serde::Serialize;
use serde_json::json;

use crate::error::ZendeskError;
use crate::tools::{
    CreateTicketCommentInput, CreateTicketInput, GetTicketCommentsInput, GetTicketInput,
    GetTicketsInput, UpdateTicketInput,
};
use crate::zendesk_client::ZendeskClient;

/// The Zendesk MCP server.
///
/// This server exposes Zendesk operations as MCP tools.
#[derive(Clone)]
pub struct ZendeskServer {
    /// Zendesk client for API operations.
    client: ZendeskClient,
    /// Tool router for MCP tool dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ZendeskServer {
    /// Creates a new server instance around a configured client.
    pub fn new(client: ZendeskClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// A simple ping tool to verify the server is running.
    ///
    /// Returns "pong" on success.
    #[tool(description = "Test connectivity to the Zendesk MCP server. Returns 'pong' if the server is running correctly.")]
    fn ping(&self) -> String {
        tracing::debug!("ping tool called");
        "pong".to_string()
    }

    /// List tickets, optionally filtered.
    ///
    /// Filters route the call through Zendesk search; without them the plain
    /// ticket listing is paged.
    #[tool(description = "List Zendesk tickets with pagination. Optional filters: agent (ID, email or name), organization, updated_since, last_hours, stale_hours (tickets NOT updated recently; excludes solved/closed unless include_solved is true). Returns tickets plus page, has_more, next_page and previous_page.")]
    async fn get_tickets(
        &self,
        Parameters(input): Parameters<GetTicketsInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(?input, "get_tickets tool called");

        let page = self
            .client
            .list_tickets(&input.to_params())
            .await
            .map_err(|e| self.tool_error(&e, "get_tickets"))?;

        format_json(&page)
    }

    /// Get a single ticket by ID.
    #[tool(description = "Get a Zendesk ticket by its ID, including subject, description, status, priority, type, tags, requester and assignee.")]
    async fn get_ticket(
        &self,
        Parameters(input): Parameters<GetTicketInput>,
    ) -> Result<String, String> {
        tracing::debug!(ticket_id = input.ticket_id, "get_ticket tool called");

        let ticket = self
            .client
            .get_ticket(input.ticket_id)
            .await
            .map_err(|e| self.tool_error(&e, "get_ticket"))?;

        format_json(&ticket)
    }

    /// List the comments on a ticket.
    #[tool(description = "Get all comments on a Zendesk ticket, oldest first. Each comment has author_id, body, html_body, public and created_at.")]
    async fn get_ticket_comments(
        &self,
        Parameters(input): Parameters<GetTicketCommentsInput>,
    ) -> Result<String, String> {
        tracing::debug!(ticket_id = input.ticket_id, "get_ticket_comments tool called");

        let comments = self
            .client
            .get_ticket_comments(input.ticket_id)
            .await
            .map_err(|e| self.tool_error(&e, "get_ticket_comments"))?;

        format_json(&comments)
    }

    /// Add a comment to a ticket.
    #[tool(description = "Add a comment to a Zendesk ticket. The comment may contain HTML. Comments are public unless public is false (internal note).")]
    async fn create_ticket_comment(
        &self,
        Parameters(input): Parameters<CreateTicketCommentInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(ticket_id = input.ticket_id, "create_ticket_comment tool called");

        if input.comment.is_empty() {
            return Err("Comment body is required and cannot be empty.".to_string());
        }

        let body = self
            .client
            .post_comment(input.ticket_id, &input.comment, input.is_public())
            .await
            .map_err(|e| self.tool_error(&e, "create_ticket_comment"))?;

        format_json(&json!({
            "ticket_id": input.ticket_id,
            "public": input.is_public(),
            "comment": body,
        }))
    }

    /// Create a new ticket.
    ///
    /// Returns the ticket as Zendesk stored it.
    #[tool(description = "Create a new Zendesk ticket. Subject and description are required. Optional: requester_id, assignee_id, priority, type, tags, custom_fields. Returns the created ticket.")]
    async fn create_ticket(
        &self,
        Parameters(input): Parameters<CreateTicketInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(subject = %input.subject, "create_ticket tool called");

        if input.subject.is_empty() {
            return Err("Subject is required and cannot be empty.".to_string());
        }
        if input.description.is_empty() {
            return Err("Description is required and cannot be empty.".to_string());
        }

        let new_ticket = input.to_new_ticket().map_err(|e| e.to_string())?;
        let ticket = self
            .client
            .create_ticket(&new_ticket)
            .await
            .map_err(|e| self.tool_error(&e, "create_ticket"))?;

        format_json(&ticket)
    }

    /// Update fields of an existing ticket.
    #[tool(description = "Update a Zendesk ticket's subject, status, priority, type, assignee_id, requester_id, tags, custom_fields or due_at. Ticket ID and at least one field are required. Returns the updated ticket.")]
    async fn update_ticket(
        &self,
        Parameters(input): Parameters<UpdateTicketInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(ticket_id = input.ticket_id, "update_ticket tool called");

        if !input.has_updates() {
            return Err(
                "At least one field must be provided for update (subject, status, priority, type, assignee_id, requester_id, tags, custom_fields, or due_at).".to_string()
            );
        }

        let update = input.to_update().map_err(|e| e.to_string())?;
        let ticket = self
            .client
            .update_ticket(input.ticket_id, &update)
            .await
            .map_err(|e| self.tool_error(&e, "update_ticket"))?;

        format_json(&ticket)
    }

    /// Fetch the help center knowledge base.
    #[tool(description = "Get the Zendesk help center knowledge base: every section keyed by name, with its description and articles (title, body, updated_at, url).")]
    async fn get_knowledge_base(&self) -> Result<String, String> {
        tracing::debug!("get_knowledge_base tool called");

        let kb = self
            .client
            .get_knowledge_base()
            .await
            .map_err(|e| self.tool_error(&e, "get_knowledge_base"))?;

        format_json(&kb)
    }

    /// Sanitizes and logs a failed tool call, returning the message for the caller.
    fn tool_error(&self, error: &ZendeskError, tool: &str) -> String {
        let sanitized = error.sanitized_display(self.client.api_token_for_sanitization());
        tracing::error!(error = %sanitized, kind = ?error.kind(), tool, "Tool call failed");
        sanitized
    }
}

#[tool_handler]
impl ServerHandler for ZendeskServer {
    /// Returns server information for the MCP initialize handshake.
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "This server provides access to Zendesk Support tickets and the help center. \
                 Use get_tickets to list or filter tickets, get_ticket and get_ticket_comments \
                 for details, create_ticket and update_ticket to change tickets, \
                 create_ticket_comment to reply, and get_knowledge_base for help center \
                 articles. Start with 'ping' to verify connectivity."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Serializes a tool result as pretty-printed JSON.
fn format_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize tool result");
        format!("Failed to serialize response: {}", e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{TicketStatus, TicketSummary};

    fn test_client() -> ZendeskClient {
        let config = Config::new("acme", "agent@acme.com", "test_token_12345");
        ZendeskClient::new(&config).expect("Failed to create test client")
    }

    #[test]
    fn test_server_creation() {
        let server = ZendeskServer::new(test_client());
        let info = server.get_info();
        assert!(info.instructions.is_some());
    }

    #[test]
    fn test_server_info_has_tools_capability() {
        let server = ZendeskServer::new(test_client());
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_ping_tool_returns_pong() {
        let server = ZendeskServer::new(test_client());
        assert_eq!(server.ping(), "pong");
    }

    #[test]
    fn test_format_json_is_pretty() {
        let ticket: TicketSummary = serde_json::from_value(json!({
            "id": 42,
            "subject": "VPN down",
            "status": "open",
            "type": "incident",
            "tags": ["network"]
        }))
        .unwrap();
        let output = format_json(&ticket).unwrap();
        assert!(output.contains("\n  \"id\": 42"));
        let parsed: TicketSummary = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.status, Some(TicketStatus::Open));
        assert_eq!(parsed.ticket_type.as_deref(), Some("incident"));
    }

    #[test]
    fn test_tool_error_strips_token() {
        let server = ZendeskServer::new(test_client());
        let error = ZendeskError::validation("bad token test_token_12345");
        let message = server.tool_error(&error, "get_ticket");
        assert!(!message.contains("test_token_12345"));
    }

    #[tokio::test]
    async fn test_create_ticket_rejects_blank_description() {
        let server = ZendeskServer::new(test_client());
        let input: CreateTicketInput =
            serde_json::from_value(json!({"subject": "Help", "description": "   "})).unwrap();
        let err = server.create_ticket(Parameters(input)).await.unwrap_err();
        assert!(err.contains("Description is required"));
    }

    #[tokio::test]
    async fn test_update_ticket_requires_a_field() {
        let server = ZendeskServer::new(test_client());
        let input: UpdateTicketInput = serde_json::from_value(json!({"ticket_id": 5})).unwrap();
        let err = server.update_ticket(Parameters(input)).await.unwrap_err();
        assert!(err.starts_with("At least one field"));
    }

    #[tokio::test]
    async fn test_create_comment_requires_body() {
        let server = ZendeskServer::new(test_client());
        let input: CreateTicketCommentInput =
            serde_json::from_value(json!({"ticket_id": 5, "comment": "  "})).unwrap();
        let err = server.create_ticket_comment(Parameters(input)).await.unwrap_err();
        assert!(err.contains("Comment body is required"));
    }
}
