//! Tool input parameter structs for MCP tools.
//!
//! This module defines the input types for each MCP tool, with
//! JSON Schema derivation for MCP tool discovery.
//!
//! # Input Sanitization
//!
//! All input structs implement `sanitize()` which trims whitespace
//! from string fields and turns blank strings into `None`. This should be
//! called before processing input.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use crate::error::ZendeskError;
use crate::models::{CustomFieldValue, NewTicket, TicketPriority, TicketStatus, TicketUpdate};
use crate::query::TicketListParams;

/// Helper function to trim an optional string.
fn trim_option(s: &Option<String>) -> Option<String> {
    s.as_ref().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Trims every tag and drops the blank ones.
fn trim_tags(tags: &Option<Vec<String>>) -> Option<Vec<String>> {
    tags.as_ref().map(|tags| {
        tags.iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    })
}

fn parse_priority(priority: &Option<String>) -> Result<Option<TicketPriority>, ZendeskError> {
    priority.as_deref().map(str::parse).transpose()
}

fn parse_status(status: &Option<String>) -> Result<Option<TicketStatus>, ZendeskError> {
    status.as_deref().map(str::parse).transpose()
}

fn convert_custom_fields(fields: &Option<Vec<CustomFieldInput>>) -> Option<Vec<CustomFieldValue>> {
    fields.as_ref().map(|fields| {
        fields
            .iter()
            .map(|f| CustomFieldValue {
                id: f.id,
                value: f.value.clone(),
            })
            .collect()
    })
}

/// Input parameters for the get_tickets tool.
///
/// All fields are optional. Setting any of agent, organization,
/// updated_since, last_hours or stale_hours switches to Zendesk search.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetTicketsInput {
    /// Page number, starting at 1 (default: 1).
    #[serde(default)]
    pub page: Option<u32>,

    /// Tickets per page (default: 25, max: 100).
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Field to sort by (default: "created_at").
    #[serde(default)]
    pub sort_by: Option<String>,

    /// Sort direction, "asc" or "desc" (default: "desc").
    #[serde(default)]
    pub sort_order: Option<String>,

    /// Assignee filter: a numeric user ID, an email address or a name.
    #[serde(default)]
    pub agent: Option<String>,

    /// Organization name filter.
    #[serde(default)]
    pub organization: Option<String>,

    /// Only tickets updated after this ISO 8601 timestamp.
    #[serde(default)]
    pub updated_since: Option<String>,

    /// Only tickets updated in the last N hours (overrides updated_since).
    #[serde(default)]
    pub last_hours: Option<u32>,

    /// Only tickets NOT updated in the last N hours.
    #[serde(default)]
    pub stale_hours: Option<u32>,

    /// With stale_hours, also return solved and closed tickets (default: false).
    #[serde(default)]
    pub include_solved: Option<bool>,
}

impl GetTicketsInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            page: self.page,
            per_page: self.per_page,
            sort_by: trim_option(&self.sort_by),
            sort_order: trim_option(&self.sort_order),
            agent: trim_option(&self.agent),
            organization: trim_option(&self.organization),
            updated_since: trim_option(&self.updated_since),
            last_hours: self.last_hours,
            stale_hours: self.stale_hours,
            include_solved: self.include_solved,
        }
    }

    /// Builds listing parameters, leaving defaults for unset fields.
    pub fn to_params(&self) -> TicketListParams {
        let mut params = TicketListParams::new();

        if let Some(page) = self.page {
            params = params.with_page(page);
        }
        if let Some(per_page) = self.per_page {
            params = params.with_per_page(per_page);
        }
        // Blank values keep the default sort
        params = params.with_sort(
            self.sort_by.clone().unwrap_or_default(),
            self.sort_order.clone().unwrap_or_default(),
        );
        if let Some(agent) = &self.agent {
            params = params.with_agent(agent.as_str());
        }
        if let Some(organization) = &self.organization {
            params = params.with_organization(organization.as_str());
        }
        if let Some(updated_since) = &self.updated_since {
            params = params.with_updated_since(updated_since.as_str());
        }
        if let Some(hours) = self.last_hours {
            params = params.with_last_hours(hours);
        }
        if let Some(hours) = self.stale_hours {
            params = params.with_stale_hours(hours);
        }
        if let Some(include) = self.include_solved {
            params = params.with_include_solved(include);
        }

        params
    }
}

/// Input parameters for the get_ticket tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTicketInput {
    /// The numeric ID of the ticket to retrieve.
    pub ticket_id: u64,
}

/// Input parameters for the get_ticket_comments tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTicketCommentsInput {
    /// The numeric ID of the ticket whose comments to list.
    pub ticket_id: u64,
}

/// Input parameters for the create_ticket_comment tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateTicketCommentInput {
    /// The numeric ID of the ticket to comment on.
    pub ticket_id: u64,

    /// Comment body (HTML is allowed).
    pub comment: String,

    /// If true, the requester can see the comment. Default: true.
    #[serde(default)]
    pub public: Option<bool>,
}

impl CreateTicketCommentInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            ticket_id: self.ticket_id,
            comment: self.comment.trim().to_string(),
            public: self.public,
        }
    }

    /// Visibility of the comment, public unless stated otherwise.
    pub fn is_public(&self) -> bool {
        self.public.unwrap_or(true)
    }
}

/// A custom field value supplied to create_ticket or update_ticket.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CustomFieldInput {
    /// Custom field ID.
    pub id: u64,

    /// Field value (string, number, boolean or list, depending on the field).
    pub value: serde_json::Value,
}

/// Input parameters for the create_ticket tool.
///
/// Subject and description are required. All other fields are optional.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateTicketInput {
    /// Ticket subject line.
    pub subject: String,

    /// Description of the issue; becomes the first comment.
    pub description: String,

    /// ID of the requesting user (defaults to the authenticated user).
    #[serde(default)]
    pub requester_id: Option<u64>,

    /// ID of the agent to assign.
    #[serde(default)]
    pub assignee_id: Option<u64>,

    /// Priority: 'low', 'normal', 'high' or 'urgent'.
    #[serde(default)]
    pub priority: Option<String>,

    /// Ticket type: 'problem', 'incident', 'question' or 'task'.
    #[serde(default, rename = "type")]
    pub ticket_type: Option<String>,

    /// Tags to set on the ticket.
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// Custom field values.
    #[serde(default)]
    pub custom_fields: Option<Vec<CustomFieldInput>>,
}

impl CreateTicketInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            subject: self.subject.trim().to_string(),
            description: self.description.trim().to_string(),
            requester_id: self.requester_id,
            assignee_id: self.assignee_id,
            priority: trim_option(&self.priority),
            ticket_type: trim_option(&self.ticket_type),
            tags: trim_tags(&self.tags),
            custom_fields: self.custom_fields,
        }
    }

    /// Converts the input into the ticket body sent to Zendesk.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Validation` for an unknown priority.
    pub fn to_new_ticket(&self) -> Result<NewTicket, ZendeskError> {
        Ok(NewTicket {
            subject: self.subject.clone(),
            description: self.description.clone(),
            requester_id: self.requester_id,
            assignee_id: self.assignee_id,
            priority: parse_priority(&self.priority)?,
            ticket_type: self.ticket_type.clone(),
            tags: self.tags.clone(),
            custom_fields: convert_custom_fields(&self.custom_fields),
        })
    }
}

/// Input parameters for the update_ticket tool.
///
/// Ticket ID is required. At least one other field must be provided.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateTicketInput {
    /// The numeric ID of the ticket to update.
    pub ticket_id: u64,

    /// New subject line.
    #[serde(default)]
    pub subject: Option<String>,

    /// New status: 'new', 'open', 'pending', 'hold', 'solved' or 'closed'.
    #[serde(default)]
    pub status: Option<String>,

    /// New priority: 'low', 'normal', 'high' or 'urgent'.
    #[serde(default)]
    pub priority: Option<String>,

    /// New ticket type: 'problem', 'incident', 'question' or 'task'.
    #[serde(default, rename = "type")]
    pub ticket_type: Option<String>,

    /// ID of the agent to reassign to.
    #[serde(default)]
    pub assignee_id: Option<u64>,

    /// ID of the new requester.
    #[serde(default)]
    pub requester_id: Option<u64>,

    /// Replacement tag list.
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// Custom field values to change.
    #[serde(default)]
    pub custom_fields: Option<Vec<CustomFieldInput>>,

    /// Due date for task tickets (ISO 8601).
    #[serde(default)]
    pub due_at: Option<String>,
}

impl UpdateTicketInput {
    /// Returns true if at least one field besides ticket_id is set.
    pub fn has_updates(&self) -> bool {
        self.subject.is_some()
            || self.status.is_some()
            || self.priority.is_some()
            || self.ticket_type.is_some()
            || self.assignee_id.is_some()
            || self.requester_id.is_some()
            || self.tags.is_some()
            || self.custom_fields.is_some()
            || self.due_at.is_some()
    }

    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            ticket_id: self.ticket_id,
            subject: trim_option(&self.subject),
            status: trim_option(&self.status),
            priority: trim_option(&self.priority),
            ticket_type: trim_option(&self.ticket_type),
            assignee_id: self.assignee_id,
            requester_id: self.requester_id,
            tags: trim_tags(&self.tags),
            custom_fields: self.custom_fields,
            due_at: trim_option(&self.due_at),
        }
    }

    /// Converts the input into the update body sent to Zendesk.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Validation` for an unknown status or priority.
    pub fn to_update(&self) -> Result<TicketUpdate, ZendeskError> {
        Ok(TicketUpdate {
            subject: self.subject.clone(),
            status: parse_status(&self.status)?,
            priority: parse_priority(&self.priority)?,
            ticket_type: self.ticket_type.clone(),
            assignee_id: self.assignee_id,
            requester_id: self.requester_id,
            tags: self.tags.clone(),
            custom_fields: convert_custom_fields(&self.custom_fields),
            due_at: self.due_at.clone(),
        })
    }
}
