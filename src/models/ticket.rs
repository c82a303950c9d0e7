//! Ticket models for the Zendesk API.
//!
//! `TicketSummary` is both the shape we deserialize vendor ticket records
//! into (unknown vendor fields are ignored) and the normalized projection we
//! hand back to callers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::deserialize_null_default;
use crate::error::ZendeskError;

/// Ticket status as reported by Zendesk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Newly created, not yet touched by an agent.
    New,
    /// Assigned and being worked on.
    Open,
    /// Waiting on the requester.
    Pending,
    /// Waiting on a third party.
    Hold,
    /// Resolved by an agent.
    Solved,
    /// Archived; can no longer be reopened.
    Closed,
    /// Any status this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl TicketStatus {
    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "new",
            TicketStatus::Open => "open",
            TicketStatus::Pending => "pending",
            TicketStatus::Hold => "hold",
            TicketStatus::Solved => "solved",
            TicketStatus::Closed => "closed",
            TicketStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = ZendeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(TicketStatus::New),
            "open" => Ok(TicketStatus::Open),
            "pending" => Ok(TicketStatus::Pending),
            "hold" => Ok(TicketStatus::Hold),
            "solved" => Ok(TicketStatus::Solved),
            "closed" => Ok(TicketStatus::Closed),
            other => Err(ZendeskError::validation(format!(
                "status must be one of new, open, pending, hold, solved, closed; got {:?}",
                other
            ))),
        }
    }
}

/// Ticket priority as reported by Zendesk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    /// Low priority.
    Low,
    /// Normal priority.
    Normal,
    /// High priority.
    High,
    /// Urgent priority.
    Urgent,
    /// Any priority this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl TicketPriority {
    /// Returns the wire name of the priority.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Normal => "normal",
            TicketPriority::High => "high",
            TicketPriority::Urgent => "urgent",
            TicketPriority::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketPriority {
    type Err = ZendeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(TicketPriority::Low),
            "normal" => Ok(TicketPriority::Normal),
            "high" => Ok(TicketPriority::High),
            "urgent" => Ok(TicketPriority::Urgent),
            other => Err(ZendeskError::validation(format!(
                "priority must be one of low, normal, high, urgent; got {:?}",
                other
            ))),
        }
    }
}

/// Normalized projection of a Zendesk ticket.
///
/// Every field except `id` tolerates being absent or null in the vendor
/// record. Timestamps are passed through exactly as Zendesk formats them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSummary {
    /// Unique ticket ID.
    pub id: u64,

    /// Subject line.
    #[serde(default)]
    pub subject: Option<String>,

    /// Current status.
    #[serde(default)]
    pub status: Option<TicketStatus>,

    /// Priority, if set.
    #[serde(default)]
    pub priority: Option<TicketPriority>,

    /// First comment of the ticket.
    #[serde(default)]
    pub description: Option<String>,

    /// Ticket type (problem, incident, question, task).
    #[serde(default, rename = "type")]
    pub ticket_type: Option<String>,

    /// Creation timestamp (ISO-8601).
    #[serde(default)]
    pub created_at: Option<String>,

    /// Last update timestamp (ISO-8601).
    #[serde(default)]
    pub updated_at: Option<String>,

    /// User who requested the ticket.
    #[serde(default)]
    pub requester_id: Option<u64>,

    /// Agent the ticket is assigned to.
    #[serde(default)]
    pub assignee_id: Option<u64>,

    /// Organization of the requester.
    #[serde(default)]
    pub organization_id: Option<u64>,

    /// Tags on the ticket.
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub tags: Vec<String>,
}

/// A custom field value on a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldValue {
    /// Custom field ID.
    pub id: u64,
    /// Field value; shape depends on the field type.
    pub value: serde_json::Value,
}

/// Fields for a new ticket.
///
/// Serialized as the body of `POST /tickets.json`; unset options are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewTicket {
    /// Subject line.
    pub subject: String,

    /// Plain text description, also used as the first comment.
    pub description: String,

    /// Requester user ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_id: Option<u64>,

    /// Assignee user ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,

    /// Priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,

    /// Ticket type (problem, incident, question, task).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<String>,

    /// Tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Custom field values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<CustomFieldValue>>,
}

impl NewTicket {
    /// Creates a ticket draft with the required fields.
    pub fn new(subject: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

/// Changes to apply to an existing ticket.
///
/// `None` means "leave unchanged": unset fields are not serialized, so they
/// never clear a value on the Zendesk side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TicketUpdate {
    /// New subject line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,

    /// New priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,

    /// New ticket type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<String>,

    /// New assignee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,

    /// New requester.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_id: Option<u64>,

    /// Replacement tag list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Custom field values to set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<CustomFieldValue>>,

    /// New due date (ISO-8601), only meaningful for tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
}

impl TicketUpdate {
    /// Returns true if at least one field is set.
    pub fn has_updates(&self) -> bool {
        *self != TicketUpdate::default()
    }
}
