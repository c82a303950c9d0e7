//! Response envelopes shared across Zendesk API endpoints.
//!
//! Zendesk wraps every payload in a single-key object (`{"ticket": ..}`,
//! `{"tickets": [..]}`) and reports pagination as `next_page` /
//! `previous_page` URLs that are null on the first and last page.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{Article, Comment, Section, TicketSummary};

/// Deserializes `null` as the type's default (e.g. `"tags": null` -> `[]`).
pub(crate) fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Returns true for JSON values that would be considered "set": non-null,
/// non-empty strings, non-zero numbers, `true`, non-empty arrays and objects.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Pagination links as returned by offset-paginated endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    /// URL of the next page, null on the last page.
    #[serde(default)]
    pub next_page: Option<Value>,

    /// URL of the previous page, null on the first page.
    #[serde(default)]
    pub previous_page: Option<Value>,
}

impl PageLinks {
    /// Zendesk reported a next page (any non-null value).
    pub fn has_next(&self) -> bool {
        self.next_page.is_some()
    }

    /// Zendesk reported a usable next page link.
    pub fn next_is_set(&self) -> bool {
        self.next_page.as_ref().is_some_and(is_truthy)
    }

    /// Zendesk reported a usable previous page link.
    pub fn previous_is_set(&self) -> bool {
        self.previous_page.as_ref().is_some_and(is_truthy)
    }
}

/// Response of `GET /tickets.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketListResponse {
    /// Tickets on this page.
    #[serde(default)]
    pub tickets: Vec<TicketSummary>,

    /// Pagination links.
    #[serde(flatten)]
    pub links: PageLinks,
}

/// Response of `GET /search.json`.
///
/// Results are kept as raw JSON because the endpoint mixes result kinds
/// (tickets, users, organizations) in one list.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Raw search results.
    #[serde(default)]
    pub results: Vec<Value>,

    /// Pagination links.
    #[serde(flatten)]
    pub links: PageLinks,
}

/// Envelope for a single ticket (`{"ticket": {...}}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketEnvelope<T> {
    /// The wrapped ticket.
    pub ticket: T,
}

/// Response of `POST /tickets.json`.
///
/// Only the identifiers are read; the full record is re-fetched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTicketResponse {
    /// The created ticket (partial).
    #[serde(default)]
    pub ticket: Option<CreatedTicketRef>,

    /// The audit recorded for the creation.
    #[serde(default)]
    pub audit: Option<AuditRef>,
}

/// Identifier of the created ticket.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedTicketRef {
    /// Ticket ID.
    #[serde(default)]
    pub id: Option<u64>,
}

/// Identifiers carried by a ticket audit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditRef {
    /// Audit ID.
    #[serde(default)]
    pub id: Option<u64>,

    /// Ticket the audit belongs to.
    #[serde(default)]
    pub ticket_id: Option<u64>,
}

impl CreateTicketResponse {
    /// Returns the created ticket's ID, preferring `ticket.id` and falling
    /// back to `audit.ticket_id`.
    pub fn ticket_id(&self) -> Option<u64> {
        self.ticket
            .as_ref()
            .and_then(|t| t.id)
            .or_else(|| self.audit.as_ref().and_then(|a| a.ticket_id))
    }
}

/// Response of `GET /tickets/{id}/comments.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentListResponse {
    /// Comments in chronological order.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Response of `GET /help_center/sections.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionListResponse {
    /// Help center sections.
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Response of `GET /help_center/sections/{id}/articles.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleListResponse {
    /// Articles in the section.
    #[serde(default)]
    pub articles: Vec<Article>,
}
