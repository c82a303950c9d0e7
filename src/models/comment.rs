//! Comment models for the Zendesk API.

use serde::{Deserialize, Serialize};

/// A comment on a ticket, public or internal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment ID.
    pub id: u64,

    /// User who wrote the comment.
    #[serde(default)]
    pub author_id: Option<u64>,

    /// Plain text body.
    #[serde(default)]
    pub body: Option<String>,

    /// HTML body.
    #[serde(default)]
    pub html_body: Option<String>,

    /// Whether the requester can see the comment.
    #[serde(default)]
    pub public: Option<bool>,

    /// Creation timestamp (ISO-8601).
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A comment to attach to a ticket update.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    /// Rich-text body.
    pub html_body: String,

    /// Whether the requester can see the comment.
    pub public: bool,
}

/// Ticket update carrying only a new comment.
#[derive(Debug, Clone, Serialize)]
pub struct CommentUpdate {
    /// The comment to add.
    pub comment: NewComment,
}
