//! Help center (knowledge base) models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A help center section as returned by Zendesk.
#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    /// Unique section ID.
    pub id: u64,

    /// Section name.
    #[serde(default)]
    pub name: Option<String>,

    /// Section description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Section {
    /// Returns the section name, or a placeholder built from the ID.
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Section {}", self.id),
        }
    }
}

/// A help center article as returned by Zendesk.
#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    /// Unique article ID.
    pub id: u64,

    /// Article title.
    #[serde(default)]
    pub title: Option<String>,

    /// Article body (HTML).
    #[serde(default)]
    pub body: Option<String>,

    /// Last update timestamp (ISO-8601).
    #[serde(default)]
    pub updated_at: Option<String>,

    /// Public URL of the article.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Projection of an article in the knowledge base listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleSummary {
    /// Article ID.
    pub id: u64,
    /// Article title.
    pub title: Option<String>,
    /// Article body (HTML).
    pub body: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
    /// Public URL of the article.
    pub url: Option<String>,
}

impl From<Article> for ArticleSummary {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            body: article.body,
            updated_at: article.updated_at,
            url: article.html_url,
        }
    }
}

/// One section of the knowledge base with its articles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeBaseSection {
    /// Section ID.
    pub id: u64,
    /// Section description.
    pub description: Option<String>,
    /// Articles in the section.
    pub articles: Vec<ArticleSummary>,
}

/// The whole knowledge base, keyed by section name.
///
/// Sections are ordered by name, not in the order Zendesk lists them.
pub type KnowledgeBase = BTreeMap<String, KnowledgeBaseSection>;
