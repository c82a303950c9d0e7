//! The normalized page record returned by ticket listing.
//!
//! Both listing paths produce a `TicketPage`, but they derive
//! `previous_page` differently:
//!
//! - search path: `page - 1` whenever `page > 1`
//! - direct listing: `page - 1` only when Zendesk also reported a previous
//!   page link and `page > 1`
//!
//! Existing callers compare against both behaviors, so they must not be
//! unified. The search-path rule is likely a latent defect: it reports a
//! previous page even when Zendesk has none.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{PageLinks, SearchResponse, TicketListResponse, TicketSummary};

/// Filter values actually used for a search-path listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppliedFilters {
    /// Assignee filter (ID, email or name).
    pub agent: Option<String>,
    /// Organization name filter.
    pub organization: Option<String>,
    /// Lower bound on `updated`, after `last_hours` resolution.
    pub updated_since: Option<String>,
    /// Relative lower bound in hours.
    pub last_hours: Option<u32>,
    /// Relative upper bound in hours.
    pub stale_hours: Option<u32>,
    /// Whether solved/closed tickets were kept in a stale search.
    pub include_solved: bool,
}

/// One page of tickets plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketPage {
    /// Tickets on this page, in vendor order.
    pub tickets: Vec<TicketSummary>,
    /// 1-based page number that was requested.
    pub page: u32,
    /// Page size sent to Zendesk (never above 100).
    pub per_page: u32,
    /// Number of tickets on this page.
    pub count: usize,
    /// Sort field that was requested.
    pub sort_by: String,
    /// Sort order that was requested.
    pub sort_order: String,
    /// Resolved filters; present only for search-path listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<AppliedFilters>,
    /// Zendesk reported another page.
    pub has_more: bool,
    /// Number of the next page, if any.
    pub next_page: Option<u32>,
    /// Number of the previous page, if any.
    pub previous_page: Option<u32>,
}

/// Pagination inputs echoed into a `TicketPage`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Capped page size.
    pub per_page: u32,
    /// Sort field.
    pub sort_by: String,
    /// Sort order.
    pub sort_order: String,
}

impl TicketPage {
    /// Builds a page from a `GET /tickets.json` response.
    pub fn from_listing(request: PageRequest, response: TicketListResponse) -> Self {
        let previous_page = if response.links.previous_is_set() && request.page > 1 {
            Some(request.page - 1)
        } else {
            None
        };
        Self::assemble(request, response.tickets, &response.links, previous_page, None)
    }

    /// Builds a page from a `GET /search.json` response.
    ///
    /// Results whose `result_type` is set to anything but `ticket` are
    /// dropped; results without a `result_type` are kept. A ticket result
    /// that cannot be projected (for instance, it has no numeric `id`) is
    /// skipped with a warning.
    pub fn from_search(
        request: PageRequest,
        response: SearchResponse,
        filters: AppliedFilters,
    ) -> Self {
        let tickets = ticket_results(response.results);
        let previous_page = if request.page > 1 {
            Some(request.page - 1)
        } else {
            None
        };
        Self::assemble(
            request,
            tickets,
            &response.links,
            previous_page,
            Some(filters),
        )
    }

    fn assemble(
        request: PageRequest,
        tickets: Vec<TicketSummary>,
        links: &PageLinks,
        previous_page: Option<u32>,
        filters: Option<AppliedFilters>,
    ) -> Self {
        // No next page number past u32::MAX
        let next_page = if links.next_is_set() {
            request.page.checked_add(1)
        } else {
            None
        };

        Self {
            count: tickets.len(),
            tickets,
            page: request.page,
            per_page: request.per_page,
            sort_by: request.sort_by,
            sort_order: request.sort_order,
            filters,
            has_more: links.has_next(),
            next_page,
            previous_page,
        }
    }
}

/// Keeps ticket results (or untyped results) and projects them.
fn ticket_results(results: Vec<Value>) -> Vec<TicketSummary> {
    results
        .into_iter()
        .filter(|item| match item.get("result_type") {
            None | Some(Value::Null) => true,
            Some(kind) => kind.as_str() == Some("ticket"),
        })
        .filter_map(|item| {
            let id = item.get("id").cloned();
            match serde_json::from_value(item) {
                Ok(ticket) => Some(ticket),
                Err(e) => {
                    tracing::warn!(error = %e, id = ?id, "Skipping malformed search result");
                    None
                }
            }
        })
        .collect()
}
