//! Ticket listing parameters and search query construction.
//!
//! `GET /tickets.json` only understands paging and sorting. Any filter
//! (agent, organization, updated_since, last_hours, stale_hours) forces the
//! listing onto `GET /search.json`, whose `query` parameter is a
//! space-separated token string built here.
//!
//! # Example
//!
//! ```ignore
//! let params = TicketListParams::new()
//!     .with_agent("jane@example.com")
//!     .with_stale_hours(24);
//! let query = params.search_query(Utc::now());
//! // type:ticket assignee:"jane@example.com" status<solved updated<2026-02-25T10:00:00Z
//! ```

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::models::{AppliedFilters, PageRequest, TicketStatus};

/// Zendesk's maximum page size.
pub const MAX_PER_PAGE: u32 = 100;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PER_PAGE: u32 = 25;

/// Sort field used when the caller does not ask for one.
pub const DEFAULT_SORT_BY: &str = "created_at";

/// Sort order used when the caller does not ask for one.
pub const DEFAULT_SORT_ORDER: &str = "desc";

/// Parameters for listing tickets.
///
/// Use the builder methods to construct filter criteria. String filters
/// are trimmed; empty strings are treated as not supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketListParams {
    page: u32,
    per_page: u32,
    sort_by: String,
    sort_order: String,
    agent: Option<String>,
    organization: Option<String>,
    updated_since: Option<String>,
    last_hours: Option<u32>,
    stale_hours: Option<u32>,
    include_solved: bool,
}

impl Default for TicketListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            sort_by: DEFAULT_SORT_BY.to_string(),
            sort_order: DEFAULT_SORT_ORDER.to_string(),
            agent: None,
            organization: None,
            updated_since: None,
            last_hours: None,
            stale_hours: None,
            include_solved: false,
        }
    }
}

/// A search query string together with the filters it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Space-joined query tokens.
    pub query: String,
    /// Filter values as resolved at build time.
    pub filters: AppliedFilters,
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Formats an instant the way Zendesk search expects: `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn hours_before(now: DateTime<Utc>, hours: u32) -> String {
    let instant = now
        .checked_sub_signed(Duration::hours(i64::from(hours)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    format_timestamp(instant)
}

impl TicketListParams {
    /// Creates parameters for the first page with default size and sorting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the 1-based page number. Zero is treated as 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets the page size, capped at `MAX_PER_PAGE`. Zero is treated as 1.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    /// Sets the sort field and order. Empty values keep the defaults.
    pub fn with_sort(mut self, sort_by: impl Into<String>, sort_order: impl Into<String>) -> Self {
        if let Some(sort_by) = non_empty(sort_by) {
            self.sort_by = sort_by;
        }
        if let Some(sort_order) = non_empty(sort_order) {
            self.sort_order = sort_order;
        }
        self
    }

    /// Filters by assignee: a numeric user ID, an email, or a name.
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = non_empty(agent);
        self
    }

    /// Filters by organization name (Zendesk matches partially).
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = non_empty(organization);
        self
    }

    /// Only tickets updated after this date or datetime
    /// (`2026-02-26` or `2026-02-26T10:00:00Z`).
    pub fn with_updated_since(mut self, updated_since: impl Into<String>) -> Self {
        self.updated_since = non_empty(updated_since);
        self
    }

    /// Only tickets updated in the last `hours` hours. Overrides
    /// `with_updated_since`.
    pub fn with_last_hours(mut self, hours: u32) -> Self {
        self.last_hours = Some(hours);
        self
    }

    /// Only tickets NOT updated in the last `hours` hours.
    pub fn with_stale_hours(mut self, hours: u32) -> Self {
        self.stale_hours = Some(hours);
        self
    }

    /// Keep solved and closed tickets in a stale search.
    pub fn with_include_solved(mut self, include: bool) -> Self {
        self.include_solved = include;
        self
    }

    /// Returns the 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the capped page size.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Returns the sort field.
    pub fn sort_by(&self) -> &str {
        &self.sort_by
    }

    /// Returns the sort order.
    pub fn sort_order(&self) -> &str {
        &self.sort_order
    }

    /// True when any filter is set, which routes the listing to the search
    /// endpoint. `include_solved` alone is not a filter.
    pub fn has_filters(&self) -> bool {
        self.agent.is_some()
            || self.organization.is_some()
            || self.updated_since.is_some()
            || self.last_hours.is_some()
            || self.stale_hours.is_some()
    }

    /// Pagination values echoed into the resulting page.
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            per_page: self.per_page,
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order.clone(),
        }
    }

    /// Query parameters for `GET /tickets.json`.
    pub fn listing_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
            ("sort_by", self.sort_by.clone()),
            ("sort_order", self.sort_order.clone()),
        ]
    }

    /// Query parameters for `GET /search.json`.
    ///
    /// Some Zendesk accounts answer HTTP 400 when sort parameters are sent
    /// to the search endpoint; pass `include_sort = false` for those.
    pub fn search_params(&self, query: &str, include_sort: bool) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", query.to_string()),
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if include_sort {
            params.push(("sort_by", self.sort_by.clone()));
            params.push(("sort_order", self.sort_order.clone()));
        }
        params
    }

    /// Builds the search query string relative to `now`.
    ///
    /// Tokens, in order:
    /// 1. `type:ticket`
    /// 2. `assignee_id:N` for an all-digit agent, else `assignee:"..."`
    /// 3. `organization:"..."`
    /// 4. `status<solved` for a stale search unless `include_solved`
    /// 5. `updated<T` where T = now - stale_hours
    /// 6. `updated>T` where T = now - last_hours, or `updated_since`
    ///
    /// `last_hours` replaces `updated_since` when both are given. A stale
    /// bound and a recent bound may both be present, giving a window.
    pub fn search_query(&self, now: DateTime<Utc>) -> SearchQuery {
        let mut tokens = vec!["type:ticket".to_string()];

        if let Some(agent) = &self.agent {
            if agent.bytes().all(|b| b.is_ascii_digit()) {
                tokens.push(format!("assignee_id:{}", agent));
            } else {
                tokens.push(format!("assignee:\"{}\"", agent));
            }
        }

        if let Some(organization) = &self.organization {
            tokens.push(format!("organization:\"{}\"", organization));
        }

        let updated_before = self.stale_hours.map(|hours| hours_before(now, hours));
        if self.stale_hours.is_some() && !self.include_solved {
            tokens.push(format!("status<{}", TicketStatus::Solved));
        }

        let updated_since = match self.last_hours {
            Some(hours) => Some(hours_before(now, hours)),
            None => self.updated_since.clone(),
        };

        if let Some(before) = &updated_before {
            tokens.push(format!("updated<{}", before));
        }
        if let Some(since) = &updated_since {
            tokens.push(format!("updated>{}", since));
        }

        SearchQuery {
            query: tokens.join(" "),
            filters: AppliedFilters {
                agent: self.agent.clone(),
                organization: self.organization.clone(),
                updated_since,
                last_hours: self.last_hours,
                stale_hours: self.stale_hours,
                include_solved: self.include_solved,
            },
        }
    }
}
