//! # zendesk-mcp
//!
//! An MCP (Model Context Protocol) server and client library for Zendesk
//! Support.
//!
//! It exposes Zendesk tickets, ticket comments and the help center knowledge
//! base as MCP tools, and wraps the Zendesk REST API in a small typed client.
//!
//! ## Features
//!
//! - **Listing**: Paged ticket listing, switching to Zendesk search when
//!   filtering by agent, organization or update time
//! - **Write operations**: Create and update tickets, add public or internal comments
//! - **Knowledge base**: Help center sections with their articles
//! - **Security**: API tokens are never logged or exposed in error messages
//!
//! ## Architecture
//!
//! - [`config`] - Configuration loading from environment variables
//! - [`error`] - Error types with a coarse [`ErrorKind`](error::ErrorKind) classification
//! - [`query`] - Listing parameters and search query construction
//! - [`clock`] - Time source for relative filters
//! - [`zendesk_client`] - HTTP client for the Zendesk API
//! - [`models`] - Data models for Zendesk requests and responses
//! - [`server`] - MCP server implementation with tool routing
//! - [`tools`] - Tool input parameter structs
//!
//! ## Configuration
//!
//! Required environment variables:
//!
//! - `ZENDESK_SUBDOMAIN`: Subdomain of your Zendesk account (`acme` for `acme.zendesk.com`)
//! - `ZENDESK_EMAIL`: Email of the agent that owns the API token
//! - `ZENDESK_API_TOKEN`: Zendesk API token
//!
//! Optional:
//! - `ZENDESK_BASE_URL`: Full API base URL, overriding the subdomain
//! - `ZENDESK_SEARCH_SORT`: Set to `false` to omit sort parameters on search
//! - `ZENDESK_TIMEOUT_SECS`: Request timeout in seconds
//! - `RUST_LOG`: Log level (e.g., `zendesk_mcp=debug`)
//!
//! ## Example
//!
//! ```ignore
//! use zendesk_mcp::config::Config;
//! use zendesk_mcp::query::TicketListParams;
//! use zendesk_mcp::zendesk_client::ZendeskClient;
//!
//! async fn example() -> Result<(), zendesk_mcp::error::ZendeskError> {
//!     let config = Config::from_env()?;
//!     let client = ZendeskClient::new(&config)?;
//!
//!     // Tickets nobody touched in two days, still unsolved
//!     let params = TicketListParams::new().with_stale_hours(48).with_per_page(50);
//!
//!     let page = client.list_tickets(&params).await?;
//!     for ticket in page.tickets {
//!         println!("#{}: {:?}", ticket.id, ticket.subject);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod server;
pub mod tools;
pub mod zendesk_client;
