//! Data models for the Zendesk API.
//!
//! This module contains the ticket, comment and help center types, the
//! response envelopes Zendesk wraps them in, and the normalized page record
//! returned by ticket listing.

mod comment;
mod common;
mod help_center;
mod page;
mod ticket;

pub use comment::*;
pub use common::*;
pub use help_center::*;
pub use page::*;
pub use ticket::*;
