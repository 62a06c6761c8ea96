//! The GitHub aggregation layer.
//!
//! `client` wraps the REST endpoints, `page` exhausts paginated listings,
//! `fanout` runs one operation across every repository concurrently, `org`
//! composes the three into org-wide operations, and `index` builds the
//! grouped reporting structures.

pub mod client;
pub mod fanout;
pub mod index;
pub mod models;
pub mod org;
pub mod page;
