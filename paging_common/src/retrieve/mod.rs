//! # Data Retrieval Module
//!
//! HTTP clients used by the display and the server.
//!
//! ## Contained Modules:
//!
//! - **`paging_client`**: typed client for the paging server's own API, used by
//!   the belt display to poll and by tests to drive the server.
//! - **`arrivals_feed`**: the third-party arrivals service behind the
//!   flight-number lookup, with retry middleware and exponential backoff.

#![forbid(unsafe_code)]

/// Client for `/api/paging` and friends.
pub mod paging_client;
/// Upstream flight information lookup.
pub mod arrivals_feed;

pub use arrivals_feed::{extract_flight_numbers, ArrivalsFeed, ArrivalsQuery, FeedError};
pub use paging_client::{ClientError, PagingClient, API_KEY_HEADER};
