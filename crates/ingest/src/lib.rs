//! Feed retrieval and normalization.
//!
//! A [`FeedSource`] produces the current entries of one feed as
//! [`Item`](feedhook_core::Item)s. [`HttpFeedSource`] fetches over HTTP and
//! parses RSS 0.9x/1.0/2.0, Atom and JSON Feed with `feed-rs`.

pub mod error;
pub mod http;
pub mod parse;
pub mod traits;

pub use error::IngestError;
pub use http::HttpFeedSource;
pub use parse::parse_feed;
pub use traits::FeedSource;
