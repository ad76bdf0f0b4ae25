//! Bidirectional mapping between [`FilterState`](crate::domain::FilterState)
//! and the address bar.
//!
//! # Modules
//!
//! - [`query`]: query-string encode/decode with the public parameter vocabulary
//! - [`links`]: shareable URLs and single-facet deep links

pub mod links;
pub mod query;

pub use links::{category_link, facet_link, platform_link, search_link, share_url, subtype_link, Facet};
pub use query::{decode, decode_href, encode};
