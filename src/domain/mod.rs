//! Domain layer for feedscope.
//!
//! Core types independent of any navigation, storage or rendering concern.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`filter`]: Filter state aggregate, sparse patches and the enums they use
//! - [`content`]: Content items the filters are applied to

pub mod content;
pub mod error;
pub mod filter;

pub use content::{ContentItem, ContentKind};
pub use error::{FeedscopeError, Result};
pub use filter::{
    ContentClass, FilterMode, FilterPatch, FilterState, SortBy, SortDirection, TimeRange,
    UnknownToken, ViewMode, DEFAULT_POSTS_PER_PAGE,
};
