//! Application layer: the filter store and everything wired around it.
//!
//! # Architecture
//!
//! ```text
//! Store operations ─→ FilterStore ─→ subscribers ─┬─→ persistence (save)
//!                          ↑                      └─→ SyncController (pending)
//!                          │                                 │ end of task
//!        navigation ───────┘ (replace_state)                 ↓
//!                                                   Action::ReplaceUrl ─→ Location
//! ```
//!
//! # Modules
//!
//! - [`store`]: [`FilterStore`] and its [`Subscription`] disposer
//! - [`presets`]: named wholesale state replacements
//! - [`summary`]: human-readable active-filter description
//! - [`sync`]: two-way URL synchronization
//! - [`session`]: lifecycle of store, sync and persistence for one view
//! - [`actions`] / [`handler`]: event → action model for runtimes
//! - [`feed`] / [`ranking`]: applying a state to content lists

pub mod actions;
pub mod feed;
pub mod handler;
pub mod presets;
pub mod ranking;
pub mod session;
pub mod store;
pub mod summary;
pub mod sync;

pub use actions::Action;
pub use feed::FeedView;
pub use handler::{handle_event, Event};
pub use presets::{Preset, UnknownPreset};
pub use session::FeedSession;
pub use store::{FilterStore, Subscription};
pub use summary::{filter_summary, NO_FILTERS};
pub use sync::SyncController;
