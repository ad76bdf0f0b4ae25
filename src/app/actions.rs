//! Actions representing side effects to be executed by the runtime.
//!
//! The store, codec and sync controller are pure with respect to the outside
//! world. Whatever they need done to the address bar is returned as an
//! [`Action`] and carried out by the runtime that owns the real location.

use crate::infrastructure::Location;

/// Commands produced by event handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Rewrites the address bar without adding a history entry.
    ///
    /// Emitted at most once per task, only when the URL derived from the
    /// current state differs from what the address bar shows.
    ReplaceUrl {
        /// Fully-qualified URL to show.
        href: String,
    },
}

impl Action {
    /// Carries out the action against `location`.
    pub fn execute(&self, location: &mut dyn Location) {
        match self {
            Self::ReplaceUrl { href } => {
                tracing::debug!(href = %href, "executing ReplaceUrl");
                location.replace(href);
            }
        }
    }
}
