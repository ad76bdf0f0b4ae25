//! Event handling.
//!
//! Runtimes that do not call the store directly (the CLI, scripted tests)
//! describe what happened as [`Event`]s and feed them through
//! [`handle_event`]:
//!
//! 1. Store operations mutate the session's store; no action is produced
//! 2. [`Event::Navigated`] goes through the sync controller's navigation path
//! 3. [`Event::EndOfTask`] flushes, producing at most one [`Action::ReplaceUrl`]
//!
//! # Example
//!
//! ```rust
//! use feedscope::app::{handle_event, Action, Event, FeedSession};
//! use feedscope::storage::MemoryStorage;
//! use feedscope::Config;
//!
//! let href = "http://localhost/feed";
//! let mut session = FeedSession::start(&Config::default(), Box::new(MemoryStorage::new()), href)?;
//!
//! let (changed, actions) = handle_event(&mut session, &Event::TogglePlatform("VRChat".into()));
//! assert!(changed && actions.is_empty());
//!
//! let (_, actions) = handle_event(&mut session, &Event::EndOfTask { current_href: href.into() });
//! assert_eq!(
//!     actions,
//!     vec![Action::ReplaceUrl { href: "http://localhost/feed?platform=VRChat".into() }]
//! );
//! # Ok::<(), feedscope::FeedscopeError>(())
//! ```

use super::actions::Action;
use super::session::FeedSession;
use crate::domain::{ContentClass, FilterMode, SortBy, SortDirection, TimeRange, ViewMode};

/// Something that happened to the filter-bearing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    AddPlatform(String),
    RemovePlatform(String),
    TogglePlatform(String),
    ClearPlatforms,
    SetPlatformMode(FilterMode),
    AddSubtype(String),
    RemoveSubtype(String),
    ToggleSubtype(String),
    ClearSubtypes,
    SetSubtypeMode(FilterMode),
    AddCategory(String),
    RemoveCategory(String),
    ToggleCategory(String),
    ClearCategories,
    /// Stored verbatim; trimming happens when encoding and matching.
    SetSearchQuery(String),
    SetSortBy(SortBy),
    SetSortDirection(SortDirection),
    SetTimeRange(TimeRange),
    SetViewMode(ViewMode),
    SetPostsPerPage(u32),
    SetContentClass {
        class: ContentClass,
        shown: bool,
    },
    SetHideReadPosts(bool),
    SetOnlyShowSavedPosts(bool),
    ResetFilters,
    ResetSearch,
    /// Applies a preset by name; unknown names are ignored.
    ApplyPreset(String),

    /// The address bar now shows `href` (deep link, back/forward).
    Navigated {
        href: String,
    },

    /// The current synchronous batch of events is over.
    EndOfTask {
        /// What the address bar shows right now.
        current_href: String,
    },
}

/// Processes one event.
///
/// Returns whether the filter state changed (views should re-render) and the
/// actions the runtime must execute.
pub fn handle_event(session: &mut FeedSession, event: &Event) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event = ?event).entered();

    match event {
        Event::Navigated { href } => (session.navigate(href), Vec::new()),
        Event::EndOfTask { current_href } => {
            let actions = session.end_of_task(current_href).into_iter().collect();
            (false, actions)
        }
        operation => {
            let before = session.state().clone();
            apply_operation(session, operation);
            (*session.state() != before, Vec::new())
        }
    }
}

fn apply_operation(session: &mut FeedSession, event: &Event) {
    let store = session.store_mut();
    match event {
        Event::AddPlatform(value) => store.add_platform(value),
        Event::RemovePlatform(value) => store.remove_platform(value),
        Event::TogglePlatform(value) => store.toggle_platform(value),
        Event::ClearPlatforms => store.clear_platforms(),
        Event::SetPlatformMode(mode) => store.set_platform_mode(*mode),
        Event::AddSubtype(value) => store.add_subtype(value),
        Event::RemoveSubtype(value) => store.remove_subtype(value),
        Event::ToggleSubtype(value) => store.toggle_subtype(value),
        Event::ClearSubtypes => store.clear_subtypes(),
        Event::SetSubtypeMode(mode) => store.set_subtype_mode(*mode),
        Event::AddCategory(value) => store.add_category(value),
        Event::RemoveCategory(value) => store.remove_category(value),
        Event::ToggleCategory(value) => store.toggle_category(value),
        Event::ClearCategories => store.clear_categories(),
        Event::SetSearchQuery(query) => store.set_search_query(query),
        Event::SetSortBy(sort_by) => store.set_sort_by(*sort_by),
        Event::SetSortDirection(direction) => store.set_sort_direction(*direction),
        Event::SetTimeRange(range) => store.set_time_range(*range),
        Event::SetViewMode(view) => store.set_view_mode(*view),
        Event::SetPostsPerPage(count) => store.set_posts_per_page(*count),
        Event::SetContentClass { class, shown } => store.set_content_class(*class, *shown),
        Event::SetHideReadPosts(hide) => store.set_hide_read_posts(*hide),
        Event::SetOnlyShowSavedPosts(only_saved) => store.set_only_show_saved_posts(*only_saved),
        Event::ResetFilters => store.reset_filters(),
        Event::ResetSearch => store.reset_search(),
        Event::ApplyPreset(name) => store.apply_preset(name),
        Event::Navigated { .. } | Event::EndOfTask { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::Config;

    const HREF: &str = "http://localhost/feed";

    fn session() -> FeedSession {
        FeedSession::start(&Config::default(), Box::new(MemoryStorage::new()), HREF).unwrap()
    }

    #[test]
    fn test_noop_reports_unchanged() {
        let mut session = session();
        let (changed, _) = handle_event(&mut session, &Event::RemovePlatform("VRChat".into()));
        assert!(!changed);
        let (changed, _) = handle_event(&mut session, &Event::ApplyPreset("nope".into()));
        assert!(!changed);
    }

    #[test]
    fn test_batch_flushes_once() {
        let mut session = session();
        for event in [
            Event::AddCategory("music".into()),
            Event::SetSortBy(SortBy::Popular),
            Event::SetViewMode(ViewMode::List),
        ] {
            let (changed, actions) = handle_event(&mut session, &event);
            assert!(changed);
            assert!(actions.is_empty());
        }

        let end = Event::EndOfTask {
            current_href: HREF.into(),
        };
        let (_, actions) = handle_event(&mut session, &end);
        assert_eq!(actions.len(), 1);
        let (_, actions) = handle_event(&mut session, &end);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_navigation_then_end_of_task_writes_nothing() {
        let mut session = session();
        let href = "http://localhost/feed?platform=Roblox&view=list";
        let (changed, _) = handle_event(&mut session, &Event::Navigated { href: href.into() });
        assert!(changed);

        let (_, actions) = handle_event(
            &mut session,
            &Event::EndOfTask {
                current_href: href.into(),
            },
        );
        assert!(actions.is_empty());
        assert_eq!(session.state().view_mode(), ViewMode::List);
    }
}
