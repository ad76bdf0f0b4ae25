//! Filter state store.
//!
//! [`FilterStore`] owns one [`FilterState`] and exposes it only through named
//! operations. Each operation either applies or is a no-op. Subscribers are
//! notified synchronously after every operation that actually changed the
//! state, and never after a no-op.
//!
//! The store performs no validation: any identifier is accepted as a platform,
//! subtype or category, and no operation fails.
//!
//! # Example
//!
//! ```
//! use feedscope::app::FilterStore;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let mut store = FilterStore::new();
//! let changes = Rc::new(Cell::new(0));
//! let seen = Rc::clone(&changes);
//! let subscription = store.subscribe(move |_state| seen.set(seen.get() + 1));
//!
//! store.toggle_platform("VRChat");
//! store.toggle_platform("VRChat");
//! assert_eq!(changes.get(), 2);
//! assert!(store.state().selected_platforms().is_empty());
//!
//! subscription.unsubscribe();
//! store.add_platform("Roblox");
//! assert_eq!(changes.get(), 2);
//! ```

use super::presets::Preset;
use super::summary::filter_summary;
use crate::domain::{ContentClass, FilterMode, FilterState, SortBy, SortDirection, TimeRange, ViewMode};
use indexmap::IndexSet;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener = Rc<RefCell<dyn FnMut(&FilterState)>>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Disposer returned by [`FilterStore::subscribe`].
///
/// Dropping it (or calling [`Subscription::unsubscribe`]) removes the callback.
/// A subscription outliving its store is inert.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<RefCell<Listeners>>,
}

impl Subscription {
    /// Removes the callback from the store.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().entries.retain(|(id, _)| *id != self.id);
            tracing::trace!(subscription = self.id, "subscriber removed");
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Holder of the canonical filter state.
///
/// Constructed explicitly and passed to whoever needs it; independent stores
/// share nothing.
pub struct FilterStore {
    state: FilterState,
    listeners: Rc<RefCell<Listeners>>,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FilterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterStore")
            .field("state", &self.state)
            .field("subscribers", &self.listeners.borrow().entries.len())
            .finish()
    }
}

impl FilterStore {
    /// Creates a store holding the default state.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(FilterState::default())
    }

    /// Creates a store holding `state`, e.g. one rehydrated from storage.
    #[must_use]
    pub fn with_state(state: FilterState) -> Self {
        Self {
            state,
            listeners: Rc::new(RefCell::new(Listeners::default())),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &FilterState {
        &self.state
    }

    /// Registers `callback` to run after every change.
    pub fn subscribe(&self, callback: impl FnMut(&FilterState) + 'static) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        listeners.next_id += 1;
        let id = listeners.next_id;
        let listener: Listener = Rc::new(RefCell::new(callback));
        listeners.entries.push((id, listener));
        tracing::trace!(subscription = id, "subscriber added");

        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    fn notify(&self) {
        // Snapshot so callbacks may drop subscriptions while being notified.
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            (&mut *listener.borrow_mut())(&self.state);
        }
    }

    /// Runs `mutate` and notifies subscribers if it reported a change.
    fn update(&mut self, operation: &'static str, mutate: impl FnOnce(&mut FilterState) -> bool) {
        let _span = tracing::debug_span!("store_update", operation).entered();
        if mutate(&mut self.state) {
            tracing::debug!("filter state changed");
            self.notify();
        } else {
            tracing::trace!("no-op");
        }
    }

    /// Replaces the whole state in one step, with a single notification.
    pub fn replace_state(&mut self, state: FilterState) {
        self.update("replace_state", |current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
    }

    pub fn add_platform(&mut self, platform: &str) {
        self.update("add_platform", |s| insert(&mut s.selected_platforms, platform));
    }

    pub fn remove_platform(&mut self, platform: &str) {
        self.update("remove_platform", |s| s.selected_platforms.shift_remove(platform));
    }

    /// Removes `platform` if selected, otherwise adds it. Each call flips.
    pub fn toggle_platform(&mut self, platform: &str) {
        self.update("toggle_platform", |s| toggle(&mut s.selected_platforms, platform));
    }

    pub fn clear_platforms(&mut self) {
        self.update("clear_platforms", |s| clear(&mut s.selected_platforms));
    }

    pub fn set_platform_mode(&mut self, mode: FilterMode) {
        self.update("set_platform_mode", |s| replace(&mut s.platform_filter_mode, mode));
    }

    pub fn add_subtype(&mut self, subtype: &str) {
        self.update("add_subtype", |s| insert(&mut s.selected_subtypes, subtype));
    }

    pub fn remove_subtype(&mut self, subtype: &str) {
        self.update("remove_subtype", |s| s.selected_subtypes.shift_remove(subtype));
    }

    pub fn toggle_subtype(&mut self, subtype: &str) {
        self.update("toggle_subtype", |s| toggle(&mut s.selected_subtypes, subtype));
    }

    pub fn clear_subtypes(&mut self) {
        self.update("clear_subtypes", |s| clear(&mut s.selected_subtypes));
    }

    pub fn set_subtype_mode(&mut self, mode: FilterMode) {
        self.update("set_subtype_mode", |s| replace(&mut s.subtype_filter_mode, mode));
    }

    pub fn add_category(&mut self, category: &str) {
        self.update("add_category", |s| insert(&mut s.selected_categories, category));
    }

    pub fn remove_category(&mut self, category: &str) {
        self.update("remove_category", |s| s.selected_categories.shift_remove(category));
    }

    pub fn toggle_category(&mut self, category: &str) {
        self.update("toggle_category", |s| toggle(&mut s.selected_categories, category));
    }

    pub fn clear_categories(&mut self) {
        self.update("clear_categories", |s| clear(&mut s.selected_categories));
    }

    /// Stores the query verbatim. Trimming happens when it is consumed.
    pub fn set_search_query(&mut self, query: &str) {
        self.update("set_search_query", |s| {
            if s.search_query == query {
                return false;
            }
            query.clone_into(&mut s.search_query);
            true
        });
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.update("set_sort_by", |s| replace(&mut s.sort_by, sort_by));
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.update("set_sort_direction", |s| replace(&mut s.sort_direction, direction));
    }

    pub fn set_time_range(&mut self, range: TimeRange) {
        self.update("set_time_range", |s| replace(&mut s.time_range, range));
    }

    pub fn set_view_mode(&mut self, view: ViewMode) {
        self.update("set_view_mode", |s| replace(&mut s.view_mode, view));
    }

    /// Sets the page size; zero is clamped to one.
    pub fn set_posts_per_page(&mut self, posts_per_page: u32) {
        self.update("set_posts_per_page", |s| replace(&mut s.posts_per_page, posts_per_page.max(1)));
    }

    pub fn set_content_class(&mut self, class: ContentClass, shown: bool) {
        self.update("set_content_class", |s| {
            let slot = match class {
                ContentClass::PulsePolls => &mut s.show_pulse_polls,
                ContentClass::Spotlights => &mut s.show_spotlights,
                ContentClass::Events => &mut s.show_events,
            };
            replace(slot, shown)
        });
    }

    pub fn set_show_pulse_polls(&mut self, shown: bool) {
        self.set_content_class(ContentClass::PulsePolls, shown);
    }

    pub fn set_show_spotlights(&mut self, shown: bool) {
        self.set_content_class(ContentClass::Spotlights, shown);
    }

    pub fn set_show_events(&mut self, shown: bool) {
        self.set_content_class(ContentClass::Events, shown);
    }

    pub fn set_hide_read_posts(&mut self, hide: bool) {
        self.update("set_hide_read_posts", |s| replace(&mut s.hide_read_posts, hide));
    }

    pub fn set_only_show_saved_posts(&mut self, only_saved: bool) {
        self.update("set_only_show_saved_posts", |s| replace(&mut s.only_show_saved_posts, only_saved));
    }

    /// Restores every filter field to its default.
    ///
    /// Search query, sort order, view mode and page size are search/display
    /// state and are left alone, so clearing filters keeps an active search.
    pub fn reset_filters(&mut self) {
        self.update("reset_filters", |s| {
            let before = s.clone();
            let defaults = FilterState::default();
            s.selected_platforms = defaults.selected_platforms;
            s.platform_filter_mode = defaults.platform_filter_mode;
            s.selected_subtypes = defaults.selected_subtypes;
            s.subtype_filter_mode = defaults.subtype_filter_mode;
            s.selected_categories = defaults.selected_categories;
            s.time_range = defaults.time_range;
            s.show_pulse_polls = defaults.show_pulse_polls;
            s.show_spotlights = defaults.show_spotlights;
            s.show_events = defaults.show_events;
            s.only_show_saved_posts = defaults.only_show_saved_posts;
            s.hide_read_posts = defaults.hide_read_posts;
            *s != before
        });
    }

    /// Clears the search query and restores the default sort. Facets are kept.
    pub fn reset_search(&mut self) {
        self.update("reset_search", |s| {
            let defaults = FilterState::default();
            let changed = !s.search_query.is_empty()
                || s.sort_by != defaults.sort_by
                || s.sort_direction != defaults.sort_direction;
            s.search_query.clear();
            s.sort_by = defaults.sort_by;
            s.sort_direction = defaults.sort_direction;
            changed
        });
    }

    /// Applies a preset by name. Unknown names are ignored.
    pub fn apply_preset(&mut self, name: &str) {
        match name.parse::<Preset>() {
            Ok(preset) => self.apply(preset),
            Err(err) => tracing::debug!(error = %err, "ignoring preset"),
        }
    }

    /// Applies `preset`.
    ///
    /// Every preset except [`Preset::All`] replaces the entire state; manual
    /// filtering made before is discarded, not merged.
    pub fn apply(&mut self, preset: Preset) {
        let _span = tracing::debug_span!("apply_preset", preset = %preset).entered();
        match preset.state() {
            Some(state) => self.replace_state(state),
            None => self.reset_filters(),
        }
    }

    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.state.has_active_filters()
    }

    /// Comma-joined description of the active filters, or `"No filters active"`.
    #[must_use]
    pub fn filter_summary(&self) -> String {
        filter_summary(&self.state)
    }
}

fn insert(set: &mut IndexSet<String>, value: &str) -> bool {
    if set.contains(value) {
        return false;
    }
    set.insert(value.to_string())
}

fn toggle(set: &mut IndexSet<String>, value: &str) -> bool {
    if !set.shift_remove(value) {
        set.insert(value.to_string());
    }
    true
}

fn clear(set: &mut IndexSet<String>) -> bool {
    let changed = !set.is_empty();
    set.clear();
    changed
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
