//! Persistent preference records.
//!
//! A [`PersistedFilters`] is the subset of [`FilterState`] that survives a
//! restart. The search query and the saved-only flag are deliberately absent:
//! a fresh session always starts without them.

use crate::domain::{FilterMode, FilterState, SortBy, SortDirection, TimeRange, ViewMode};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Stored preferences for one namespace.
///
/// Every field is optional on disk. Records written by older versions, or
/// hand-edited ones missing fields, fall back to the defaults field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedFilters {
    pub selected_platforms: IndexSet<String>,
    pub platform_filter_mode: FilterMode,
    pub selected_subtypes: IndexSet<String>,
    pub subtype_filter_mode: FilterMode,
    pub selected_categories: IndexSet<String>,
    pub sort_by: SortBy,
    pub sort_direction: SortDirection,
    pub show_pulse_polls: bool,
    pub show_spotlights: bool,
    pub show_events: bool,
    pub hide_read_posts: bool,
    pub time_range: TimeRange,
    pub view_mode: ViewMode,
    pub posts_per_page: u32,
}

impl Default for PersistedFilters {
    fn default() -> Self {
        Self::from(&FilterState::default())
    }
}

impl From<&FilterState> for PersistedFilters {
    fn from(state: &FilterState) -> Self {
        // Destructured without `..` so a new state field has to be classified here.
        let FilterState {
            selected_platforms,
            platform_filter_mode,
            selected_subtypes,
            subtype_filter_mode,
            selected_categories,
            search_query: _,
            sort_by,
            sort_direction,
            show_pulse_polls,
            show_spotlights,
            show_events,
            hide_read_posts,
            only_show_saved_posts: _,
            time_range,
            view_mode,
            posts_per_page,
        } = state;

        Self {
            selected_platforms: selected_platforms.clone(),
            platform_filter_mode: *platform_filter_mode,
            selected_subtypes: selected_subtypes.clone(),
            subtype_filter_mode: *subtype_filter_mode,
            selected_categories: selected_categories.clone(),
            sort_by: *sort_by,
            sort_direction: *sort_direction,
            show_pulse_polls: *show_pulse_polls,
            show_spotlights: *show_spotlights,
            show_events: *show_events,
            hide_read_posts: *hide_read_posts,
            time_range: *time_range,
            view_mode: *view_mode,
            posts_per_page: *posts_per_page,
        }
    }
}

impl From<PersistedFilters> for FilterState {
    fn from(record: PersistedFilters) -> Self {
        Self {
            selected_platforms: record.selected_platforms,
            platform_filter_mode: record.platform_filter_mode,
            selected_subtypes: record.selected_subtypes,
            subtype_filter_mode: record.subtype_filter_mode,
            selected_categories: record.selected_categories,
            sort_by: record.sort_by,
            sort_direction: record.sort_direction,
            show_pulse_polls: record.show_pulse_polls,
            show_spotlights: record.show_spotlights,
            show_events: record.show_events,
            hide_read_posts: record.hide_read_posts,
            time_range: record.time_range,
            view_mode: record.view_mode,
            posts_per_page: record.posts_per_page.max(1),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_and_saved_only_not_persisted() {
        let mut state = FilterState::default();
        state.search_query = "dragons".into();
        state.only_show_saved_posts = true;
        state.selected_platforms.insert("VRChat".into());
        state.view_mode = ViewMode::List;

        let restored = FilterState::from(PersistedFilters::from(&state));
        assert_eq!(restored.search_query(), "");
        assert!(!restored.only_show_saved_posts());
        assert!(restored.selected_platforms().contains("VRChat"));
        assert_eq!(restored.view_mode(), ViewMode::List);
    }

    #[test]
    fn test_partial_record_uses_defaults() {
        let record: PersistedFilters =
            serde_json::from_str(r#"{"sortBy":"popular","postsPerPage":0}"#).unwrap();
        let state = FilterState::from(record);
        assert_eq!(state.sort_by(), SortBy::Popular);
        assert_eq!(state.posts_per_page(), 1);
        assert!(state.shows(crate::domain::ContentClass::Events));
    }
}
