//! Named presets.
//!
//! A preset is a wholesale replacement of the filter, sort and view state.
//! Applying one after manual filtering discards the manual filtering.
//!
//! | Name        | Resulting state                                         |
//! |-------------|---------------------------------------------------------|
//! | `all`       | same as `reset_filters` (search and display state kept) |
//! | `trending`  | defaults with trending sort over the last 7 days        |
//! | `following` | defaults                                                |
//! | `saved`     | defaults with saved-only enabled                        |
//!
//! `following` does not filter by followed creators yet; the followed set is
//! not available to the filter layer.

use crate::domain::{FilterState, SortBy, TimeRange};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Built-in presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    All,
    Trending,
    Following,
    Saved,
}

/// Returned when parsing a preset name that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown preset: {0}")]
pub struct UnknownPreset(pub String);

impl Preset {
    /// Every preset, in menu order.
    pub const PRESETS: [Self; 4] = [Self::All, Self::Trending, Self::Following, Self::Saved];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Trending => "trending",
            Self::Following => "following",
            Self::Saved => "saved",
        }
    }

    /// Full replacement state for this preset.
    ///
    /// Returns `None` for [`Preset::All`], which resets filters in place
    /// instead of replacing the whole state.
    #[must_use]
    pub fn state(self) -> Option<FilterState> {
        match self {
            Self::All => None,
            Self::Trending => Some(FilterState {
                sort_by: SortBy::Trending,
                time_range: TimeRange::Last7d,
                ..FilterState::default()
            }),
            // TODO: narrow to followed creators once the content source exposes them.
            Self::Following => Some(FilterState::default()),
            Self::Saved => Some(FilterState {
                only_show_saved_posts: true,
                ..FilterState::default()
            }),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::PRESETS
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FilterStore;
    use crate::domain::{SortDirection, ViewMode};

    #[test]
    fn test_trending_replaces_not_merges() {
        let mut store = FilterStore::new();
        store.add_platform("VRChat");
        store.set_sort_by(SortBy::Alphabetical);

        store.apply_preset("trending");

        assert!(store.state().selected_platforms().is_empty());
        assert_eq!(store.state().sort_by(), SortBy::Trending);
        assert_eq!(store.state().time_range(), TimeRange::Last7d);
    }

    #[test]
    fn test_presets_discard_search_and_display_state() {
        let mut store = FilterStore::new();
        store.set_search_query("dragons");
        store.set_view_mode(ViewMode::Compact);
        store.set_sort_direction(SortDirection::Asc);
        store.set_posts_per_page(5);

        store.apply_preset("saved");

        let mut expected = FilterState::default();
        expected.only_show_saved_posts = true;
        assert_eq!(store.state(), &expected);
    }

    #[test]
    fn test_following_is_plain_defaults() {
        let mut store = FilterStore::new();
        store.add_category("music");
        store.set_hide_read_posts(true);
        store.apply(Preset::Following);
        assert_eq!(store.state(), &FilterState::default());
    }

    #[test]
    fn test_all_keeps_search() {
        let mut store = FilterStore::new();
        store.set_search_query("dragons");
        store.set_sort_by(SortBy::Popular);
        store.add_platform("Roblox");
        store.set_only_show_saved_posts(true);

        store.apply_preset("all");

        assert_eq!(store.state().search_query(), "dragons");
        assert_eq!(store.state().sort_by(), SortBy::Popular);
        assert!(store.state().selected_platforms().is_empty());
        assert!(!store.state().only_show_saved_posts());
    }

    #[test]
    fn test_parse_names() {
        for preset in Preset::PRESETS {
            assert_eq!(preset.name().parse::<Preset>(), Ok(preset));
        }
        assert_eq!(
            "Trending".parse::<Preset>(),
            Err(UnknownPreset("Trending".to_string()))
        );
    }
}
