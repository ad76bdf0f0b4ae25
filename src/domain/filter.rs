//! Filter state model.
//!
//! [`FilterState`] is the single aggregate describing which content a feed shows
//! and how: selected facets (platforms, subtypes, categories) with their match
//! modes, the search query, sort order, time window, content-class toggles and
//! display preferences. Every field always holds a value, so serialization into
//! a query string or a preference record is total.
//!
//! Fields are crate-private. Reads go through accessors; writes go through the
//! named operations on [`FilterStore`](crate::app::FilterStore).
//!
//! [`FilterPatch`] is the sparse counterpart produced by the query codec: each
//! field is either an opinion or absent.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of posts shown per page when nothing else is configured.
pub const DEFAULT_POSTS_PER_PAGE: u32 = 20;

/// Whether an item must match at least one (`Any`) or every (`All`) selected facet value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Any,
    All,
}

impl FilterMode {
    /// Query-string token for this mode.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::All => "all",
        }
    }

    /// Parses a query-string token, returning `None` for anything unknown.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "any" => Some(Self::Any),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// Feed ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Recent,
    Popular,
    Trending,
    #[serde(rename = "alpha")]
    Alphabetical,
}

impl SortBy {
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Popular => "popular",
            Self::Trending => "trending",
            Self::Alphabetical => "alpha",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "recent" => Some(Self::Recent),
            "popular" => Some(Self::Popular),
            "trending" => Some(Self::Trending),
            "alpha" => Some(Self::Alphabetical),
            _ => None,
        }
    }
}

/// Direction applied on top of [`SortBy`]. `Desc` puts the greatest value first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Age window relative to "now" that content must fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "24h")]
    Last24h,
    #[serde(rename = "7d")]
    Last7d,
    #[serde(rename = "30d")]
    Last30d,
    #[serde(rename = "90d")]
    Last90d,
}

impl TimeRange {
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Last24h => "24h",
            Self::Last7d => "7d",
            Self::Last30d => "30d",
            Self::Last90d => "90d",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "all" => Some(Self::All),
            "24h" => Some(Self::Last24h),
            "7d" => Some(Self::Last7d),
            "30d" => Some(Self::Last30d),
            "90d" => Some(Self::Last90d),
            _ => None,
        }
    }

    /// Maximum content age admitted by this range, `None` for [`TimeRange::All`].
    #[must_use]
    pub fn max_age(self) -> Option<chrono::Duration> {
        match self {
            Self::All => None,
            Self::Last24h => Some(chrono::Duration::hours(24)),
            Self::Last7d => Some(chrono::Duration::days(7)),
            Self::Last30d => Some(chrono::Duration::days(30)),
            Self::Last90d => Some(chrono::Duration::days(90)),
        }
    }

    /// Human readable label used in filter summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "all time",
            Self::Last24h => "last 24 hours",
            Self::Last7d => "last 7 days",
            Self::Last30d => "last 30 days",
            Self::Last90d => "last 90 days",
        }
    }
}

/// Layout used by list components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Card,
    Compact,
    List,
}

impl ViewMode {
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Compact => "compact",
            Self::List => "list",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "card" => Some(Self::Card),
            "compact" => Some(Self::Compact),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

/// Returned when parsing a string that is not a known token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized value '{0}'")]
pub struct UnknownToken(pub String);

macro_rules! token_conversions {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = UnknownToken;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_token(s).ok_or_else(|| UnknownToken(s.to_string()))
            }
        })*
    };
}

token_conversions!(FilterMode, SortBy, SortDirection, TimeRange, ViewMode);

/// Whole content classes that can be switched off independently of facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentClass {
    PulsePolls,
    Spotlights,
    Events,
}

/// Canonical filter, sort and view state of one feed.
///
/// Facet selections keep insertion order (shareable links list values in the
/// order the user picked them) but compare as sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub(crate) selected_platforms: IndexSet<String>,
    pub(crate) platform_filter_mode: FilterMode,
    pub(crate) selected_subtypes: IndexSet<String>,
    pub(crate) subtype_filter_mode: FilterMode,
    pub(crate) selected_categories: IndexSet<String>,
    pub(crate) search_query: String,
    pub(crate) sort_by: SortBy,
    pub(crate) sort_direction: SortDirection,
    pub(crate) show_pulse_polls: bool,
    pub(crate) show_spotlights: bool,
    pub(crate) show_events: bool,
    pub(crate) hide_read_posts: bool,
    pub(crate) only_show_saved_posts: bool,
    pub(crate) time_range: TimeRange,
    pub(crate) view_mode: ViewMode,
    pub(crate) posts_per_page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            selected_platforms: IndexSet::new(),
            platform_filter_mode: FilterMode::Any,
            selected_subtypes: IndexSet::new(),
            subtype_filter_mode: FilterMode::Any,
            selected_categories: IndexSet::new(),
            search_query: String::new(),
            sort_by: SortBy::Recent,
            sort_direction: SortDirection::Desc,
            show_pulse_polls: true,
            show_spotlights: true,
            show_events: true,
            hide_read_posts: false,
            only_show_saved_posts: false,
            time_range: TimeRange::All,
            view_mode: ViewMode::Card,
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
        }
    }
}

impl FilterState {
    #[must_use]
    pub const fn selected_platforms(&self) -> &IndexSet<String> {
        &self.selected_platforms
    }

    #[must_use]
    pub const fn platform_filter_mode(&self) -> FilterMode {
        self.platform_filter_mode
    }

    #[must_use]
    pub const fn selected_subtypes(&self) -> &IndexSet<String> {
        &self.selected_subtypes
    }

    #[must_use]
    pub const fn subtype_filter_mode(&self) -> FilterMode {
        self.subtype_filter_mode
    }

    #[must_use]
    pub const fn selected_categories(&self) -> &IndexSet<String> {
        &self.selected_categories
    }

    /// The query exactly as typed, including surrounding whitespace.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// The query as consumed by matching and serialization.
    #[must_use]
    pub fn trimmed_query(&self) -> &str {
        self.search_query.trim()
    }

    #[must_use]
    pub const fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    #[must_use]
    pub const fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    #[must_use]
    pub const fn shows(&self, class: ContentClass) -> bool {
        match class {
            ContentClass::PulsePolls => self.show_pulse_polls,
            ContentClass::Spotlights => self.show_spotlights,
            ContentClass::Events => self.show_events,
        }
    }

    #[must_use]
    pub const fn hide_read_posts(&self) -> bool {
        self.hide_read_posts
    }

    #[must_use]
    pub const fn only_show_saved_posts(&self) -> bool {
        self.only_show_saved_posts
    }

    #[must_use]
    pub const fn time_range(&self) -> TimeRange {
        self.time_range
    }

    #[must_use]
    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    #[must_use]
    pub const fn posts_per_page(&self) -> u32 {
        self.posts_per_page
    }

    /// Returns `true` if any filter narrows the feed.
    ///
    /// Sort order, view mode and page size are display state and never count.
    /// Content-class toggles count when they are switched off.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.selected_platforms.is_empty()
            || !self.selected_subtypes.is_empty()
            || !self.selected_categories.is_empty()
            || !self.trimmed_query().is_empty()
            || self.time_range != TimeRange::All
            || self.hide_read_posts
            || self.only_show_saved_posts
            || !self.show_pulse_polls
            || !self.show_spotlights
            || !self.show_events
    }

    /// Builds the state described by `patch` on top of the defaults.
    ///
    /// This is how a navigation turns a query string into a full state: the
    /// result never depends on whatever state was in memory before.
    #[must_use]
    pub fn from_patch(patch: &FilterPatch) -> Self {
        let mut state = Self::default();
        state.apply_patch(patch);
        state
    }

    /// Overlays every opinion in `patch` onto this state.
    ///
    /// Facet values are de-duplicated here, not in the codec.
    pub fn apply_patch(&mut self, patch: &FilterPatch) {
        if !patch.platforms.is_empty() {
            self.selected_platforms = patch.platforms.iter().cloned().collect();
        }
        if !patch.subtypes.is_empty() {
            self.selected_subtypes = patch.subtypes.iter().cloned().collect();
        }
        if !patch.categories.is_empty() {
            self.selected_categories = patch.categories.iter().cloned().collect();
        }
        if let Some(mode) = patch.platform_mode {
            self.platform_filter_mode = mode;
        }
        if let Some(mode) = patch.subtype_mode {
            self.subtype_filter_mode = mode;
        }
        if let Some(query) = &patch.search_query {
            self.search_query.clone_from(query);
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(direction) = patch.sort_direction {
            self.sort_direction = direction;
        }
        if let Some(range) = patch.time_range {
            self.time_range = range;
        }
        if let Some(view) = patch.view_mode {
            self.view_mode = view;
        }
        if let Some(flag) = patch.show_pulse_polls {
            self.show_pulse_polls = flag;
        }
        if let Some(flag) = patch.show_spotlights {
            self.show_spotlights = flag;
        }
        if let Some(flag) = patch.show_events {
            self.show_events = flag;
        }
        if let Some(flag) = patch.hide_read_posts {
            self.hide_read_posts = flag;
        }
        if let Some(flag) = patch.only_show_saved_posts {
            self.only_show_saved_posts = flag;
        }
    }
}

/// Sparse update decoded from a query string.
///
/// An empty facet list or a `None` field means "no opinion". Facet lists keep
/// values exactly as written, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub platforms: Vec<String>,
    pub platform_mode: Option<FilterMode>,
    pub subtypes: Vec<String>,
    pub subtype_mode: Option<FilterMode>,
    pub categories: Vec<String>,
    pub search_query: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sort_direction: Option<SortDirection>,
    pub time_range: Option<TimeRange>,
    pub view_mode: Option<ViewMode>,
    pub show_pulse_polls: Option<bool>,
    pub show_spotlights: Option<bool>,
    pub show_events: Option<bool>,
    pub hide_read_posts: Option<bool>,
    pub only_show_saved_posts: Option<bool>,
}

impl FilterPatch {
    /// Returns `true` if the patch holds no opinion at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
