//! Filtered, sorted and paged views over a content list.
//!
//! This is where a [`FilterState`] meets the content it filters. List
//! components hand in whatever the content source returned and render the
//! resulting [`FeedView`].
//!
//! # Filtering Algorithm
//!
//! An item is kept when all of these hold:
//!
//! 1. **Content class**: its kind is not switched off (plain posts always pass)
//! 2. **Viewer flags**: not read when hiding read posts, saved when saved-only
//! 3. **Platforms / subtypes**: overlap (`Any`) or containment (`All`) of the selection
//! 4. **Categories**: overlap with the selection
//! 5. **Time range**: created within the window ending at `now`
//! 6. **Search**: every whitespace-separated token of the trimmed, lower-cased
//!    query fuzzy-matches the title or the body
//!
//! An empty selection never excludes anything.

use super::ranking::trending_score;
use crate::domain::{ContentItem, FilterMode, FilterState, SortBy, SortDirection, ViewMode};
use chrono::{DateTime, Utc};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use indexmap::IndexSet;
use std::cmp::Ordering;

/// One page of filtered content, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedView<'a> {
    /// Items on the requested page, in display order.
    pub items: Vec<&'a ContentItem>,
    /// 1-based page number actually shown (clamped to the last page).
    pub page: usize,
    /// Number of items matching the filters across all pages.
    pub total_items: usize,
    /// Number of pages; at least 1 even when nothing matches.
    pub total_pages: usize,
    pub view_mode: ViewMode,
}

/// Pre-tokenized search query.
struct SearchTokens {
    tokens: Vec<String>,
    matcher: Option<SkimMatcherV2>,
}

impl SearchTokens {
    fn new(query: &str) -> Self {
        let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        let matcher = if tokens.is_empty() {
            None
        } else {
            Some(SkimMatcherV2::default())
        };
        Self { tokens, matcher }
    }

    fn matches(&self, item: &ContentItem) -> bool {
        self.matcher.as_ref().map_or(true, |m| {
            let title = item.title.to_lowercase();
            let body = item.body.to_lowercase();
            self.tokens.iter().all(|token| {
                m.fuzzy_match(&title, token).is_some() || m.fuzzy_match(&body, token).is_some()
            })
        })
    }
}

/// Returns `true` if `item` passes every filter in `state`.
#[must_use]
pub fn matches(state: &FilterState, item: &ContentItem, now: DateTime<Utc>) -> bool {
    matches_filters(state, item, now) && SearchTokens::new(state.trimmed_query()).matches(item)
}

fn matches_filters(state: &FilterState, item: &ContentItem, now: DateTime<Utc>) -> bool {
    if let Some(class) = item.kind.class() {
        if !state.shows(class) {
            return false;
        }
    }
    if state.hide_read_posts() && item.read {
        return false;
    }
    if state.only_show_saved_posts() && !item.saved {
        return false;
    }
    if !facet_matches(state.selected_platforms(), state.platform_filter_mode(), &item.platforms) {
        return false;
    }
    if !facet_matches(state.selected_subtypes(), state.subtype_filter_mode(), &item.subtypes) {
        return false;
    }
    if !facet_matches(state.selected_categories(), FilterMode::Any, &item.categories) {
        return false;
    }
    state
        .time_range()
        .max_age()
        .map_or(true, |max_age| item.created_at >= now - max_age)
}

fn facet_matches(selected: &IndexSet<String>, mode: FilterMode, tags: &[String]) -> bool {
    if selected.is_empty() {
        return true;
    }
    match mode {
        FilterMode::Any => tags.iter().any(|tag| selected.contains(tag)),
        FilterMode::All => selected.iter().all(|value| tags.contains(value)),
    }
}

/// Filters and sorts `items` according to `state`.
///
/// Ties are broken by item id so the order is deterministic.
#[must_use]
pub fn apply<'a>(state: &FilterState, items: &'a [ContentItem], now: DateTime<Utc>) -> Vec<&'a ContentItem> {
    let _span = tracing::debug_span!("apply_filters",
        total_items = items.len(),
        sort_by = %state.sort_by(),
        active = state.has_active_filters()
    ).entered();

    let search = SearchTokens::new(state.trimmed_query());
    let mut kept: Vec<&ContentItem> = items
        .iter()
        .filter(|item| matches_filters(state, item, now) && search.matches(item))
        .collect();

    sort(&mut kept, state.sort_by(), state.sort_direction(), now);

    tracing::debug!(kept = kept.len(), "filters applied");
    kept
}

fn sort(items: &mut [&ContentItem], sort_by: SortBy, direction: SortDirection, now: DateTime<Utc>) {
    let by_key = |a: &ContentItem, b: &ContentItem| -> Ordering {
        match sort_by {
            SortBy::Recent => a.created_at.cmp(&b.created_at),
            SortBy::Popular => a
                .engagement()
                .cmp(&b.engagement())
                .then_with(|| a.views.cmp(&b.views)),
            SortBy::Trending => trending_score(a, now)
                .partial_cmp(&trending_score(b, now))
                .unwrap_or(Ordering::Equal),
            SortBy::Alphabetical => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        }
    };

    items.sort_by(|a, b| {
        let ordering = match direction {
            SortDirection::Asc => by_key(*a, *b),
            SortDirection::Desc => by_key(*b, *a),
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    });
}

/// Filters, sorts and pages `items`.
///
/// `page` is 1-based; 0 is treated as 1 and pages past the end show the last page.
#[must_use]
pub fn view<'a>(state: &FilterState, items: &'a [ContentItem], page: usize, now: DateTime<Utc>) -> FeedView<'a> {
    let kept = apply(state, items, now);
    let per_page = usize::try_from(state.posts_per_page()).unwrap_or(usize::MAX).max(1);
    let total_items = kept.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let items = kept.into_iter().skip((page - 1) * per_page).take(per_page).collect();

    FeedView {
        items,
        page,
        total_items,
        total_pages,
        view_mode: state.view_mode(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FilterStore;
    use crate::domain::{ContentKind, TimeRange};
    use chrono::Duration;

    fn post(id: &str, title: &str, platforms: &[&str], hours_old: i64, now: DateTime<Utc>) -> ContentItem {
        let mut item = ContentItem::new(id, title, now - Duration::hours(hours_old));
        item.platforms = platforms.iter().map(ToString::to_string).collect();
        item
    }

    fn ids(items: &[&ContentItem]) -> Vec<String> {
        items.iter().map(|item| item.id.clone()).collect()
    }

    #[test]
    fn test_platform_any_and_all() {
        let now = Utc::now();
        let items = vec![
            post("a", "Both", &["VRChat", "Roblox"], 1, now),
            post("b", "Only VR", &["VRChat"], 2, now),
            post("c", "None", &[], 3, now),
        ];
        let mut store = FilterStore::new();
        store.add_platform("VRChat");
        store.add_platform("Roblox");
        assert_eq!(ids(&apply(store.state(), &items, now)), vec!["a", "b"]);

        store.set_platform_mode(FilterMode::All);
        assert_eq!(ids(&apply(store.state(), &items, now)), vec!["a"]);
    }

    #[test]
    fn test_content_class_and_flags() {
        let now = Utc::now();
        let mut poll = post("poll", "Poll", &[], 1, now);
        poll.kind = ContentKind::PulsePoll;
        let mut read = post("read", "Read", &[], 2, now);
        read.read = true;
        let mut saved = post("saved", "Saved", &[], 3, now);
        saved.saved = true;
        let items = vec![poll, read, saved];

        let mut store = FilterStore::new();
        store.set_show_pulse_polls(false);
        store.set_hide_read_posts(true);
        assert_eq!(ids(&apply(store.state(), &items, now)), vec!["saved"]);

        store.set_only_show_saved_posts(true);
        store.set_hide_read_posts(false);
        store.set_show_pulse_polls(true);
        assert_eq!(ids(&apply(store.state(), &items, now)), vec!["saved"]);
    }

    #[test]
    fn test_time_range_and_search() {
        let now = Utc::now();
        let items = vec![
            post("new", "Dragon avatars", &[], 2, now),
            post("old", "Dragon worlds", &[], 24 * 10, now),
            post("other", "Cats", &[], 1, now),
        ];
        let mut store = FilterStore::new();
        store.set_search_query("  dragon ");
        assert_eq!(ids(&apply(store.state(), &items, now)), vec!["new", "old"]);

        store.set_time_range(TimeRange::Last7d);
        assert_eq!(ids(&apply(store.state(), &items, now)), vec!["new"]);
    }

    #[test]
    fn test_sorting_directions() {
        let now = Utc::now();
        let mut a = post("a", "alpha", &[], 3, now);
        a.likes = 10;
        let mut b = post("b", "Bravo", &[], 1, now);
        b.likes = 5;
        let c = post("c", "charlie", &[], 2, now);
        let items = vec![a, b, c];

        let mut store = FilterStore::new();
        assert_eq!(ids(&apply(store.state(), &items, now)), vec!["b", "c", "a"]);

        store.set_sort_by(SortBy::Popular);
        assert_eq!(ids(&apply(store.state(), &items, now)), vec!["a", "b", "c"]);

        store.set_sort_by(SortBy::Alphabetical);
        store.set_sort_direction(SortDirection::Asc);
        assert_eq!(ids(&apply(store.state(), &items, now)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_paging() {
        let now = Utc::now();
        let items: Vec<ContentItem> = (0..5).map(|i| post(&i.to_string(), "p", &[], i, now)).collect();
        let mut store = FilterStore::new();
        store.set_posts_per_page(2);

        let first = view(store.state(), &items, 1, now);
        assert_eq!(first.total_items, 5);
        assert_eq!(first.total_pages, 3);
        assert_eq!(ids(&first.items), vec!["0", "1"]);

        let last = view(store.state(), &items, 99, now);
        assert_eq!(last.page, 3);
        assert_eq!(ids(&last.items), vec!["4"]);

        let empty = view(store.state(), &[], 0, now);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 1);
        assert!(empty.items.is_empty());
    }

    #[test]
    fn test_single_item_matches() {
        let now = Utc::now();
        let item = post("a", "Avatar", &["Roblox"], 1, now);
        let mut store = FilterStore::new();
        assert!(matches(store.state(), &item, now));
        store.add_platform("VRChat");
        assert!(!matches(store.state(), &item, now));
    }
}
