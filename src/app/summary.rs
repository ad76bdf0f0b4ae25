//! Human-readable description of active filters.

use crate::domain::{ContentClass, FilterState, TimeRange};

/// Sentinel returned when nothing narrows the feed.
pub const NO_FILTERS: &str = "No filters active";

/// Describes the active filters as a comma-joined list.
///
/// # Example
///
/// ```
/// use feedscope::app::{filter_summary, FilterStore};
/// use feedscope::domain::TimeRange;
///
/// let mut store = FilterStore::new();
/// assert_eq!(filter_summary(store.state()), "No filters active");
///
/// store.add_platform("VRChat");
/// store.add_platform("Roblox");
/// store.add_category("music");
/// store.set_search_query(" dragons ");
/// store.set_time_range(TimeRange::Last7d);
/// assert_eq!(
///     filter_summary(store.state()),
///     "2 platforms, 1 category, search \"dragons\", last 7 days"
/// );
/// ```
#[must_use]
pub fn filter_summary(state: &FilterState) -> String {
    if !state.has_active_filters() {
        return NO_FILTERS.to_string();
    }

    let mut parts = Vec::new();
    push_count(&mut parts, state.selected_platforms().len(), "platform", "platforms");
    push_count(&mut parts, state.selected_subtypes().len(), "subtype", "subtypes");
    push_count(&mut parts, state.selected_categories().len(), "category", "categories");

    let query = state.trimmed_query();
    if !query.is_empty() {
        parts.push(format!("search \"{query}\""));
    }
    if state.time_range() != TimeRange::All {
        parts.push(state.time_range().label().to_string());
    }

    let hidden = [ContentClass::PulsePolls, ContentClass::Spotlights, ContentClass::Events]
        .into_iter()
        .filter(|class| !state.shows(*class))
        .count();
    push_count(&mut parts, hidden, "content type hidden", "content types hidden");

    if state.hide_read_posts() {
        parts.push("hiding read posts".to_string());
    }
    if state.only_show_saved_posts() {
        parts.push("saved only".to_string());
    }

    parts.join(", ")
}

fn push_count(parts: &mut Vec<String>, count: usize, singular: &str, plural: &str) {
    match count {
        0 => {}
        1 => parts.push(format!("1 {singular}")),
        n => parts.push(format!("{n} {plural}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FilterStore;

    #[test]
    fn test_pluralization() {
        let mut store = FilterStore::new();
        store.add_platform("VRChat");
        assert_eq!(filter_summary(store.state()), "1 platform");

        store.add_platform("Roblox");
        assert_eq!(filter_summary(store.state()), "2 platforms");
    }

    #[test]
    fn test_categories_plural() {
        let mut store = FilterStore::new();
        store.add_category("art");
        store.add_category("music");
        store.add_subtype("world");
        assert_eq!(filter_summary(store.state()), "1 subtype, 2 categories");
    }

    #[test]
    fn test_flags_and_hidden_classes() {
        let mut store = FilterStore::new();
        store.set_show_events(false);
        store.set_show_spotlights(false);
        store.set_hide_read_posts(true);
        store.set_only_show_saved_posts(true);
        assert_eq!(
            filter_summary(store.state()),
            "2 content types hidden, hiding read posts, saved only"
        );
    }

    #[test]
    fn test_sort_only_is_not_a_filter() {
        let mut store = FilterStore::new();
        store.set_sort_by(crate::domain::SortBy::Trending);
        assert_eq!(filter_summary(store.state()), NO_FILTERS);
    }
}
