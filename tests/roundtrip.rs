//! Query-string round trip over states reachable through store operations.

use feedscope::codec::{decode, encode};
use feedscope::domain::{
    ContentClass, FilterMode, FilterState, SortBy, SortDirection, TimeRange, ViewMode, DEFAULT_POSTS_PER_PAGE,
};
use feedscope::FilterStore;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    TogglePlatform(String),
    RemovePlatform(String),
    ToggleSubtype(String),
    AddCategory(String),
    ToggleCategory(String),
    ClearPlatforms,
    PlatformMode(FilterMode),
    SubtypeMode(FilterMode),
    Search(String),
    Sort(SortBy),
    Direction(SortDirection),
    Time(TimeRange),
    View(ViewMode),
    ContentClass(ContentClass, bool),
    HideRead(bool),
    SavedOnly(bool),
    Preset(&'static str),
    ResetFilters,
    ResetSearch,
}

fn value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("VRChat".to_string()),
        Just("Roblox".to_string()),
        "[A-Za-z0-9 ,&=+%#?é]{1,8}",
    ]
}

fn mode() -> impl Strategy<Value = FilterMode> {
    prop_oneof![Just(FilterMode::Any), Just(FilterMode::All)]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        value().prop_map(Op::TogglePlatform),
        value().prop_map(Op::RemovePlatform),
        value().prop_map(Op::ToggleSubtype),
        value().prop_map(Op::AddCategory),
        value().prop_map(Op::ToggleCategory),
        Just(Op::ClearPlatforms),
        mode().prop_map(Op::PlatformMode),
        mode().prop_map(Op::SubtypeMode),
        "[a-z0-9 &=%+]{0,12}".prop_map(Op::Search),
        prop_oneof![
            Just(SortBy::Recent),
            Just(SortBy::Popular),
            Just(SortBy::Trending),
            Just(SortBy::Alphabetical)
        ]
        .prop_map(Op::Sort),
        prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)].prop_map(Op::Direction),
        prop_oneof![
            Just(TimeRange::All),
            Just(TimeRange::Last24h),
            Just(TimeRange::Last7d),
            Just(TimeRange::Last30d),
            Just(TimeRange::Last90d)
        ]
        .prop_map(Op::Time),
        prop_oneof![Just(ViewMode::Card), Just(ViewMode::Compact), Just(ViewMode::List)].prop_map(Op::View),
        (
            prop_oneof![
                Just(ContentClass::PulsePolls),
                Just(ContentClass::Spotlights),
                Just(ContentClass::Events)
            ],
            any::<bool>()
        )
            .prop_map(|(class, shown)| Op::ContentClass(class, shown)),
        any::<bool>().prop_map(Op::HideRead),
        any::<bool>().prop_map(Op::SavedOnly),
        prop_oneof![Just("all"), Just("trending"), Just("following"), Just("saved"), Just("bogus")]
            .prop_map(Op::Preset),
        Just(Op::ResetFilters),
        Just(Op::ResetSearch),
    ]
}

fn run(store: &mut FilterStore, op: &Op) {
    match op {
        Op::TogglePlatform(v) => store.toggle_platform(v),
        Op::RemovePlatform(v) => store.remove_platform(v),
        Op::ToggleSubtype(v) => store.toggle_subtype(v),
        Op::AddCategory(v) => store.add_category(v),
        Op::ToggleCategory(v) => store.toggle_category(v),
        Op::ClearPlatforms => store.clear_platforms(),
        Op::PlatformMode(m) => store.set_platform_mode(*m),
        Op::SubtypeMode(m) => store.set_subtype_mode(*m),
        Op::Search(q) => store.set_search_query(q),
        Op::Sort(s) => store.set_sort_by(*s),
        Op::Direction(d) => store.set_sort_direction(*d),
        Op::Time(t) => store.set_time_range(*t),
        Op::View(v) => store.set_view_mode(*v),
        Op::ContentClass(class, shown) => store.set_content_class(*class, *shown),
        Op::HideRead(hide) => store.set_hide_read_posts(*hide),
        Op::SavedOnly(saved) => store.set_only_show_saved_posts(*saved),
        Op::Preset(name) => store.apply_preset(name),
        Op::ResetFilters => store.reset_filters(),
        Op::ResetSearch => store.reset_search(),
    }
}

/// The state as a URL can describe it: the search query is trimmed, a mode
/// on an empty facet is not encoded, and the page size has no query key.
fn addressable(state: &FilterState) -> FilterState {
    let mut store = FilterStore::with_state(state.clone());
    store.set_search_query(state.trimmed_query());
    if state.selected_platforms().is_empty() {
        store.set_platform_mode(FilterMode::Any);
    }
    if state.selected_subtypes().is_empty() {
        store.set_subtype_mode(FilterMode::Any);
    }
    store.set_posts_per_page(DEFAULT_POSTS_PER_PAGE);
    store.state().clone()
}

proptest! {
    #[test]
    fn decode_of_encode_reproduces_state(ops in prop::collection::vec(op(), 0..24)) {
        let mut store = FilterStore::new();
        for op in &ops {
            run(&mut store, op);
        }

        let expected = addressable(store.state());
        let query = encode(store.state());
        let decoded = FilterState::from_patch(&decode(&query));

        prop_assert_eq!(&decoded, &expected, "query: {}", query);
        prop_assert_eq!(encode(&decoded), query);
    }

    #[test]
    fn decode_never_panics(query in ".{0,64}") {
        let _ = FilterState::from_patch(&decode(&query));
    }
}

#[test]
fn reachable_mode_on_empty_facet_is_dropped() {
    let mut store = FilterStore::new();
    store.set_platform_mode(FilterMode::All);
    assert_eq!(encode(store.state()), "");
    assert_eq!(addressable(store.state()), FilterState::default());
}

#[test]
fn padded_search_is_trimmed_only_in_the_url() {
    let mut store = FilterStore::new();
    store.set_search_query("  dragons & co ");
    assert_eq!(store.state().search_query(), "  dragons & co ");

    let query = encode(store.state());
    assert_eq!(query, "q=dragons+%26+co");
    let decoded = FilterState::from_patch(&decode(&query));
    assert_eq!(decoded, addressable(store.state()));
    assert_eq!(decoded.search_query(), "dragons & co");
}
