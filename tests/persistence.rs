//! Preference persistence across sessions.

use feedscope::domain::{SortBy, ViewMode};
use feedscope::infrastructure::{Location, MemoryLocation};
use feedscope::storage::{JsonStorage, MemoryStorage, PersistedFilters, PreferenceStorage};
use feedscope::{initialize, Config, FeedSession};
use std::path::Path;

const FEED: &str = "http://localhost/feed";

fn config(path: &Path) -> Config {
    Config {
        storage_path: Some(path.to_path_buf()),
        ..Config::default()
    }
}

#[test]
fn preferences_survive_a_restart_without_transient_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("filters.json");

    let mut session = initialize(&config(&path), FEED).unwrap();
    session.store_mut().add_platform("VRChat");
    session.store_mut().set_view_mode(ViewMode::Compact);
    session.store_mut().set_posts_per_page(50);
    session.store_mut().set_search_query("dragons");
    session.store_mut().set_only_show_saved_posts(true);
    session.shutdown();

    let session = initialize(&config(&path), FEED).unwrap();
    assert!(session.state().selected_platforms().contains("VRChat"));
    assert_eq!(session.state().view_mode(), ViewMode::Compact);
    assert_eq!(session.state().posts_per_page(), 50);
    assert_eq!(session.state().search_query(), "");
    assert!(!session.state().only_show_saved_posts());
}

#[test]
fn stored_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("filters.json");

    let mut session = initialize(&config(&path), FEED).unwrap();
    session.store_mut().set_sort_by(SortBy::Alphabetical);
    session.store_mut().set_search_query("dragons");
    session.shutdown();

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["version"], 1);
    let record = &json["records"]["feed-filters"];
    assert_eq!(record["sortBy"], "alpha");
    assert!(record.get("searchQuery").is_none());
    assert!(record.get("onlyShowSavedPosts").is_none());
}

#[test]
fn url_filters_win_over_stored_filters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("filters.json");
    {
        let mut storage = JsonStorage::new(path.clone()).unwrap();
        let record = PersistedFilters {
            sort_by: SortBy::Trending,
            view_mode: ViewMode::List,
            ..PersistedFilters::default()
        };
        storage.save("feed-filters", &record).unwrap();
    }

    let session = initialize(&config(&path), &format!("{FEED}?category=music")).unwrap();
    assert!(session.state().selected_categories().contains("music"));
    assert_eq!(session.state().sort_by(), SortBy::Recent);
    assert_eq!(session.state().view_mode(), ViewMode::Card);

    let session = initialize(&config(&path), FEED).unwrap();
    assert_eq!(session.state().sort_by(), SortBy::Trending);
}

#[test]
fn unavailable_storage_degrades_to_memory() {
    let mut location = MemoryLocation::new(FEED);
    let mut session =
        FeedSession::start(&Config::default(), Box::new(MemoryStorage::failing()), &location.href()).unwrap();

    session.store_mut().add_platform("Roblox");
    session.store_mut().apply_preset("saved");
    assert!(session.state().only_show_saved_posts());
    assert!(session.sync_location(&mut location));
    assert_eq!(location.href(), "http://localhost/feed?saved=1");
}

#[test]
fn corrupt_storage_file_still_starts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("filters.json");
    std::fs::write(&path, "{ definitely not json").unwrap();

    let mut session = initialize(&config(&path), FEED).unwrap();
    assert!(!session.state().has_active_filters());
    session.store_mut().add_category("art");
}

#[test]
fn cleared_preferences_start_from_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("filters.json");

    let mut session = initialize(&config(&path), FEED).unwrap();
    session.store_mut().set_view_mode(ViewMode::List);
    session.clear_preferences();
    session.shutdown();

    let session = initialize(&config(&path), FEED).unwrap();
    assert_eq!(session.state().view_mode(), ViewMode::Card);
}

#[test]
fn rehydrated_filters_reach_the_address_bar() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("filters.json");

    let mut session = initialize(&config(&path), FEED).unwrap();
    session.store_mut().add_platform("VRChat");
    session.store_mut().set_posts_per_page(50);
    session.shutdown();

    let mut location = MemoryLocation::new(FEED);
    let mut session = initialize(&config(&path), &location.href()).unwrap();
    assert!(session.sync_location(&mut location));
    assert_eq!(location.href(), format!("{FEED}?platform=VRChat"));

    let linked = initialize(&config(&path), &location.href()).unwrap();
    assert_eq!(linked.state().posts_per_page(), 20);
    assert!(linked.state().selected_platforms().contains("VRChat"));
}
