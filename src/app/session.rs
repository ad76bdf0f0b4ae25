//! Feed session lifecycle.
//!
//! A [`FeedSession`] wires one [`FilterStore`] to its [`SyncController`] and to
//! preference storage, and owns them for as long as the filter-bearing view is
//! alive.
//!
//! # Startup
//!
//! 1. Load the persisted preferences (a failing backend means defaults)
//! 2. Reconcile with the URL: a query that decodes to anything wins wholesale
//!    over the persisted filters; an empty one keeps them
//! 3. Subscribe persistence and the sync controller, flagging it pending when
//!    the address bar does not show the resulting state yet
//!
//! Persistence is best-effort. Storage errors are logged and the session keeps
//! working in memory.

use super::actions::Action;
use super::store::{FilterStore, Subscription};
use super::sync::SyncController;
use crate::codec::{decode_href, share_url};
use crate::domain::error::Result;
use crate::domain::FilterState;
use crate::infrastructure::Location;
use crate::storage::{PersistedFilters, PreferenceStorage};
use crate::Config;
use std::cell::RefCell;
use std::rc::Rc;
use url::Url;

type SharedStorage = Rc<RefCell<Box<dyn PreferenceStorage>>>;

/// Store, sync controller and persistence for one feed view.
pub struct FeedSession {
    store: FilterStore,
    sync: SyncController,
    persistence: Option<Subscription>,
    storage: SharedStorage,
    namespace: String,
    base: Url,
}

impl std::fmt::Debug for FeedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSession")
            .field("store", &self.store)
            .field("sync", &self.sync)
            .field("persisting", &self.persistence.is_some())
            .field("namespace", &self.namespace)
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl FeedSession {
    /// Starts a session for a view currently showing `href`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedscopeError::Url`](crate::FeedscopeError::Url) if
    /// `config.base_url` is not a valid URL. Storage failures never fail startup.
    pub fn start(config: &Config, storage: Box<dyn PreferenceStorage>, href: &str) -> Result<Self> {
        let _span = tracing::debug_span!("session_start", href = %href, namespace = %config.namespace).entered();
        let base = Url::parse(&config.base_url)?;

        let persisted = if config.persist {
            load_persisted(&*storage, &config.namespace)
        } else {
            FilterState::default()
        };

        let patch = decode_href(href);
        let initial = if patch.is_empty() {
            persisted
        } else {
            tracing::debug!("URL filters take precedence over stored preferences");
            FilterState::from_patch(&patch)
        };

        let store = FilterStore::with_state(initial);
        let storage: SharedStorage = Rc::new(RefCell::new(storage));
        let persistence = config
            .persist
            .then(|| subscribe_persistence(&store, Rc::clone(&storage), config.namespace.clone()));
        let sync = SyncController::attach(&store, base.clone());
        let current = sync.resolve(href);
        if share_url(&current, store.state()) != current {
            tracing::debug!("address bar does not reflect rehydrated filters");
            sync.mark_pending();
        }

        tracing::info!(active = store.has_active_filters(), "feed session started");
        Ok(Self {
            store,
            sync,
            persistence,
            storage,
            namespace: config.namespace.clone(),
            base,
        })
    }

    #[must_use]
    pub const fn store(&self) -> &FilterStore {
        &self.store
    }

    /// Mutable access for running store operations.
    ///
    /// Changes are synchronized to the URL on the next [`end_of_task`](Self::end_of_task).
    pub fn store_mut(&mut self) -> &mut FilterStore {
        &mut self.store
    }

    #[must_use]
    pub const fn state(&self) -> &FilterState {
        self.store.state()
    }

    /// Reacts to the address bar changing to `href` (deep link, back/forward).
    ///
    /// Returns `true` if the filter state changed.
    pub fn navigate(&mut self, href: &str) -> bool {
        self.sync.on_navigation(&mut self.store, href)
    }

    /// Closes the current batch of mutations.
    ///
    /// Returns the address-bar write the batch requires, if any.
    pub fn end_of_task(&mut self, current_href: &str) -> Option<Action> {
        self.sync.flush(&self.store, current_href)
    }

    /// Closes the current batch and applies the resulting write to `location`.
    ///
    /// Returns `true` if the location was rewritten.
    pub fn sync_location(&mut self, location: &mut dyn Location) -> bool {
        match self.end_of_task(&location.href()) {
            Some(action) => {
                action.execute(location);
                true
            }
            None => false,
        }
    }

    /// The canonical shareable URL for the current state.
    #[must_use]
    pub fn share_url(&self) -> Url {
        share_url(&self.base, self.store.state())
    }

    /// Deletes the stored preferences. The in-memory state is left alone.
    pub fn clear_preferences(&mut self) {
        if let Err(e) = self.storage.borrow_mut().clear(&self.namespace) {
            tracing::warn!(error = %e, "failed to clear stored preferences");
        }
    }

    /// Tears the session down, detaching sync and persistence.
    pub fn shutdown(mut self) {
        self.sync.dispose();
        self.persistence = None;
        tracing::debug!("feed session shut down");
    }
}

fn load_persisted(storage: &dyn PreferenceStorage, namespace: &str) -> FilterState {
    match storage.load(namespace) {
        Ok(Some(record)) => {
            tracing::debug!("rehydrated stored preferences");
            FilterState::from(record)
        }
        Ok(None) => FilterState::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load stored preferences, using defaults");
            FilterState::default()
        }
    }
}

fn subscribe_persistence(store: &FilterStore, storage: SharedStorage, namespace: String) -> Subscription {
    let mut last_saved = PersistedFilters::from(store.state());
    store.subscribe(move |state| {
        let record = PersistedFilters::from(state);
        if record == last_saved {
            return;
        }
        match storage.borrow_mut().save(&namespace, &record) {
            Ok(()) => last_saved = record,
            Err(e) => tracing::warn!(error = %e, "failed to persist preferences"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SortBy, ViewMode};
    use crate::infrastructure::MemoryLocation;
    use crate::storage::MemoryStorage;

    const HREF: &str = "http://localhost/feed";

    fn config() -> Config {
        Config::default()
    }

    #[test]
    fn test_rehydrates_when_url_is_empty() {
        let record = PersistedFilters {
            view_mode: ViewMode::Compact,
            ..PersistedFilters::default()
        };
        let storage = MemoryStorage::new().with_record("feed-filters", record);
        let session = FeedSession::start(&config(), Box::new(storage), HREF).unwrap();
        assert_eq!(session.state().view_mode(), ViewMode::Compact);
    }

    #[test]
    fn test_url_wins_over_stored_filters() {
        let record = PersistedFilters {
            view_mode: ViewMode::Compact,
            posts_per_page: 50,
            ..PersistedFilters::default()
        };
        let storage = MemoryStorage::new().with_record("feed-filters", record);
        let session =
            FeedSession::start(&config(), Box::new(storage), "http://localhost/feed?sort=popular").unwrap();
        assert_eq!(session.state().sort_by(), SortBy::Popular);
        assert_eq!(session.state().view_mode(), ViewMode::Card);
        assert_eq!(session.state().posts_per_page(), crate::domain::DEFAULT_POSTS_PER_PAGE);
    }

    #[test]
    fn test_rehydrated_filters_are_written_to_url() {
        let mut record = PersistedFilters::default();
        record.selected_platforms.insert("VRChat".to_string());
        let storage = MemoryStorage::new().with_record("feed-filters", record);
        let mut session = FeedSession::start(&config(), Box::new(storage), HREF).unwrap();
        let mut location = MemoryLocation::new(HREF);

        assert!(session.sync_location(&mut location));
        assert_eq!(location.href(), "http://localhost/feed?platform=VRChat");
        assert_eq!(location.history_len(), 1);
        assert!(!session.sync_location(&mut location));
    }

    #[test]
    fn test_url_matching_state_needs_no_write() {
        let mut session = FeedSession::start(&config(), Box::new(MemoryStorage::new()), HREF).unwrap();
        let mut location = MemoryLocation::new(HREF);
        assert!(!session.sync_location(&mut location));
    }

    #[test]
    fn test_failing_storage_keeps_working() {
        let mut session = FeedSession::start(&config(), Box::new(MemoryStorage::failing()), HREF).unwrap();
        let mut location = MemoryLocation::new(HREF);

        session.store_mut().add_platform("VRChat");
        assert!(session.sync_location(&mut location));
        assert_eq!(location.href(), "http://localhost/feed?platform=VRChat");
    }

    #[test]
    fn test_invalid_base_url_is_an_error() {
        let config = Config {
            base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(FeedSession::start(&config, Box::new(MemoryStorage::new()), HREF).is_err());
    }

    #[test]
    fn test_changes_are_persisted() {
        let mut session = FeedSession::start(&config(), Box::new(MemoryStorage::new()), HREF).unwrap();
        session.store_mut().set_search_query("dragons");
        session.store_mut().set_only_show_saved_posts(true);
        session.store_mut().set_sort_by(SortBy::Popular);

        let stored = session.storage.borrow().load("feed-filters").unwrap();
        assert_eq!(stored.map(|r| r.sort_by), Some(SortBy::Popular));
    }

    #[test]
    fn test_subscribers_follow_persist_flag() {
        let session = FeedSession::start(&config(), Box::new(MemoryStorage::new()), HREF).unwrap();
        assert_eq!(session.store().subscriber_count(), 2);
        session.shutdown();

        let config = Config {
            persist: false,
            ..Config::default()
        };
        let session = FeedSession::start(&config, Box::new(MemoryStorage::new()), HREF).unwrap();
        assert_eq!(session.store().subscriber_count(), 1);
    }
}
