//! Feedscope: faceted feed filters with URL-addressable state.
//!
//! Feedscope keeps the filter, sort and view state of a content feed in one
//! store and keeps it in lockstep with the address bar:
//! - Facet selection (platforms, subtypes, categories) with ANY/ALL modes
//! - Sorting, time windows, content-class toggles and view preferences
//! - Lossless, deterministic query-string encoding for shareable links
//! - Debounced two-way URL sync that never adds history entries
//! - Named presets and scoped resets
//! - Persistent preferences backed by an atomically written JSON file

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Filter store and presets                         │
//! │  - URL sync controller and session lifecycle        │
//! │  - Event → action model, feed views                 │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌────────────────┐
//! │ Codec         │   │ Storage Layer │   │ Infrastructure │
//! │ (codec/)      │   │ (storage/)    │   │ (infrastructure/)
//! │ - Query I/O   │   │ - JSON file   │   │ - Data paths   │
//! │ - Deep links  │   │ - In-memory   │   │ - Location     │
//! └───────────────┘   └───────────────┘   └────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/)                                   │
//! │  - Filter state, patches, enums, content items      │
//! │  - Error types                                      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Filter store, presets, sync controller, sessions
//! - [`codec`]: Query-string encoding/decoding and deep links
//! - [`domain`]: Core domain types (filter state, content items, errors)
//! - [`storage`]: Preference persistence backends
//! - [`infrastructure`]: Data paths and the address-bar abstraction
//! - [`observability`]: Tracing setup with optional span export
//!
//! # Example
//!
//! ```rust
//! use feedscope::app::handle_event;
//! use feedscope::infrastructure::{Location, MemoryLocation};
//! use feedscope::storage::MemoryStorage;
//! use feedscope::{Config, Event, FeedSession};
//!
//! let mut location = MemoryLocation::new("http://localhost/feed");
//! let mut session = FeedSession::start(
//!     &Config::default(),
//!     Box::new(MemoryStorage::new()),
//!     &location.href(),
//! )?;
//!
//! for event in [
//!     Event::AddPlatform("VRChat".into()),
//!     Event::AddPlatform("Roblox".into()),
//!     Event::SetSearchQuery("avatar".into()),
//! ] {
//!     handle_event(&mut session, &event);
//! }
//! session.sync_location(&mut location);
//!
//! assert_eq!(location.href(), "http://localhost/feed?platform=VRChat&platform=Roblox&q=avatar");
//! assert_eq!(location.replacements(), 1);
//! # Ok::<(), feedscope::FeedscopeError>(())
//! ```

pub mod app;
pub mod codec;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod storage;

pub use app::{handle_event, Action, Event, FeedSession, FilterStore, Preset};
pub use domain::{FeedscopeError, FilterState, Result};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use storage::{JsonStorage, MemoryStorage, PreferenceStorage};

/// Default base URL shareable links are built on.
pub const DEFAULT_BASE_URL: &str = "http://localhost/feed";

/// Default storage namespace for the feed's preferences.
pub const DEFAULT_NAMESPACE: &str = "feed-filters";

/// Runtime configuration.
///
/// Loaded from a TOML file ([`Config::from_file`]) or a string map
/// ([`Config::from_map`]); every key is optional.
///
/// # Example
///
/// ```toml
/// base_url = "https://example.com/feed"
/// storage_path = "~/.local/share/feedscope/filters.json"
/// persist = true
/// namespace = "feed-filters"
/// trace_level = "debug"
/// trace_file = "/tmp/feedscope-spans.json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL used for shareable links and when the current href cannot be
    /// parsed. Default: `http://localhost/feed`
    pub base_url: String,

    /// Preference file. Default: `<data dir>/feedscope/filters.json`
    pub storage_path: Option<PathBuf>,

    /// Whether preferences are loaded and saved at all. Default: `true`
    pub persist: bool,

    /// Key the preferences are stored under. Default: `feed-filters`
    pub namespace: String,

    /// Tracing filter directive used when `RUST_LOG` is unset.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any `EnvFilter`
    /// directive. Default: `"warn"`
    pub trace_level: Option<String>,

    /// File that finished spans are exported to as JSON lines. Default: none
    pub trace_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            storage_path: None,
            persist: true,
            namespace: DEFAULT_NAMESPACE.to_string(),
            trace_level: None,
            trace_file: None,
        }
    }
}

impl Config {
    /// Parses configuration from a string map.
    ///
    /// # Parsing Rules
    ///
    /// - `persist`: `true`/`false`/`1`/`0` (anything else keeps the default)
    /// - `storage_path`, `trace_file`: `~` is expanded to the home directory
    /// - Empty values are treated as missing
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use feedscope::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("base_url".to_string(), "https://example.com/feed".to_string());
    /// map.insert("persist".to_string(), "false".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.base_url, "https://example.com/feed");
    /// assert!(!config.persist);
    /// assert_eq!(config.namespace, "feed-filters");
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let persist = match get("persist") {
            Some("true" | "1") => true,
            Some("false" | "0") => false,
            _ => defaults.persist,
        };

        Self {
            base_url: get("base_url").map_or(defaults.base_url, String::from),
            storage_path: get("storage_path").map(infrastructure::expand_tilde),
            persist,
            namespace: get("namespace").map_or(defaults.namespace, String::from),
            trace_level: get("trace_level").map(String::from),
            trace_file: get("trace_file").map(infrastructure::expand_tilde),
        }
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)?;
        config.storage_path = config
            .storage_path
            .map(|p| infrastructure::expand_tilde(&p.to_string_lossy()));
        config.trace_file = config
            .trace_file
            .map(|p| infrastructure::expand_tilde(&p.to_string_lossy()));
        tracing::debug!(path = ?path, "loaded configuration file");
        Ok(config)
    }

    /// The preference file to use, falling back to the platform data directory.
    #[must_use]
    pub fn resolved_storage_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(infrastructure::default_storage_path)
    }
}

/// Opens the configured preference backend.
///
/// With persistence disabled, or when the JSON file cannot be opened, an
/// in-memory backend is returned so the session still works.
#[must_use]
pub fn open_storage(config: &Config) -> Box<dyn PreferenceStorage> {
    if !config.persist {
        return Box::new(MemoryStorage::new());
    }

    let path = config.resolved_storage_path();
    match JsonStorage::new(path.clone()) {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "preference storage unavailable, keeping preferences in memory");
            Box::new(MemoryStorage::new())
        }
    }
}

/// Starts a feed session for a view currently showing `href`.
///
/// # Errors
///
/// Returns an error if `config.base_url` is not a valid URL.
///
/// # Example
///
/// ```rust
/// use feedscope::{initialize, Config};
///
/// let config = Config {
///     persist: false,
///     ..Default::default()
/// };
/// let session = initialize(&config, "http://localhost/feed?sort=popular")?;
/// assert!(!session.state().has_active_filters());
/// # Ok::<(), feedscope::FeedscopeError>(())
/// ```
pub fn initialize(config: &Config, href: &str) -> Result<FeedSession> {
    tracing::debug!("initializing feedscope session");
    FeedSession::start(config, open_storage(config), href)
}
