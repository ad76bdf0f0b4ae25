//! Content items consumed by the filter layer.
//!
//! A [`ContentItem`] is the generic shape of anything a feed lists: regular
//! posts, pulse polls, spotlights and events. The backend that produces them is
//! not modelled here; the filter layer only needs the fields it matches and
//! sorts on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::filter::ContentClass;

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// Kind of a feed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    #[default]
    Post,
    PulsePoll,
    Spotlight,
    Event,
}

impl ContentKind {
    /// The toggleable content class this kind belongs to, `None` for plain posts.
    #[must_use]
    pub const fn class(self) -> Option<ContentClass> {
        match self {
            Self::Post => None,
            Self::PulsePoll => Some(ContentClass::PulsePolls),
            Self::Spotlight => Some(ContentClass::Spotlights),
            Self::Event => Some(ContentClass::Events),
        }
    }
}

/// One entry of a feed.
///
/// # Fields
///
/// - `platforms`, `subtypes`, `categories`: facet values the item is tagged with
/// - `likes`, `comments`, `views`: engagement counters used for popular/trending order
/// - `read`, `saved`: per-viewer flags used by the hide-read and saved-only filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub kind: ContentKind,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub subtypes: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub views: u32,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub saved: bool,
}

impl ContentItem {
    /// Creates an untagged post with zero engagement.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: String::new(),
            kind: ContentKind::Post,
            platforms: Vec::new(),
            subtypes: Vec::new(),
            categories: Vec::new(),
            created_at,
            likes: 0,
            comments: 0,
            views: 0,
            read: false,
            saved: false,
        }
    }

    /// Likes plus comments.
    #[must_use]
    pub const fn engagement(&self) -> u64 {
        self.likes as u64 + self.comments as u64
    }

    /// Returns a short relative age such as `"5m ago"`.
    ///
    /// - Less than 1 minute: "just now"
    /// - Less than 1 hour: "Xm ago"
    /// - Less than 1 day: "Xh ago"
    /// - Otherwise: "Xd ago"
    #[must_use]
    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        let diff = (now - self.created_at).num_seconds();

        if diff < SECONDS_PER_MINUTE {
            "just now".to_string()
        } else if diff < SECONDS_PER_HOUR {
            format!("{}m ago", diff / SECONDS_PER_MINUTE)
        } else if diff < SECONDS_PER_DAY {
            format!("{}h ago", diff / SECONDS_PER_HOUR)
        } else {
            format!("{}d ago", diff / SECONDS_PER_DAY)
        }
    }
}
