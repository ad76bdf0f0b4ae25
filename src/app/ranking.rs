//! Trending score calculation.
//!
//! Trending order ranks content by engagement that decays with age, so a post
//! with a burst of recent activity outranks an older post with more total
//! engagement. The decay has a half-life of 24 hours.

use crate::domain::ContentItem;
use chrono::{DateTime, Utc};

/// Hours after which an item's engagement counts for half.
const HALF_LIFE_HOURS: f64 = 24.0;

/// Number of seconds per hour for time conversion.
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Comments are worth more than likes, views much less.
const COMMENT_WEIGHT: f64 = 2.0;
const VIEW_WEIGHT: f64 = 0.1;

/// Calculates the trending score of `item` at `now`.
///
/// ```text
/// score = (likes + 2 × comments + 0.1 × views) × 0.5^(age_hours / HALF_LIFE_HOURS)
/// ```
///
/// Items dated in the future are treated as brand new.
#[must_use]
pub fn trending_score(item: &ContentItem, now: DateTime<Utc>) -> f64 {
    let weighted = f64::from(item.likes)
        + COMMENT_WEIGHT * f64::from(item.comments)
        + VIEW_WEIGHT * f64::from(item.views);

    #[allow(clippy::cast_precision_loss)]
    let age_hours = (now - item.created_at).num_seconds().max(0) as f64 / SECONDS_PER_HOUR;

    weighted * 0.5_f64.powf(age_hours / HALF_LIFE_HOURS)
}
