//! Query-string encoding and decoding of [`FilterState`].
//!
//! Encoding emits only non-default values, so the default state produces an
//! empty query. Multi-value facets use one repeated key per value. Decoding
//! never fails: unknown keys and unknown enum tokens are skipped, and a query
//! that is not well-formed percent-encoded UTF-8 decodes as empty.

use crate::domain::{ContentClass, FilterMode, FilterPatch, FilterState, SortBy, SortDirection, TimeRange, ViewMode};
use url::{form_urlencoded, Url};

pub const PLATFORM: &str = "platform";
pub const PLATFORM_MODE: &str = "platformMode";
pub const SUBTYPE: &str = "subtype";
pub const SUBTYPE_MODE: &str = "subtypeMode";
pub const CATEGORY: &str = "category";
pub const SEARCH: &str = "q";
pub const SORT: &str = "sort";
pub const DIRECTION: &str = "dir";
pub const TIME: &str = "time";
pub const VIEW: &str = "view";
pub const POLLS: &str = "polls";
pub const SPOTLIGHTS: &str = "spotlights";
pub const EVENTS: &str = "events";
pub const HIDE_READ: &str = "hideRead";
pub const SAVED: &str = "saved";

const TRUE_TOKEN: &str = "1";
const FALSE_TOKEN: &str = "0";

/// Used to resolve relative hrefs such as `/feed?sort=popular`.
const RELATIVE_BASE: &str = "http://localhost/";

/// Serializes `state` into a query string without the leading `?`.
///
/// # Example
///
/// ```
/// use feedscope::app::FilterStore;
/// use feedscope::codec::encode;
///
/// let mut store = FilterStore::new();
/// store.add_platform("VRChat");
/// store.set_search_query("  avatar ");
/// assert_eq!(encode(store.state()), "platform=VRChat&q=avatar");
/// assert_eq!(encode(&Default::default()), "");
/// ```
#[must_use]
pub fn encode(state: &FilterState) -> String {
    let defaults = FilterState::default();
    let mut out = form_urlencoded::Serializer::new(String::new());

    encode_facet(&mut out, PLATFORM, PLATFORM_MODE, state.selected_platforms(), state.platform_filter_mode());
    encode_facet(&mut out, SUBTYPE, SUBTYPE_MODE, state.selected_subtypes(), state.subtype_filter_mode());
    for category in state.selected_categories() {
        out.append_pair(CATEGORY, category);
    }

    let query = state.trimmed_query();
    if !query.is_empty() {
        out.append_pair(SEARCH, query);
    }

    if state.sort_by() != defaults.sort_by() {
        out.append_pair(SORT, state.sort_by().token());
    }
    if state.sort_direction() != defaults.sort_direction() {
        out.append_pair(DIRECTION, state.sort_direction().token());
    }
    if state.time_range() != defaults.time_range() {
        out.append_pair(TIME, state.time_range().token());
    }
    if state.view_mode() != defaults.view_mode() {
        out.append_pair(VIEW, state.view_mode().token());
    }

    // Content classes default to shown, the viewer flags default to off.
    if !state.shows(ContentClass::PulsePolls) {
        out.append_pair(POLLS, FALSE_TOKEN);
    }
    if !state.shows(ContentClass::Spotlights) {
        out.append_pair(SPOTLIGHTS, FALSE_TOKEN);
    }
    if !state.shows(ContentClass::Events) {
        out.append_pair(EVENTS, FALSE_TOKEN);
    }
    if state.hide_read_posts() {
        out.append_pair(HIDE_READ, TRUE_TOKEN);
    }
    if state.only_show_saved_posts() {
        out.append_pair(SAVED, TRUE_TOKEN);
    }

    out.finish()
}

fn encode_facet<'a>(
    out: &mut form_urlencoded::Serializer<'_, String>,
    key: &str,
    mode_key: &str,
    values: impl IntoIterator<Item = &'a String>,
    mode: FilterMode,
) {
    let mut any = false;
    for value in values {
        out.append_pair(key, value);
        any = true;
    }
    if any && mode != FilterMode::default() {
        out.append_pair(mode_key, mode.token());
    }
}

/// Parses a query string (with or without the leading `?`) into a sparse patch.
///
/// Scalar keys are last-wins. Repeated facet keys are returned in encounter
/// order with duplicates kept.
#[must_use]
pub fn decode(query: &str) -> FilterPatch {
    let query = query.strip_prefix('?').unwrap_or(query);
    let _span = tracing::debug_span!("decode_query", query_len = query.len()).entered();

    let mut patch = FilterPatch::default();
    if query.is_empty() {
        return patch;
    }
    if !is_well_formed(query) {
        tracing::debug!("malformed query string, treating as empty");
        return patch;
    }

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value: &str = &value;
        match &*key {
            PLATFORM => patch.platforms.push(value.to_string()),
            SUBTYPE => patch.subtypes.push(value.to_string()),
            CATEGORY => patch.categories.push(value.to_string()),
            PLATFORM_MODE => assign(&mut patch.platform_mode, FilterMode::from_token(value), &key),
            SUBTYPE_MODE => assign(&mut patch.subtype_mode, FilterMode::from_token(value), &key),
            SEARCH => patch.search_query = Some(value.to_string()),
            SORT => assign(&mut patch.sort_by, SortBy::from_token(value), &key),
            DIRECTION => assign(&mut patch.sort_direction, SortDirection::from_token(value), &key),
            TIME => assign(&mut patch.time_range, TimeRange::from_token(value), &key),
            VIEW => assign(&mut patch.view_mode, ViewMode::from_token(value), &key),
            POLLS => assign(&mut patch.show_pulse_polls, parse_flag(value), &key),
            SPOTLIGHTS => assign(&mut patch.show_spotlights, parse_flag(value), &key),
            EVENTS => assign(&mut patch.show_events, parse_flag(value), &key),
            HIDE_READ => assign(&mut patch.hide_read_posts, parse_flag(value), &key),
            SAVED => assign(&mut patch.only_show_saved_posts, parse_flag(value), &key),
            other => tracing::trace!(key = %other, "ignoring unknown query key"),
        }
    }

    patch
}

/// Decodes the query component of a full or relative href.
///
/// An href that cannot be parsed at all yields an empty patch.
#[must_use]
pub fn decode_href(href: &str) -> FilterPatch {
    match parse_href(href) {
        Some(url) => decode(url.query().unwrap_or_default()),
        None => {
            tracing::debug!(href = %href, "unparseable href, treating as empty query");
            FilterPatch::default()
        }
    }
}

/// Parses an absolute href, or a relative one against a placeholder origin.
fn parse_href(href: &str) -> Option<Url> {
    match Url::parse(href) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)
            .and_then(|base| base.join(href))
            .ok(),
        Err(_) => None,
    }
}

fn assign<T>(slot: &mut Option<T>, parsed: Option<T>, key: &str) {
    match parsed {
        Some(value) => *slot = Some(value),
        None => tracing::debug!(key = %key, "ignoring unrecognized value"),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        TRUE_TOKEN => Some(true),
        FALSE_TOKEN => Some(false),
        _ => None,
    }
}

/// Checks that every `%` escape is complete and the decoded bytes are UTF-8.
fn is_well_formed(query: &str) -> bool {
    let bytes = query.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let Some(byte) = bytes
                .get(i + 1..i + 3)
                .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                .and_then(|hex| std::str::from_utf8(hex).ok())
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            else {
                return false;
            };
            decoded.push(byte);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    std::str::from_utf8(&decoded).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FilterStore;

    #[test]
    fn test_default_state_encodes_empty() {
        assert_eq!(encode(&FilterState::default()), "");
    }

    #[test]
    fn test_shareable_link_scenario() {
        let mut store = FilterStore::new();
        store.add_platform("VRChat");
        store.add_platform("Roblox");
        store.set_search_query("avatar");
        store.set_sort_by(SortBy::Popular);

        let query = encode(store.state());
        assert_eq!(query, "platform=VRChat&platform=Roblox&q=avatar&sort=popular");

        let patch = decode(&query);
        assert_eq!(patch.platforms, vec!["VRChat", "Roblox"]);
        assert_eq!(patch.search_query.as_deref(), Some("avatar"));
        assert_eq!(patch.sort_by, Some(SortBy::Popular));
        assert_eq!(patch.time_range, None);
    }

    #[test]
    fn test_mode_omitted_for_empty_facet() {
        let mut store = FilterStore::new();
        store.set_platform_mode(FilterMode::All);
        assert!(!encode(store.state()).contains(PLATFORM_MODE));

        store.add_platform("Roblox");
        assert_eq!(encode(store.state()), "platform=Roblox&platformMode=all");
    }

    #[test]
    fn test_boolean_tokens() {
        let mut store = FilterStore::new();
        store.set_show_events(false);
        store.set_hide_read_posts(true);
        store.set_only_show_saved_posts(true);
        assert_eq!(encode(store.state()), "events=0&hideRead=1&saved=1");

        let patch = decode("events=0&hideRead=1&saved=1&polls=yes");
        assert_eq!(patch.show_events, Some(false));
        assert_eq!(patch.hide_read_posts, Some(true));
        assert_eq!(patch.only_show_saved_posts, Some(true));
        assert_eq!(patch.show_pulse_polls, None);
    }

    #[test]
    fn test_whitespace_query_is_omitted() {
        let mut store = FilterStore::new();
        store.set_search_query("   ");
        assert_eq!(encode(store.state()), "");
    }

    #[test]
    fn test_values_with_delimiters_survive() {
        let mut store = FilterStore::new();
        store.add_category("art, music & more");
        store.set_search_query("a=b&c");
        let patch = decode(&encode(store.state()));
        assert_eq!(patch.categories, vec!["art, music & more"]);
        assert_eq!(patch.search_query.as_deref(), Some("a=b&c"));
    }

    #[test]
    fn test_unknown_enum_tokens_ignored() {
        let patch = decode("?sort=bogus&time=1y&view=grid&dir=up&platformMode=some");
        assert!(patch.is_empty());
    }

    #[test]
    fn test_duplicates_kept_in_patch() {
        let patch = decode("platform=A&platform=B&platform=A");
        assert_eq!(patch.platforms, vec!["A", "B", "A"]);
    }

    #[test]
    fn test_malformed_percent_encoding_is_empty() {
        assert!(decode("platform=VRChat&q=%zz").is_empty());
        assert!(decode("q=%FF%FE").is_empty());
        assert!(decode("q=50%").is_empty());
        assert!(decode("q=%+F").is_empty());
        assert!(decode("sort=popular&q=%-1").is_empty());
    }

    #[test]
    fn test_decode_href_variants() {
        let patch = decode_href("https://example.com/feed?sort=trending#top");
        assert_eq!(patch.sort_by, Some(SortBy::Trending));

        let patch = decode_href("/feed?view=list");
        assert_eq!(patch.view_mode, Some(ViewMode::List));

        assert!(decode_href("http://[::1").is_empty());
    }
}
