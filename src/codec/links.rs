//! Shareable links and single-facet deep links.

use super::query::encode;
use crate::domain::{FilterPatch, FilterState};
use url::Url;

/// A facet that can be deep-linked on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Platform,
    Subtype,
    Category,
}

/// Returns `base` with its query replaced by the encoding of `state`.
///
/// Path and fragment of `base` are kept. The default state yields a URL with
/// no query at all.
#[must_use]
pub fn share_url(base: &Url, state: &FilterState) -> Url {
    let mut url = base.clone();
    let query = encode(state);
    if query.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&query));
    }
    url
}

/// Builds a link showing every post tagged with one facet value.
///
/// # Example
///
/// ```
/// use feedscope::codec::{facet_link, Facet};
/// use url::Url;
///
/// let base = Url::parse("https://example.com/feed").unwrap();
/// let link = facet_link(&base, Facet::Platform, "VRChat");
/// assert_eq!(link.as_str(), "https://example.com/feed?platform=VRChat");
/// ```
#[must_use]
pub fn facet_link(base: &Url, facet: Facet, value: &str) -> Url {
    let mut patch = FilterPatch::default();
    let values = match facet {
        Facet::Platform => &mut patch.platforms,
        Facet::Subtype => &mut patch.subtypes,
        Facet::Category => &mut patch.categories,
    };
    values.push(value.to_string());
    share_url(base, &FilterState::from_patch(&patch))
}

#[must_use]
pub fn platform_link(base: &Url, platform: &str) -> Url {
    facet_link(base, Facet::Platform, platform)
}

#[must_use]
pub fn subtype_link(base: &Url, subtype: &str) -> Url {
    facet_link(base, Facet::Subtype, subtype)
}

#[must_use]
pub fn category_link(base: &Url, category: &str) -> Url {
    facet_link(base, Facet::Category, category)
}

/// Builds a link running a search from the default view.
#[must_use]
pub fn search_link(base: &Url, query: &str) -> Url {
    let patch = FilterPatch {
        search_query: Some(query.to_string()),
        ..FilterPatch::default()
    };
    share_url(base, &FilterState::from_patch(&patch))
}
