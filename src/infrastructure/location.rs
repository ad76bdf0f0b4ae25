//! The address bar, as seen by the sync layer.
//!
//! [`Location`] is the seam between the pure sync logic and whatever actually
//! displays URLs. [`MemoryLocation`] is an in-process implementation with a
//! history stack, used by the command-line front end and by tests.

/// Read and history-neutral write access to the current URL.
pub trait Location {
    /// The full current href.
    fn href(&self) -> String;

    /// Replaces the current history entry with `href`.
    fn replace(&mut self, href: &str);
}

/// A history stack of hrefs with a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryLocation {
    entries: Vec<String>,
    index: usize,
    replacements: usize,
}

impl MemoryLocation {
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            entries: vec![href.into()],
            index: 0,
            replacements: 0,
        }
    }

    /// Navigates to `href`, adding a history entry and dropping forward entries.
    pub fn push(&mut self, href: impl Into<String>) {
        self.entries.truncate(self.index + 1);
        self.entries.push(href.into());
        self.index = self.entries.len() - 1;
    }

    /// Moves one entry back, returning the href now shown.
    pub fn back(&mut self) -> Option<String> {
        self.index = self.index.checked_sub(1)?;
        Some(self.entries[self.index].clone())
    }

    /// Moves one entry forward, returning the href now shown.
    pub fn forward(&mut self) -> Option<String> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.entries[self.index].clone())
    }

    /// Number of history entries.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    /// Number of [`replace`](Location::replace) calls so far.
    #[must_use]
    pub const fn replacements(&self) -> usize {
        self.replacements
    }
}

impl Location for MemoryLocation {
    fn href(&self) -> String {
        self.entries[self.index].clone()
    }

    fn replace(&mut self, href: &str) {
        self.entries[self.index] = href.to_string();
        self.replacements += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_keeps_history_length() {
        let mut location = MemoryLocation::new("https://example.com/feed");
        location.replace("https://example.com/feed?sort=popular");
        assert_eq!(location.history_len(), 1);
        assert_eq!(location.replacements(), 1);
        assert_eq!(location.href(), "https://example.com/feed?sort=popular");
    }

    #[test]
    fn test_back_and_forward() {
        let mut location = MemoryLocation::new("/a");
        location.push("/b");
        location.push("/c");
        assert_eq!(location.back().as_deref(), Some("/b"));
        assert_eq!(location.back().as_deref(), Some("/a"));
        assert_eq!(location.back(), None);
        assert_eq!(location.forward().as_deref(), Some("/b"));

        location.push("/d");
        assert_eq!(location.forward(), None);
        assert_eq!(location.history_len(), 3);
    }
}
