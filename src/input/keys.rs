//! Recognized key identifiers

use std::collections::HashSet;

/// Named keys tracked by default, using DOM `KeyboardEvent.key` spelling
const NAMED_KEYS: &[&str] = &[
    " ",
    "Enter",
    "Escape",
    "Backspace",
    "Tab",
    "Delete",
    "Insert",
    "Home",
    "End",
    "PageUp",
    "PageDown",
    "ArrowUp",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "Shift",
    "Control",
    "Alt",
    "Meta",
    "CapsLock",
    "F1",
    "F2",
    "F3",
    "F4",
    "F5",
    "F6",
    "F7",
    "F8",
    "F9",
    "F10",
    "F11",
    "F12",
];

/// Punctuation produced by an unshifted US layout
const SYMBOL_KEYS: &[&str] = &[
    "-", "=", "[", "]", "\\", ";", "'", ",", ".", "/", "`",
];

/// Closed allow-list of key identifiers an input state will track
///
/// Matching is exact and case-sensitive: "a" and "A" are distinct entries,
/// and the space bar is the literal `" "`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidKeySet {
    keys: HashSet<String>,
}

impl ValidKeySet {
    /// Builds a set from arbitrary identifiers
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// An empty set; every key event will be ignored
    pub fn empty() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    /// Returns a copy of this set extended with `extra`
    pub fn with<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for ValidKeySet {
    /// Letters in both cases, digits, US punctuation and the common named keys
    fn default() -> Self {
        let letters = ('a'..='z').chain('A'..='Z').map(String::from);
        let digits = ('0'..='9').map(String::from);
        let named = NAMED_KEYS.iter().chain(SYMBOL_KEYS).map(|k| k.to_string());

        Self {
            keys: letters.chain(digits).chain(named).collect(),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for ValidKeySet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}
