//! Substring matching of known place names inside free-form text.

use crate::normalize::normalize;

/// Known place names with their normalized forms, in priority order.
#[derive(Debug, Clone, Default)]
pub struct PlaceMatcher {
    entries: Vec<(String, String)>,
}

impl PlaceMatcher {
    /// Names that normalize to nothing are skipped; they would match any text.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = names
            .into_iter()
            .map(Into::into)
            .filter_map(|name: String| {
                let key = normalize(&name);
                (!key.is_empty()).then_some((name, key))
            })
            .collect();
        Self { entries }
    }

    /// The first known name whose normalized form occurs in `text`.
    pub fn find(&self, text: &str) -> Option<&str> {
        let haystack = normalize(text);
        if haystack.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(_, key)| haystack.contains(key.as_str()))
            .map(|(name, _)| name.as_str())
    }

    /// Resolve a name given in any casing or accenting to its canonical form.
    pub fn canonical(&self, name: &str) -> Option<&str> {
        let key = normalize(name);
        self.entries
            .iter()
            .find(|(_, k)| *k == key)
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
