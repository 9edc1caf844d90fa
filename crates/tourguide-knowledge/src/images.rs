//! Place → image URL index loaded from a JSON object.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tourguide_common::CollaboratorError;
use tracing::{info, warn};

use crate::places::PlaceMatcher;

const WHAT: &str = "image index";

#[derive(Debug, Clone, Default)]
pub struct ImageIndex {
    urls: HashMap<String, Vec<String>>,
    matcher: PlaceMatcher,
}

impl ImageIndex {
    /// Parse `{"Place": ["url", ...], ...}`, keeping file order. Non-string
    /// entries are skipped.
    pub fn parse(json: &str) -> Result<Self, CollaboratorError> {
        let value: Value = serde_json::from_str(json).map_err(|e| CollaboratorError::Malformed {
            what: WHAT,
            reason: e.to_string(),
        })?;
        let Value::Object(map) = value else {
            return Err(CollaboratorError::Malformed {
                what: WHAT,
                reason: "top level must be an object".into(),
            });
        };

        let mut names = Vec::with_capacity(map.len());
        let mut urls = HashMap::with_capacity(map.len());
        for (place, entry) in map {
            let list: Vec<String> = match entry {
                Value::Array(items) => items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) if !s.trim().is_empty() => Some(s),
                        _ => None,
                    })
                    .collect(),
                Value::String(s) => vec![s],
                other => {
                    warn!(place = %place, kind = ?other, "Skipping image entry that is not a list");
                    continue;
                }
            };
            names.push(place.clone());
            urls.insert(place, list);
        }

        Ok(Self {
            urls,
            matcher: PlaceMatcher::new(names),
        })
    }

    pub fn load(path: &Path) -> Result<Self, CollaboratorError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CollaboratorError::unavailable(WHAT, path, e))?;
        let index = Self::parse(&raw)?;
        info!(path = %path.display(), places = index.len(), "Loaded image index");
        Ok(index)
    }

    /// URLs for a place, matching its name regardless of case and accents.
    pub fn images_for(&self, place: &str) -> &[String] {
        if let Some(list) = self.urls.get(place) {
            return list;
        }
        self.matcher
            .canonical(place)
            .and_then(|name| self.urls.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The first indexed place mentioned in `user_text`.
    pub fn lookup_place(&self, user_text: &str) -> Option<&str> {
        self.matcher.find(user_text)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
