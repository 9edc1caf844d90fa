//! The tourism text file: `###` headings followed by free-form descriptions.

use std::path::Path;

use tourguide_common::CollaboratorError;
use tracing::info;

use crate::places::PlaceMatcher;

const WHAT: &str = "tourism data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub name: String,
    pub description: String,
}

/// Places in file order, with a matcher over their names.
#[derive(Debug, Clone, Default)]
pub struct TourismData {
    places: Vec<Place>,
    matcher: PlaceMatcher,
}

impl TourismData {
    /// Parse the data file format.
    ///
    /// A line starting with `###` opens a place named by the rest of the
    /// line. Lines before the first heading are ignored. A repeated heading
    /// starts that place's description over but keeps its first position.
    pub fn parse(raw: &str) -> Self {
        let mut places: Vec<Place> = Vec::new();
        let mut current: Option<usize> = None;

        for line in raw.lines() {
            let line = line.trim();
            if let Some(heading) = line.strip_prefix("###") {
                let name = heading.trim_start_matches('#').trim().to_string();
                let idx = match places.iter().position(|p| p.name == name) {
                    Some(idx) => {
                        places[idx].description.clear();
                        idx
                    }
                    None => {
                        places.push(Place {
                            name,
                            description: String::new(),
                        });
                        places.len() - 1
                    }
                };
                current = Some(idx);
            } else if let Some(idx) = current {
                let desc = &mut places[idx].description;
                desc.push_str(line);
                desc.push('\n');
            }
        }

        for place in &mut places {
            let trimmed = place.description.trim().to_string();
            place.description = trimmed;
        }

        let matcher = PlaceMatcher::new(places.iter().map(|p| p.name.clone()));
        Self { places, matcher }
    }

    pub fn load(path: &Path) -> Result<Self, CollaboratorError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CollaboratorError::unavailable(WHAT, path, e))?;
        let data = Self::parse(&raw);
        info!(path = %path.display(), places = data.len(), "Loaded tourism data");
        Ok(data)
    }

    /// The first place (in file order) mentioned in `user_text`.
    pub fn lookup_place(&self, user_text: &str) -> Option<&Place> {
        let name = self.matcher.find(user_text)?;
        self.places.iter().find(|p| p.name == name)
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        let name = self.matcher.canonical(name)?;
        self.places
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.description.as_str())
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}
