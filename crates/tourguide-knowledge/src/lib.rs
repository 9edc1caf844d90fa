//! Local knowledge used to enrich answers.
//!
//! Everything here is a pure lookup over data loaded once at startup:
//! the tourism text file, the place → image URL index, and keyword-based
//! intent detection. Matching is done on normalized text (lowercase, no
//! diacritics, no punctuation), so "Núi Bà Đen" and "nui ba den" are the
//! same place.

pub mod images;
pub mod intent;
pub mod normalize;
pub mod places;
pub mod tourism;

pub use images::ImageIndex;
pub use intent::{detect_intent, is_continuation, resolve_intent, Intent};
pub use normalize::normalize;
pub use places::PlaceMatcher;
pub use tourism::{Place, TourismData};
