//! Keyword-based intent detection and topic carry-over.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Suggest,
    Info,
    Direction,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Suggest => "suggest",
            Intent::Info => "info",
            Intent::Direction => "direction",
            Intent::General => "general",
        }
    }

    pub fn from_topic(topic: &str) -> Option<Self> {
        match topic {
            "suggest" => Some(Intent::Suggest),
            "info" => Some(Intent::Info),
            "direction" => Some(Intent::Direction),
            "general" => Some(Intent::General),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const SUGGEST_KEYWORDS: &[&str] = &["đi đâu", "gợi ý", "địa điểm", "chơi gì"];
const INFO_KEYWORDS: &[&str] = &["lịch sử", "thông tin", "giới thiệu"];
const DIRECTION_KEYWORDS: &[&str] = &["đường", "chỉ đường", "tới sao"];
const CONTINUATIONS: &[&str] = &["đúng rồi", "tiếp", "có", "ok", "tiếp tục", "ừ", "uh"];

/// Keyword tables in priority order, normalized once.
static KEYWORDS: LazyLock<Vec<(Intent, Vec<String>)>> = LazyLock::new(|| {
    [
        (Intent::Suggest, SUGGEST_KEYWORDS),
        (Intent::Info, INFO_KEYWORDS),
        (Intent::Direction, DIRECTION_KEYWORDS),
    ]
    .into_iter()
    .map(|(intent, words)| (intent, words.iter().map(|w| normalize(w)).collect()))
    .collect()
});

static CONTINUATION_SET: LazyLock<Vec<String>> =
    LazyLock::new(|| CONTINUATIONS.iter().map(|w| normalize(w)).collect());

/// Keywords match on whole words of the normalized text.
fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    format!(" {haystack} ").contains(&format!(" {phrase} "))
}

pub fn detect_intent(text: &str) -> Intent {
    let norm = normalize(text);
    if norm.is_empty() {
        return Intent::General;
    }
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| contains_phrase(&norm, w)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::General)
}

/// Whether the message is a bare confirmation like "ok" or "tiếp tục".
pub fn is_continuation(text: &str) -> bool {
    let norm = normalize(text);
    !norm.is_empty() && CONTINUATION_SET.iter().any(|c| *c == norm)
}

/// A confirmation keeps the previous topic; anything else is detected afresh.
pub fn resolve_intent(text: &str, last: Option<Intent>) -> Intent {
    match last {
        Some(previous) if is_continuation(text) => previous,
        _ => detect_intent(text),
    }
}
