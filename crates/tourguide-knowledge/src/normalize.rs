//! Text normalization for matching.

use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").expect("static regex must compile"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex must compile"));

/// Lowercase, transliterate to ASCII (dropping diacritics, `đ` → `d`),
/// replace punctuation with spaces and collapse whitespace.
pub fn normalize(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let folded = deunicode::deunicode(&text.to_lowercase()).to_lowercase();
    let cleaned = NON_WORD.replace_all(&folded, " ");
    WHITESPACE.replace_all(&cleaned, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_vietnamese_diacritics() {
        assert_eq!(normalize("Núi Bà Đen"), "nui ba den");
        assert_eq!(normalize("nui ba den"), "nui ba den");
        assert_eq!(normalize("ĐI NÚI BÀ ĐEN"), "di nui ba den");
    }

    #[test]
    fn punctuation_becomes_space() {
        assert_eq!(normalize("Tòa Thánh (Tây Ninh)!!"), "toa thanh tay ninh");
        assert_eq!(normalize("chùa Gò Kén, đẹp?"), "chua go ken dep");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize("  Hồ \t Dầu\n\nTiếng  "), "ho dau tieng");
    }

    #[test]
    fn empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("?!"), "");
    }
}
