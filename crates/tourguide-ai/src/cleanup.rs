//! Cosmetic answer cleanup.

/// Remove configured literal artifacts (e.g. promotional links a provider
/// appends) and trim surrounding whitespace.
pub fn clean_answer(text: &str, artifacts: &[String]) -> String {
    let mut cleaned = text.to_string();
    for artifact in artifacts.iter().filter(|a| !a.is_empty()) {
        if cleaned.contains(artifact.as_str()) {
            cleaned = cleaned.replace(artifact.as_str(), "");
        }
    }
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_configured_artifacts() {
        let artifacts = vec!["[Xem thêm tại example.com](https://example.com)".to_string()];
        let text = "Núi Bà Đen rất đẹp.\n\n[Xem thêm tại example.com](https://example.com)";
        assert_eq!(clean_answer(text, &artifacts), "Núi Bà Đen rất đẹp.");
    }

    #[test]
    fn empty_artifact_list_only_trims() {
        assert_eq!(clean_answer("  chào \n", &[]), "chào");
    }

    #[test]
    fn blank_artifacts_are_ignored() {
        assert_eq!(clean_answer("abc", &[String::new()]), "abc");
    }
}
