//! Display-language resolution for prompt construction.

/// Map a language code to the display-language name used in the prompt.
/// Unknown codes resolve to English; resolution never fails.
pub fn resolve_language(code: &str) -> &'static str {
    match code.to_lowercase().trim() {
        "vi" => "Vietnamese",
        "en" => "English",
        "fr" => "French",
        "zh" => "Chinese (Simplified)",
        "ja" => "Japanese",
        "ko" => "Korean",
        _ => "English",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(resolve_language("vi"), "Vietnamese");
        assert_eq!(resolve_language("fr"), "French");
        assert_eq!(resolve_language("zh"), "Chinese (Simplified)");
        assert_eq!(resolve_language("ko"), "Korean");
    }

    #[test]
    fn unknown_code_defaults_to_english() {
        assert_eq!(resolve_language("xx"), resolve_language("en"));
        assert_eq!(resolve_language(""), "English");
    }

    #[test]
    fn resolution_is_case_and_whitespace_tolerant() {
        assert_eq!(resolve_language("VI"), "Vietnamese");
        assert_eq!(resolve_language(" ja "), "Japanese");
    }
}
