//! Display helpers for long catalog text.

const ELLIPSIS: &str = "...";

/// Truncate `text` to at most `word_limit` words.
///
/// Words are split on literal spaces only, so runs of spaces produce empty
/// words and other whitespace is never a separator. Text at or below the
/// limit is returned unchanged; absent or empty text yields an empty string.
pub fn truncate(text: Option<&str>, word_limit: usize) -> String {
    let text = match text {
        Some(text) if !text.is_empty() => text,
        _ => return String::new(),
    };

    let words: Vec<&str> = text.split(' ').collect();
    if words.len() <= word_limit {
        return text.to_string();
    }

    format!("{}{}", words[..word_limit].join(" "), ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_missing_text() {
        assert_eq!(truncate(Some(""), 5), "");
        assert_eq!(truncate(None, 5), "");
    }

    #[test]
    fn cuts_after_limit() {
        assert_eq!(truncate(Some("a b c d e f"), 3), "a b c...");
    }

    #[test]
    fn keeps_text_within_limit() {
        assert_eq!(truncate(Some("a b c"), 3), "a b c");
        assert_eq!(truncate(Some("single"), 1), "single");
        assert_eq!(truncate(Some("a b"), 10), "a b");
    }

    #[test]
    fn splits_on_spaces_only() {
        // tabs and newlines are part of the word
        assert_eq!(truncate(Some("a\tb c\nd e"), 2), "a\tb c\nd...");
        // double spaces count an empty word
        assert_eq!(truncate(Some("a  b c"), 2), "a ...");
    }

    #[test]
    fn truncated_output_has_limit_words() {
        let text = "The quick brown fox jumps over the lazy dog";
        for limit in 1..9 {
            let out = truncate(Some(text), limit);
            let body = out.strip_suffix("...").expect("ellipsis");
            assert_eq!(body.split(' ').count(), limit);
            assert!(text.starts_with(body));
        }
        assert_eq!(truncate(Some(text), 9), text);
    }
}
