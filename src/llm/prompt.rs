//! Helpers for putting untrusted text into prompts.

/// Strip control characters other than newline and tab.
///
/// Commit messages and file names end up verbatim in prompts; escape
/// sequences and NULs have no business there.
pub fn sanitize_for_prompt(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Truncate to at most `max_bytes`, backing off to a char boundary.
pub fn truncate_utf8(input: &str, max_bytes: usize) -> &str {
    if input.len() <= max_bytes {
        return input;
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    &input[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_control_chars() {
        assert_eq!(
            sanitize_for_prompt("fix:\u{1b}[31m red\u{0}\nnext\tline"),
            "fix:[31m red\nnext\tline"
        );
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_utf8("abcdef", 3), "abc");
        assert_eq!(truncate_utf8("abc", 10), "abc");
    }

    #[test]
    fn test_truncate_multibyte_boundary() {
        // 'é' is two bytes; byte 2 falls inside it.
        assert_eq!(truncate_utf8("aé", 2), "a");
        let cjk = format!("{}中文", "a".repeat(499));
        assert_eq!(truncate_utf8(&cjk, 500).len(), 499);
    }
}
