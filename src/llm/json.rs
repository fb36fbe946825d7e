//! Pulling a JSON object out of free-form provider output.
//!
//! Providers tend to wrap JSON in markdown fences or chat around it, even
//! when asked not to.

use serde::de::DeserializeOwned;

/// Extract the JSON object from a provider response.
///
/// Checks a ```` ```json ```` fence, then a bare fence whose body starts with
/// `{`, then the first `{` that opens a complete, valid object. Falls back to
/// the trimmed input so the caller's parse error shows what came back.
pub fn extract_json(response: &str) -> String {
    let trimmed = response.trim();

    if let Some(body) = fenced_block(trimmed, "```json") {
        return body.to_string();
    }

    if let Some(body) = fenced_block(trimmed, "```")
        && body.starts_with('{')
    {
        return body.to_string();
    }

    trimmed
        .match_indices('{')
        .find_map(|(idx, _)| {
            balanced_object(&trimmed[idx..])
                .filter(|candidate| serde_json::from_str::<serde_json::Value>(candidate).is_ok())
        })
        .unwrap_or(trimmed)
        .to_string()
}

/// Extract and deserialize a JSON object from a provider response.
pub fn parse_response<T: DeserializeOwned>(response: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(&extract_json(response))
}

fn fenced_block<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let len = text[start..].find("```")?;
    Some(text[start..start + len].trim())
}

/// The prefix of `text` (which starts at `{`) up to its matching `}`.
///
/// Braces inside string literals, including escaped quotes, are ignored.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }

    None
}
