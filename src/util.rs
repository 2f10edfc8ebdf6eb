// src/util.rs — Shared utility functions

/// Truncate a string for display/logging (UTF-8 safe).
///
/// Returns a substring of at most `max_len` bytes, ensuring the cut
/// point falls on a valid UTF-8 character boundary.
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}

/// Extract the JSON payload from an LLM response.
///
/// Models asked for JSON frequently wrap it in markdown fences or lead with
/// prose. This strips ```json fences and falls back to the outermost
/// `{...}` or `[...]` span.
pub fn extract_json(response: &str) -> Option<&str> {
    let trimmed = response.trim();

    // Fenced block first: ```json ... ``` or plain ``` ... ```
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after_fence[body_start..];
        if let Some(end) = body.find("```") {
            let inner = body[..end].trim();
            if !inner.is_empty() {
                return Some(inner);
            }
        }
    }

    // Outermost object or array span
    let open = trimmed.find(['{', '['])?;
    let close_char = if trimmed.as_bytes()[open] == b'{' { '}' } else { ']' };
    let close = trimmed.rfind(close_char)?;
    if close > open {
        Some(trimmed[open..=close].trim())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_multibyte() {
        // "café" is 5 bytes (é = 2 bytes), truncating at 4 must not split é
        assert_eq!(truncate_str("café", 4), "caf");
    }

    #[test]
    fn test_truncate_empty() {
        assert_eq!(truncate_str("", 5), "");
    }

    #[test]
    fn test_extract_bare_json() {
        let out = extract_json(r#"{"role": "nurse"}"#).unwrap();
        assert_eq!(out, r#"{"role": "nurse"}"#);
    }

    #[test]
    fn test_extract_fenced_json() {
        let response = "Here you go:\n```json\n{\"role\": \"pilot\"}\n```\nDone.";
        assert_eq!(extract_json(response).unwrap(), "{\"role\": \"pilot\"}");
    }

    #[test]
    fn test_extract_fence_without_language_tag() {
        let response = "```\n[1, 2, 3]\n```";
        assert_eq!(extract_json(response).unwrap(), "[1, 2, 3]");
    }

    #[test]
    fn test_extract_json_with_leading_prose() {
        let response = "Sure! The extraction is {\"topic\": \"triage\"} as requested.";
        assert_eq!(extract_json(response).unwrap(), "{\"topic\": \"triage\"}");
    }

    #[test]
    fn test_extract_array() {
        let response = "Result: [{\"a\": 1}, {\"a\": 2}]";
        assert_eq!(extract_json(response).unwrap(), "[{\"a\": 1}, {\"a\": 2}]");
    }

    #[test]
    fn test_extract_no_json() {
        assert!(extract_json("no structured content here").is_none());
    }
}
