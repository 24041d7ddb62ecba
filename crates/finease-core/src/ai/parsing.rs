//! Parsing helpers for model replies
//!
//! Replies are handled in two stages:
//! 1. [`extract_json_payload`] strips an optional fenced code block
//!    (```` ```json ```` or bare ```` ``` ````). Pure string transform.
//! 2. [`parse_suggestions`] parses the payload as a JSON array of objects and
//!    fails closed on anything else. Items are not validated further: unknown
//!    `type` values, missing fields and extra keys pass through.

use crate::error::{Error, Result};
use crate::models::Suggestion;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Extract the JSON payload from a model reply
///
/// If the trimmed reply starts with a fence, the text between the opening
/// fence and the next closing fence is returned (trimmed). An unterminated
/// fence yields everything after the opening marker. Otherwise the trimmed
/// reply is returned unchanged.
pub fn extract_json_payload(content: &str) -> &str {
    let content = content.trim();

    let after_open = if let Some(rest) = content.strip_prefix(JSON_FENCE) {
        rest
    } else if let Some(rest) = content.strip_prefix(FENCE) {
        rest
    } else {
        return content;
    };

    let inner = match after_open.find(FENCE) {
        Some(end) => &after_open[..end],
        None => after_open,
    };
    inner.trim()
}

/// Parse a JSON array of suggestion objects
pub fn parse_suggestions(payload: &str) -> Result<Vec<Suggestion>> {
    serde_json::from_str(payload).map_err(|e| {
        let truncated = if payload.len() > 200 {
            let mut end = 200;
            while !payload.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &payload[..end])
        } else {
            payload.to_string()
        };
        Error::ModelCall(format!("Invalid suggestions JSON from AI: {} | Raw: {}", e, truncated))
    })
}

/// Both stages: extract the payload, then parse it
pub fn parse_suggestion_reply(content: &str) -> Result<Vec<Suggestion>> {
    parse_suggestions(extract_json_payload(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SuggestionType;

    const ARRAY: &str = r#"[{"type": "info", "title": "Cook at home", "details": "Dining is your top category."}]"#;

    #[test]
    fn test_extract_plain() {
        assert_eq!(extract_json_payload(&format!("  {}\n", ARRAY)), ARRAY);
    }

    #[test]
    fn test_extract_json_fence() {
        let reply = format!("```json\n{}\n```", ARRAY);
        assert_eq!(extract_json_payload(&reply), ARRAY);
    }

    #[test]
    fn test_extract_bare_fence() {
        let reply = format!("```\n{}\n```", ARRAY);
        assert_eq!(extract_json_payload(&reply), ARRAY);
    }

    #[test]
    fn test_extract_uses_first_fence_pair() {
        let reply = format!("```json\n{}\n```\nSome commentary\n```\nmore\n```", ARRAY);
        assert_eq!(extract_json_payload(&reply), ARRAY);
    }

    #[test]
    fn test_extract_unterminated_fence() {
        let reply = format!("```json\n{}", ARRAY);
        assert_eq!(extract_json_payload(&reply), ARRAY);
    }

    #[test]
    fn test_extract_leaves_mid_text_fence_alone() {
        let reply = format!("Here you go:\n```json\n{}\n```", ARRAY);
        assert_eq!(extract_json_payload(&reply), reply.trim());
    }

    #[test]
    fn test_parse_suggestions() {
        let result = parse_suggestions(ARRAY).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].kind, SuggestionType::Info);
        assert_eq!(result[0].title, "Cook at home");
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_suggestions("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_object() {
        let result = parse_suggestions(r#"{"type": "info", "title": "t", "details": "d"}"#);
        assert!(matches!(result, Err(Error::ModelCall(_))));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(parse_suggestions("[{\"type\": \"info\",").is_err());
        assert!(parse_suggestions("Sorry, I can't help with that.").is_err());
    }

    #[test]
    fn test_parse_passes_loose_items_through() {
        let payload = r#"[
            {"type": "info", "title": "ok", "details": "ok"},
            {"type": "tip", "title": "Save", "details": "Save 10%"},
            {"type": "Warning", "title": "Dining"},
            {"title": "No type", "details": "d", "category": "Food"}
        ]"#;

        let result = parse_suggestions(payload).unwrap();

        assert_eq!(result.len(), 4);
        assert_eq!(result[1].kind, SuggestionType::Other("tip".to_string()));
        assert_eq!(result[2].kind.as_str(), "Warning");
        assert_eq!(result[2].details, "");
        assert_eq!(result[3].kind, SuggestionType::Info);
        assert_eq!(result[3].extra["category"], "Food");
    }

    #[test]
    fn test_reply_with_loose_items_survives() {
        let reply = "```json\n[{\"type\": \"warning\", \"title\": \"Dining\"}]\n```";
        let result = parse_suggestion_reply(reply).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].kind, SuggestionType::Warning);
        assert_eq!(result[0].title, "Dining");
    }

    #[test]
    fn test_parse_rejects_non_object_items() {
        assert!(parse_suggestions(r#"["save more", 42]"#).is_err());
    }

    #[test]
    fn test_reply_with_text_around_fence_fails_closed() {
        let reply = format!("Here you go:\n```json\n{}\n```", ARRAY);
        assert!(parse_suggestion_reply(&reply).is_err());
    }

    #[test]
    fn test_reply_fenced() {
        let reply = format!("```json\n{}\n```", ARRAY);
        assert_eq!(parse_suggestion_reply(&reply).unwrap().len(), 1);
    }
}
