//! Defensive decoding of structured model output
//!
//! Models asked for JSON frequently wrap it in markdown fences or pad it
//! with prose. Decoding here is total: malformed text becomes a recoverable
//! [`Error`], never a panic, so a bad model turn cannot take down the
//! orchestration pipeline.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;

/// Extract the JSON payload from raw model text.
///
/// Strips a surrounding ```` ```json ```` / ```` ``` ```` fence if present,
/// otherwise trims and returns the text as-is. Falls back to the first
/// `{`..`}` span when the model padded the object with prose.
#[must_use]
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        // Skip an optional language tag on the fence line
        let body = match rest.split_once('\n') {
            Some((_, body)) => body,
            None => rest,
        };
        if let Some(inner) = body.rsplit_once("```") {
            return inner.0.trim();
        }
        return body.trim();
    }

    if !trimmed.starts_with('{') {
        if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
            if start < end {
                return &trimmed[start..=end];
            }
        }
    }

    trimmed
}

/// Decode model text into a typed structured-output contract.
///
/// Distinguishes "not JSON at all" ([`Error::InvalidResponse`]) from
/// "JSON that misses required fields" ([`Error::SchemaValidation`]).
pub fn decode_structured<T: DeserializeOwned>(text: &str) -> Result<T> {
    let payload = extract_json(text);
    if payload.is_empty() {
        return Err(Error::InvalidResponse("empty response text".to_string()));
    }

    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| Error::InvalidResponse(format!("not valid JSON: {e}")))?;

    serde_json::from_value(value).map_err(|e| Error::SchemaValidation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Combo {
        result_name: String,
        emoji: String,
    }

    #[test]
    fn test_decode_bare_json() {
        let combo: Combo =
            decode_structured(r#"{"result_name": "Idli Batter", "emoji": "🥣"}"#).unwrap();
        assert_eq!(combo.result_name, "Idli Batter");
        assert_eq!(combo.emoji, "🥣");
    }

    #[test]
    fn test_decode_fenced_json() {
        let text = "```json\n{\"result_name\": \"Sambar\", \"emoji\": \"🍲\"}\n```";
        let combo: Combo = decode_structured(text).unwrap();
        assert_eq!(combo.result_name, "Sambar");
    }

    #[test]
    fn test_decode_json_with_prose() {
        let text = "Here you go: {\"result_name\": \"Chutney\", \"emoji\": \"🥥\"} enjoy!";
        let combo: Combo = decode_structured(text).unwrap();
        assert_eq!(combo.result_name, "Chutney");
    }

    #[test]
    fn test_decode_not_json() {
        let err = decode_structured::<Combo>("I cannot answer that").unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn test_decode_missing_field() {
        let err = decode_structured::<Combo>(r#"{"result_name": "Rasam"}"#).unwrap_err();
        assert!(matches!(err, Error::SchemaValidation(_)));
    }

    #[test]
    fn test_decode_empty() {
        let err = decode_structured::<Combo>("   ").unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }
}
