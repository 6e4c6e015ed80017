//! Recovering a JSON object from model output.
//!
//! Even with a strict response format some servers wrap the object in a
//! markdown fence or prefix it with prose. Recovery strips a fence, tries
//! the whole text, then falls back to the widest `{ ... }` span.

use serde_json::{Map, Value};

use crate::ExtractError;

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (```json) up to the first newline.
    let body = match rest.find('\n') {
        Some(newline)
            if rest[..newline]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') =>
        {
            &rest[newline + 1..]
        }
        _ => return text,
    };
    body.strip_suffix("```")
        .map(|inner| inner.strip_suffix('\n').unwrap_or(inner))
        .unwrap_or(body)
        .trim()
}

/// Extract the first JSON object from `output`.
pub fn extract_json_object(output: &str) -> Result<Map<String, Value>, ExtractError> {
    let text = strip_code_fence(output.trim());

    if let Ok(Value::Object(object)) = serde_json::from_str(text) {
        return Ok(object);
    }

    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(ExtractError::NoJsonObject);
    };
    if end < start {
        return Err(ExtractError::NoJsonObject);
    }

    match serde_json::from_str(&text[start..=end])? {
        Value::Object(object) => Ok(object),
        _ => Err(ExtractError::NoJsonObject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_a_bare_object() {
        let object = extract_json_object(r#" {"primary_act": "ASSERT"} "#).unwrap();
        assert_eq!(object["primary_act"], "ASSERT");
    }

    #[test]
    fn it_strips_a_code_fence() {
        let output = "```json\n{\"acts\": []}\n```";
        let object = extract_json_object(output).unwrap();
        assert!(object["acts"].as_array().unwrap().is_empty());
    }

    #[test]
    fn it_finds_an_object_inside_prose() {
        let output = "Here is the analysis:\n{\"primary_act\": \"EXPRESS\", \"acts\": [{}]}\nHope this helps.";
        let object = extract_json_object(output).unwrap();
        assert_eq!(object["primary_act"], "EXPRESS");
    }

    #[test]
    fn it_rejects_output_without_an_object() {
        assert!(matches!(
            extract_json_object("I cannot help with that."),
            Err(ExtractError::NoJsonObject)
        ));
        assert!(matches!(
            extract_json_object("[1, 2, 3]"),
            Err(ExtractError::NoJsonObject)
        ));
        assert!(matches!(
            extract_json_object("} backwards {"),
            Err(ExtractError::NoJsonObject)
        ));
    }

    #[test]
    fn it_reports_a_malformed_span() {
        assert!(matches!(
            extract_json_object("result: {\"acts\": [}"),
            Err(ExtractError::Decode(_))
        ));
    }
}
