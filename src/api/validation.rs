//! Request body validation for the processing endpoints.
//!
//! Bodies are checked field by field against the envelope contract and every
//! violation is reported, so a client fixes its request in one round trip.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde_json::Value;

use super::types::ApiError;
use crate::types::Input;

/// Top-level keys accepted in a request body.
const ALLOWED_FIELDS: &[&str] = &["sessionId", "input", "meta"];

/// `meta` keys that must be strings when present. Other keys pass through.
const STRING_META_FIELDS: &[&str] = &["userId", "sourceFile"];

/// Extractor yielding a validated [`Input`].
///
/// Rejects with `400 {error: "Invalid input", details: [...]}`.
#[derive(Debug)]
pub struct ValidInput(pub Input);

#[async_trait]
impl<S> FromRequest<S> for ValidInput
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(vec![rejection.body_text()]))?;

        validate_input(&body).map(ValidInput).map_err(|details| {
            tracing::debug!("Rejected request body: {:?}", details);
            ApiError::Validation(details)
        })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate a JSON body and convert it to an [`Input`].
///
/// Returns one message per violation, each naming the offending field.
pub fn validate_input(body: &Value) -> Result<Input, Vec<String>> {
    let Some(fields) = body.as_object() else {
        return Err(vec![format!(
            "\"value\" must be of type object, got {}",
            type_name(body)
        )]);
    };

    let mut details = Vec::new();

    match fields.get("sessionId") {
        None => details.push("\"sessionId\" is required".to_string()),
        Some(Value::String(s)) if s.is_empty() => {
            details.push("\"sessionId\" is not allowed to be empty".to_string())
        }
        Some(Value::String(_)) => {}
        Some(_) => details.push("\"sessionId\" must be a string".to_string()),
    }

    match fields.get("input") {
        None => details.push("\"input\" is required".to_string()),
        Some(Value::String(_)) | Some(Value::Object(_)) => {}
        Some(_) => details.push("\"input\" must be one of [string, object]".to_string()),
    }

    match fields.get("meta") {
        None => {}
        Some(Value::Object(meta)) => {
            for key in STRING_META_FIELDS {
                if meta.get(*key).is_some_and(|v| !v.is_string()) {
                    details.push(format!("\"meta.{}\" must be a string", key));
                }
            }
        }
        Some(_) => details.push("\"meta\" must be of type object".to_string()),
    }

    for key in fields.keys() {
        if !ALLOWED_FIELDS.contains(&key.as_str()) {
            details.push(format!("\"{}\" is not allowed", key));
        }
    }

    if !details.is_empty() {
        return Err(details);
    }

    serde_json::from_value(body.clone()).map_err(|e| vec![e.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Payload;
    use serde_json::json;

    #[test]
    fn accepts_text_input() {
        let input = validate_input(&json!({ "sessionId": "test-123", "input": "test input" }))
            .unwrap();
        assert_eq!(input.session_id, "test-123");
        assert_eq!(input.payload, Payload::text("test input"));
        assert!(input.meta.is_none());
    }

    #[test]
    fn accepts_object_input_and_open_meta() {
        let input = validate_input(&json!({
            "sessionId": "test-123",
            "input": { "data": "test" },
            "meta": { "userId": "user123", "sourceFile": "test.txt", "customField": "value" }
        }))
        .unwrap();
        assert!(matches!(input.payload, Payload::Structured(_)));
        assert_eq!(input.meta_value("customField"), Some(&json!("value")));
    }

    #[test]
    fn missing_session_id_is_named() {
        let details = validate_input(&json!({ "input": "test input" })).unwrap_err();
        assert_eq!(details, vec!["\"sessionId\" is required".to_string()]);
    }

    #[test]
    fn missing_input_is_named() {
        let details = validate_input(&json!({ "sessionId": "test-123" })).unwrap_err();
        assert_eq!(details, vec!["\"input\" is required".to_string()]);
    }

    #[test]
    fn numeric_and_null_input_rejected() {
        for input in [json!(123), json!(null), json!(["a"])] {
            let details =
                validate_input(&json!({ "sessionId": "s", "input": input })).unwrap_err();
            assert_eq!(details, vec!["\"input\" must be one of [string, object]".to_string()]);
        }
    }

    #[test]
    fn reports_every_violation() {
        let details = validate_input(&json!({
            "sessionId": "",
            "input": 1,
            "meta": { "userId": 7, "sourceFile": false },
            "extra": true
        }))
        .unwrap_err();

        assert_eq!(details.len(), 5);
        assert!(details[0].contains("sessionId"));
        assert!(details[1].contains("input"));
        assert!(details[2].contains("meta.userId"));
        assert!(details[3].contains("meta.sourceFile"));
        assert!(details[4].contains("extra"));
    }

    #[test]
    fn non_object_meta_and_body_rejected() {
        let details =
            validate_input(&json!({ "sessionId": "s", "input": "x", "meta": "m" })).unwrap_err();
        assert_eq!(details, vec!["\"meta\" must be of type object".to_string()]);

        let details = validate_input(&json!("just a string")).unwrap_err();
        assert!(details[0].contains("must be of type object"));
    }
}
