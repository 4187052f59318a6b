//! Response schemas declared to the model and enforced on its replies.
//!
//! Schemas are generated from the typed results with `schemars`, sent as
//! Gemini's `generationConfig.responseJsonSchema`, and checked against the
//! parsed reply with `jsonschema` so a reply that skipped a required field
//! never reaches the typed layer.

use schemars::{schema_for, JsonSchema};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("response schema could not be compiled: {0}")]
    Compile(String),

    #[error("{}", .errors.join("; "))]
    Violation { errors: Vec<String> },
}

/// JSON Schema for `T`, without the `$schema` dialect marker.
pub fn schema_of<T: JsonSchema>() -> Value {
    let mut schema = schema_for!(T).to_value();
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
    }
    schema
}

/// Checks `instance` against `schema`. Every violation is reported, each
/// prefixed with the JSON pointer of the offending value.
pub fn validate(schema: &Value, instance: &Value) -> Result<(), SchemaError> {
    let validator =
        jsonschema::validator_for(schema).map_err(|e| SchemaError::Compile(e.to_string()))?;

    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| {
            let path = e.instance_path.to_string();
            if path.is_empty() {
                e.to_string()
            } else {
                format!("{path}: {e}")
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Violation { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Report {
        /// Total score out of 100
        score: f64,
        analysis: Section,
        suggestions: Vec<String>,
    }

    #[derive(Debug, Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Section {
        keywords: String,
        contact: String,
    }

    fn violations(instance: Value) -> Vec<String> {
        match validate(&schema_of::<Report>(), &instance) {
            Err(SchemaError::Violation { errors }) => errors,
            other => panic!("expected violations, got {other:?}"),
        }
    }

    #[test]
    fn test_schema_carries_fields_and_descriptions() {
        let schema = schema_of::<Report>();
        assert!(schema.get("$schema").is_none());
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["score"]["type"], "number");
        assert_eq!(
            schema["properties"]["score"]["description"],
            "Total score out of 100"
        );
        assert_eq!(schema["properties"]["suggestions"]["items"]["type"], "string");
        let mut required: Vec<_> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        required.sort_unstable();
        assert_eq!(required, vec!["analysis", "score", "suggestions"]);
    }

    #[test]
    fn test_valid_value_passes_and_extra_fields_are_ignored() {
        let value = json!({
            "score": 72,
            "analysis": {"keywords": "good", "contact": "ok"},
            "suggestions": [],
            "extra": true
        });
        assert!(validate(&schema_of::<Report>(), &value).is_ok());
    }

    #[test]
    fn test_missing_nested_field_names_its_path() {
        let errors = violations(json!({
            "score": 72,
            "analysis": {"keywords": "good"},
            "suggestions": []
        }));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("/analysis: "), "{}", errors[0]);
        assert!(errors[0].contains("contact"), "{}", errors[0]);
    }

    #[test]
    fn test_null_required_field_is_rejected() {
        let errors = violations(json!({
            "score": null,
            "analysis": {"keywords": "a", "contact": "b"},
            "suggestions": []
        }));
        assert!(errors[0].starts_with("/score: "), "{}", errors[0]);
    }

    #[test]
    fn test_array_items_are_checked_with_index() {
        let errors = violations(json!({
            "score": 50,
            "analysis": {"keywords": "a", "contact": "b"},
            "suggestions": ["one", "two", 3]
        }));
        assert!(errors[0].starts_with("/suggestions/2: "), "{}", errors[0]);
    }

    #[test]
    fn test_every_violation_is_reported() {
        let errors = violations(json!({"score": "72", "analysis": {}}));
        // score type, missing suggestions, two missing analysis fields
        assert_eq!(errors.len(), 4, "{errors:?}");
    }
}
