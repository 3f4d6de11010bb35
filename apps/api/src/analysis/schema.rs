//! Result schema: the structured output contract, derived from `AnalysisResult`.
//!
//! The generated JSON Schema is sent to Gemini as `responseJsonSchema` and is
//! also walked locally against the untyped response, so a malformed reply fails
//! with a specific path and reason instead of a bare decode error.

use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::analysis::models::AnalysisResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    TypeMismatch {
        expected: String,
        found: &'static str,
    },
    MissingField(String),
    UnexpectedField(String),
    NotInEnum {
        value: String,
        allowed: Vec<String>,
    },
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationKind::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            ViolationKind::MissingField(name) => write!(f, "missing required field `{name}`"),
            ViolationKind::UnexpectedField(name) => write!(f, "unexpected field `{name}`"),
            ViolationKind::NotInEnum { value, allowed } => {
                write!(f, "`{value}` is not one of {}", allowed.join(", "))
            }
        }
    }
}

/// A response that does not conform to the declared schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema violation at `{path}`: {kind}")]
pub struct SchemaViolation {
    pub path: String,
    pub kind: ViolationKind,
}

/// JSON Schema generated from a Rust type with every subschema inlined,
/// since Gemini resolves `$ref` only partially.
#[derive(Debug, Clone)]
pub struct ResponseSchema {
    root: Value,
}

impl ResponseSchema {
    pub fn for_type<T: JsonSchema>() -> Self {
        let generator = SchemaSettings::draft2020_12()
            .with(|s| {
                s.inline_subschemas = true;
                s.meta_schema = None;
            })
            .into_generator();
        Self {
            root: generator.into_root_schema_for::<T>().to_value(),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Checks `value` against the schema. Reports the first violation found.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        validate_at(&self.root, "$", value)
    }
}

/// The structured output contract for resume analysis.
pub fn analysis_schema() -> ResponseSchema {
    ResponseSchema::for_type::<AnalysisResult>()
}

fn validate_at(schema: &Value, path: &str, value: &Value) -> Result<(), SchemaViolation> {
    let violation = |kind| SchemaViolation {
        path: path.to_string(),
        kind,
    };

    if let Some(types) = schema.get("type") {
        let allowed: Vec<&str> = match types {
            Value::String(t) => vec![t.as_str()],
            Value::Array(ts) => ts.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        if !allowed.is_empty() && !allowed.iter().any(|t| type_matches(t, value)) {
            return Err(violation(ViolationKind::TypeMismatch {
                expected: allowed.join(" or "),
                found: json_type_name(value),
            }));
        }
    }

    if let Some(Value::Array(options)) = schema.get("enum") {
        if !options.contains(value) {
            return Err(violation(ViolationKind::NotInEnum {
                value: display(value),
                allowed: options.iter().map(display).collect(),
            }));
        }
    }

    match value {
        Value::Object(map) => validate_object(schema, path, map),
        Value::Array(elements) => match schema.get("items") {
            Some(items) => elements
                .iter()
                .enumerate()
                .try_for_each(|(i, element)| validate_at(items, &format!("{path}[{i}]"), element)),
            None => Ok(()),
        },
        _ => Ok(()),
    }
}

fn validate_object(
    schema: &Value,
    path: &str,
    map: &Map<String, Value>,
) -> Result<(), SchemaViolation> {
    let properties = schema.get("properties").and_then(Value::as_object);

    if let Some(Value::Array(required)) = schema.get("required") {
        if let Some(name) = required
            .iter()
            .filter_map(Value::as_str)
            .find(|name| !map.contains_key(*name))
        {
            return Err(SchemaViolation {
                path: path.to_string(),
                kind: ViolationKind::MissingField(name.to_string()),
            });
        }
    }

    if let Some(properties) = properties {
        for (name, field_schema) in properties {
            if let Some(field) = map.get(name) {
                validate_at(field_schema, &format!("{path}.{name}"), field)?;
            }
        }
    }

    if schema.get("additionalProperties") == Some(&Value::Bool(false)) {
        if let Some(extra) = map
            .keys()
            .find(|k| !properties.is_some_and(|p| p.contains_key(k.as_str())))
        {
            return Err(SchemaViolation {
                path: path.to_string(),
                kind: ViolationKind::UnexpectedField(extra.clone()),
            });
        }
    }

    Ok(())
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn display(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::Verdict;
    use serde_json::json;

    fn valid_response() -> Value {
        json!({
            "relevanceScore": 82,
            "verdict": "High",
            "missingSkills": ["Terraform"],
            "missingCertifications": [],
            "missingProjects": ["Add a CI/CD pipeline project"],
            "feedback": "Strong match."
        })
    }

    #[test]
    fn test_valid_response_passes() {
        assert!(analysis_schema().validate(&valid_response()).is_ok());
    }

    #[test]
    fn test_generated_schema_requires_every_field() {
        let schema = analysis_schema();
        let wire = schema.as_value();
        assert_eq!(wire["type"], "object");
        assert_eq!(wire["additionalProperties"], false);

        let mut required: Vec<&str> = wire["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        required.sort_unstable();
        assert_eq!(
            required,
            vec![
                "feedback",
                "missingCertifications",
                "missingProjects",
                "missingSkills",
                "relevanceScore",
                "verdict"
            ]
        );
        assert_eq!(wire["properties"]["relevanceScore"]["type"], "integer");
        assert_eq!(wire["properties"]["missingSkills"]["items"]["type"], "string");
    }

    #[test]
    fn test_generated_schema_is_inlined_without_meta_schema() {
        let schema = analysis_schema();
        let wire = schema.as_value();
        assert!(wire.get("$defs").is_none());
        assert!(wire.get("$schema").is_none());
        assert!(wire["properties"]["verdict"].get("$ref").is_none());
    }

    #[test]
    fn test_field_docs_become_descriptions() {
        let schema = analysis_schema();
        assert_eq!(
            schema.as_value()["properties"]["relevanceScore"]["description"],
            "Relevance score from 0-100."
        );
    }

    #[test]
    fn test_verdict_enum_matches_model_enum() {
        let schema = analysis_schema();
        let wire_enum: Vec<String> =
            serde_json::from_value(schema.as_value()["properties"]["verdict"]["enum"].clone())
                .unwrap();
        let model_enum: Vec<&str> = [Verdict::High, Verdict::Medium, Verdict::Low]
            .iter()
            .map(|v| v.as_str())
            .collect();
        assert_eq!(wire_enum, model_enum);
    }

    #[test]
    fn test_missing_field_is_reported() {
        let mut value = valid_response();
        value.as_object_mut().unwrap().remove("feedback");
        let err = analysis_schema().validate(&value).unwrap_err();
        assert_eq!(err.path, "$");
        assert_eq!(err.kind, ViolationKind::MissingField("feedback".to_string()));
    }

    #[test]
    fn test_unexpected_field_is_reported() {
        let mut value = valid_response();
        value["confidence"] = json!(0.9);
        let err = analysis_schema().validate(&value).unwrap_err();
        assert_eq!(err.kind, ViolationKind::UnexpectedField("confidence".to_string()));
    }

    #[test]
    fn test_fractional_score_is_a_type_mismatch() {
        let mut value = valid_response();
        value["relevanceScore"] = json!(82.5);
        let err = analysis_schema().validate(&value).unwrap_err();
        assert_eq!(err.path, "$.relevanceScore");
        assert_eq!(
            err.kind,
            ViolationKind::TypeMismatch {
                expected: "integer".to_string(),
                found: "number"
            }
        );
    }

    #[test]
    fn test_unknown_verdict_is_rejected() {
        let mut value = valid_response();
        value["verdict"] = json!("Excellent");
        let err = analysis_schema().validate(&value).unwrap_err();
        assert_eq!(err.path, "$.verdict");
        assert!(matches!(err.kind, ViolationKind::NotInEnum { ref value, .. } if value == "Excellent"));
    }

    #[test]
    fn test_array_element_path_is_indexed() {
        let mut value = valid_response();
        value["missingSkills"] = json!(["Rust", 7]);
        let err = analysis_schema().validate(&value).unwrap_err();
        assert_eq!(err.path, "$.missingSkills[1]");
        assert_eq!(
            err.to_string(),
            "schema violation at `$.missingSkills[1]`: expected string, found integer"
        );
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let err = analysis_schema().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(
            err.kind,
            ViolationKind::TypeMismatch {
                expected: "object".to_string(),
                found: "array"
            }
        );
    }
}
