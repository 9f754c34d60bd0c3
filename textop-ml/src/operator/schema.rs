//! Combined JSON-Schema documents describing an operator.
//!
//! The combined document carries four parts under `properties`:
//! `hyperparams`, `input_fit`, `input_transform` and `output_transform`.
//! Outer optimizers read these to reason about an operator without running it.

use crate::error::TextOpError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Draft the combined documents are written against.
pub const SCHEMA_DRAFT: &str = "http://json-schema.org/draft-04/schema#";

/// One of the four schema parts of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaPart {
    Hyperparams,
    InputFit,
    InputTransform,
    OutputTransform,
}

impl SchemaPart {
    pub const ALL: [SchemaPart; 4] = [
        SchemaPart::Hyperparams,
        SchemaPart::InputFit,
        SchemaPart::InputTransform,
        SchemaPart::OutputTransform,
    ];

    /// Key of this part under the combined document's `properties`.
    pub fn key(self) -> &'static str {
        match self {
            SchemaPart::Hyperparams => "hyperparams",
            SchemaPart::InputFit => "input_fit",
            SchemaPart::InputTransform => "input_transform",
            SchemaPart::OutputTransform => "output_transform",
        }
    }
}

/// Operator tags grouped by pipeline position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorTags {
    #[serde(default)]
    pub pre: Vec<String>,
    #[serde(default)]
    pub op: Vec<String>,
    #[serde(default)]
    pub post: Vec<String>,
}

/// A validated combined schema document.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorSchemas {
    combined: Value,
}

impl OperatorSchemas {
    /// Wrap a combined document, checking that every part is present.
    pub fn new(combined: Value) -> Result<Self, TextOpError> {
        let properties = combined
            .get("properties")
            .and_then(Value::as_object)
            .ok_or_else(|| TextOpError::InvalidSchema("missing \"properties\" object".into()))?;
        for part in SchemaPart::ALL {
            if !properties.contains_key(part.key()) {
                return Err(TextOpError::InvalidSchema(format!(
                    "missing \"{}\" schema",
                    part.key()
                )));
            }
        }
        Ok(Self { combined })
    }

    /// Assemble a combined document from its metadata and the four parts.
    ///
    /// `meta` supplies the top-level keys (`description`, `tags`, ...); its
    /// `properties` entry, if any, is replaced.
    pub fn from_parts(
        mut meta: Map<String, Value>,
        hyperparams: Value,
        input_fit: Value,
        input_transform: Value,
        output_transform: Value,
    ) -> Self {
        let mut properties = Map::new();
        properties.insert(SchemaPart::Hyperparams.key().into(), hyperparams);
        properties.insert(SchemaPart::InputFit.key().into(), input_fit);
        properties.insert(SchemaPart::InputTransform.key().into(), input_transform);
        properties.insert(SchemaPart::OutputTransform.key().into(), output_transform);
        meta.insert("properties".into(), Value::Object(properties));
        Self {
            combined: Value::Object(meta),
        }
    }

    pub fn combined(&self) -> &Value {
        &self.combined
    }

    pub fn part(&self, part: SchemaPart) -> &Value {
        // Presence of every part is checked in `new`.
        &self.combined["properties"][part.key()]
    }

    pub fn hyperparams(&self) -> &Value {
        self.part(SchemaPart::Hyperparams)
    }

    pub fn input_fit(&self) -> &Value {
        self.part(SchemaPart::InputFit)
    }

    pub fn input_transform(&self) -> &Value {
        self.part(SchemaPart::InputTransform)
    }

    pub fn output_transform(&self) -> &Value {
        self.part(SchemaPart::OutputTransform)
    }

    pub fn description(&self) -> Option<&str> {
        self.combined.get("description").and_then(Value::as_str)
    }

    pub fn documentation_url(&self) -> Option<&str> {
        self.combined.get("documentation_url").and_then(Value::as_str)
    }

    pub fn import_from(&self) -> Option<&str> {
        self.combined.get("import_from").and_then(Value::as_str)
    }

    pub fn tags(&self) -> OperatorTags {
        self.combined
            .get("tags")
            .cloned()
            .and_then(|t| serde_json::from_value(t).ok())
            .unwrap_or_default()
    }

    /// The first object schema of the hyperparameter `allOf` (or the schema itself).
    fn hyperparams_object(&self) -> Option<&Map<String, Value>> {
        let hp = self.hyperparams();
        match hp.get("allOf").and_then(Value::as_array) {
            Some(all_of) => all_of.first().and_then(Value::as_object),
            None => hp.as_object(),
        }
    }

    /// Default value of every hyperparameter that declares one.
    pub fn hyperparam_defaults(&self) -> Map<String, Value> {
        let mut defaults = Map::new();
        let properties = self
            .hyperparams_object()
            .and_then(|o| o.get("properties"))
            .and_then(Value::as_object);
        if let Some(properties) = properties {
            for (name, prop) in properties {
                if let Some(default) = prop.get("default") {
                    defaults.insert(name.clone(), default.clone());
                }
            }
        }
        defaults
    }

    /// Hyperparameters the outer optimizer should search over.
    pub fn relevant_to_optimizer(&self) -> Vec<String> {
        string_list(self.hyperparams_object(), "relevantToOptimizer")
    }

    pub fn required_hyperparams(&self) -> Vec<String> {
        string_list(self.hyperparams_object(), "required")
    }

    /// Fill absent hyperparameters with their schema defaults.
    ///
    /// Non-object values are returned unchanged so validation reports them.
    pub fn with_hyperparam_defaults(&self, hyperparams: &Value) -> Value {
        let Value::Object(given) = hyperparams else {
            return hyperparams.clone();
        };
        let mut merged = self.hyperparam_defaults();
        merged.extend(given.clone());
        Value::Object(merged)
    }

    /// Validate a possibly partial hyperparameter object, as it will be
    /// seen after defaults are filled in.
    pub fn validate_hyperparams(&self, hyperparams: &Value) -> Result<(), TextOpError> {
        self.validate(
            SchemaPart::Hyperparams,
            &self.with_hyperparam_defaults(hyperparams),
        )
    }

    /// Validate an instance against one schema part.
    ///
    /// Every violation is reported, joined with `"; "`.
    pub fn validate(&self, part: SchemaPart, instance: &Value) -> Result<(), TextOpError> {
        let validator = jsonschema::draft4::new(self.part(part)).map_err(|e| {
            TextOpError::InvalidSchema(format!("{} schema does not compile: {e}", part.key()))
        })?;
        let errors: Vec<String> = validator.iter_errors(instance).map(|e| e.to_string()).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(TextOpError::schema_violation(format!(
                "{}: {}",
                part.key(),
                errors.join("; ")
            )))
        }
    }
}

fn string_list(object: Option<&Map<String, Value>>, key: &str) -> Vec<String> {
    object
        .and_then(|o| o.get(key))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn toy() -> OperatorSchemas {
        OperatorSchemas::new(json!({
            "$schema": SCHEMA_DRAFT,
            "description": "Toy operator.",
            "tags": {"pre": [], "op": ["transformer"], "post": []},
            "properties": {
                "hyperparams": {"allOf": [{
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["k"],
                    "relevantToOptimizer": ["k"],
                    "properties": {"k": {"type": "integer", "default": 2}}
                }]},
                "input_fit": {"type": "object"},
                "input_transform": {"type": "object"},
                "output_transform": {"type": "array"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_missing_part_rejected() {
        let err = OperatorSchemas::new(json!({"properties": {"hyperparams": {}}})).unwrap_err();
        assert!(matches!(err, TextOpError::InvalidSchema(_)));
    }

    #[test]
    fn test_defaults_and_lists() {
        let schemas = toy();
        assert_eq!(schemas.hyperparam_defaults().get("k"), Some(&json!(2)));
        assert_eq!(schemas.relevant_to_optimizer(), vec!["k"]);
        assert_eq!(schemas.required_hyperparams(), vec!["k"]);
        assert_eq!(schemas.tags().op, vec!["transformer"]);
        assert_eq!(schemas.description(), Some("Toy operator."));
    }

    #[test]
    fn test_validate_reports_violation() {
        let schemas = toy();
        assert!(schemas.validate(SchemaPart::Hyperparams, &json!({"k": 3})).is_ok());
        let err = schemas
            .validate(SchemaPart::Hyperparams, &json!({"k": "x", "extra": 1}))
            .unwrap_err();
        assert!(matches!(err, TextOpError::SchemaViolation(_)));
        assert!(err.to_string().contains("hyperparams"));
    }

    #[test]
    fn test_validate_hyperparams_fills_defaults() {
        let schemas = toy();
        assert!(schemas.validate(SchemaPart::Hyperparams, &json!({})).is_err());
        schemas.validate_hyperparams(&json!({})).unwrap();
        assert_eq!(schemas.with_hyperparam_defaults(&json!({"k": 5})), json!({"k": 5}));
        assert!(schemas.validate_hyperparams(&json!({"k": "x"})).is_err());
        assert!(schemas.validate_hyperparams(&json!("k")).is_err());
    }
}
