//! Operator model: schema-annotated components an outer pipeline framework
//! can inspect without executing them.

pub mod schema;

pub use schema::{OperatorSchemas, OperatorTags, SCHEMA_DRAFT, SchemaPart};

use crate::error::TextOpError;
use serde_json::{Map, Value, json};

/// A pipeline operator described by a combined schema document.
pub trait Operator {
    /// Short operator name, e.g. `"TextTransformer"`.
    fn name(&self) -> &str;

    /// The combined schema document.
    fn schemas(&self) -> &OperatorSchemas;

    fn hyperparam_defaults(&self) -> Map<String, Value> {
        self.schemas().hyperparam_defaults()
    }

    fn tags(&self) -> OperatorTags {
        self.schemas().tags()
    }

    fn is_transformer(&self) -> bool {
        self.tags().op.iter().any(|t| t == "transformer")
    }

    /// Validate hyperparameters after filling absent ones with their defaults.
    fn validate_hyperparams(&self, hyperparams: &Value) -> Result<(), TextOpError> {
        self.schemas().validate_hyperparams(hyperparams)
    }

    /// Validate fit arguments; `y` is omitted from the instance when `None`.
    fn validate_fit_input(&self, x: &Value, y: Option<&Value>) -> Result<(), TextOpError> {
        let mut args = Map::new();
        args.insert("X".into(), x.clone());
        if let Some(y) = y {
            args.insert("y".into(), y.clone());
        }
        self.schemas()
            .validate(SchemaPart::InputFit, &Value::Object(args))
    }

    fn validate_transform_input(&self, x: &Value) -> Result<(), TextOpError> {
        self.schemas()
            .validate(SchemaPart::InputTransform, &json!({ "X": x }))
    }
}
