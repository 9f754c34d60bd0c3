//! Schema documents for [`TextTransformer`](super::TextTransformer).

use crate::operator::{OperatorSchemas, SCHEMA_DRAFT};
use serde_json::{Map, Value, json};
use std::sync::LazyLock;

static TEXT_TRANSFORMER_SCHEMAS: LazyLock<OperatorSchemas> = LazyLock::new(|| {
    let mut meta = Map::new();
    meta.insert("$schema".into(), json!(SCHEMA_DRAFT));
    meta.insert(
        "description".into(),
        json!("Converts text columns to numeric features using word2vec embeddings reduced with a truncated SVD."),
    );
    meta.insert(
        "documentation_url".into(),
        json!("https://docs.rs/textop-ml/latest/textop_ml/text/struct.TextTransformer.html"),
    );
    meta.insert("import_from".into(), json!("textop_ml::text"));
    meta.insert("type".into(), json!("object"));
    meta.insert(
        "tags".into(),
        json!({"pre": [], "op": ["transformer"], "post": []}),
    );
    OperatorSchemas::from_parts(
        meta,
        hyperparams_schema(),
        input_fit_schema(),
        input_transform_schema(),
        output_transform_schema(),
    )
});

/// The combined schema document of the text transformer.
pub fn text_transformer_schemas() -> &'static OperatorSchemas {
    &TEXT_TRANSFORMER_SCHEMAS
}

/// A homogeneous list of column names or column indices, or null.
fn column_list(description: &str) -> Value {
    json!({
        "description": description,
        "anyOf": [
            {"type": "array", "items": {"type": "string"}},
            {"type": "array", "items": {"type": "integer"}},
            {"enum": [null]}
        ],
        "default": null
    })
}

/// Samples as a 1-D array of cells or a 2-D array of rows.
fn samples(description: Option<&str>) -> Value {
    let mut schema = json!({
        "anyOf": [
            {"type": "array", "items": {}},
            {"type": "array", "items": {"type": "array", "items": {}}}
        ]
    });
    if let (Some(description), Value::Object(map)) = (description, &mut schema) {
        map.insert("description".into(), json!(description));
    }
    schema
}

pub fn hyperparams_schema() -> Value {
    json!({
        "allOf": [{
            "description": "Transformer that converts text columns to numeric features.",
            "type": "object",
            "additionalProperties": false,
            "required": [
                "text_processing_options",
                "column_headers_list",
                "drop_columns",
                "min_num_words",
                "columns_to_be_deleted",
                "text_columns",
                "activate_flag"
            ],
            "relevantToOptimizer": [],
            "properties": {
                "text_processing_options": {
                    "description": "Featurizers to apply and their options, e.g. {\"word2vec\": {\"output_dim\": 30}}.",
                    "type": "object",
                    "default": {}
                },
                "column_headers_list": column_list(
                    "Column headers of the incoming data. Headers of the generated features are appended to this list."
                ),
                "drop_columns": {
                    "description": "Whether the original text columns are dropped from the output.",
                    "type": "boolean",
                    "default": false
                },
                "min_num_words": {
                    "description": "Minimum mean number of words for a column to be detected as text.",
                    "type": "integer",
                    "default": 3
                },
                "columns_to_be_deleted": column_list("Columns removed from the output."),
                "text_columns": column_list(
                    "Text columns to featurize. When given, text detection is skipped."
                ),
                "activate_flag": {
                    "description": "If false, no features are generated and the input passes through.",
                    "type": "boolean",
                    "default": true
                }
            }
        }]
    })
}

pub fn input_fit_schema() -> Value {
    json!({
        "type": "object",
        "required": ["X"],
        "additionalProperties": false,
        "properties": {
            "X": samples(None),
            "y": {}
        }
    })
}

pub fn input_transform_schema() -> Value {
    json!({
        "type": "object",
        "required": ["X"],
        "additionalProperties": false,
        "properties": {
            "X": samples(None)
        }
    })
}

pub fn output_transform_schema() -> Value {
    samples(Some("Features; the outer array is over samples."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::SchemaPart;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_declared_values() {
        let defaults = text_transformer_schemas().hyperparam_defaults();
        assert_eq!(defaults.len(), 7);
        assert_eq!(defaults["text_processing_options"], json!({}));
        assert_eq!(defaults["column_headers_list"], Value::Null);
        assert_eq!(defaults["drop_columns"], json!(false));
        assert_eq!(defaults["min_num_words"], json!(3));
        assert_eq!(defaults["columns_to_be_deleted"], Value::Null);
        assert_eq!(defaults["text_columns"], Value::Null);
        assert_eq!(defaults["activate_flag"], json!(true));
    }

    #[test]
    fn test_combined_metadata() {
        let schemas = text_transformer_schemas();
        assert_eq!(schemas.combined()["$schema"], json!(SCHEMA_DRAFT));
        assert_eq!(schemas.import_from(), Some("textop_ml::text"));
        assert!(schemas.relevant_to_optimizer().is_empty());
        assert_eq!(schemas.required_hyperparams().len(), 7);
    }

    #[test]
    fn test_defaults_validate_against_hyperparams_schema() {
        let schemas = text_transformer_schemas();
        let defaults = Value::Object(schemas.hyperparam_defaults());
        schemas.validate(SchemaPart::Hyperparams, &defaults).unwrap();
    }

    #[test]
    fn test_hyperparams_schema_rejects_bad_values() {
        let schemas = text_transformer_schemas();
        let mut hp = schemas.hyperparam_defaults();
        hp.insert("column_headers_list".into(), json!(["a", 1]));
        assert!(
            schemas
                .validate(SchemaPart::Hyperparams, &Value::Object(hp.clone()))
                .is_err()
        );
        hp.insert("column_headers_list".into(), json!(["a", "b"]));
        hp.insert("unknown".into(), json!(1));
        assert!(
            schemas
                .validate(SchemaPart::Hyperparams, &Value::Object(hp))
                .is_err()
        );
    }

    #[test]
    fn test_input_schemas_accept_both_shapes() {
        let schemas = text_transformer_schemas();
        for x in [json!(["a b c", 1]), json!([["a b", 1], ["c", null]])] {
            schemas
                .validate(SchemaPart::InputTransform, &json!({ "X": x }))
                .unwrap();
            schemas
                .validate(SchemaPart::InputFit, &json!({ "X": x, "y": [0, 1] }))
                .unwrap();
        }
        assert!(
            schemas
                .validate(SchemaPart::InputTransform, &json!({"X": "text"}))
                .is_err()
        );
        assert!(
            schemas
                .validate(SchemaPart::InputTransform, &json!({"X": [], "y": []}))
                .is_err()
        );
    }
}
