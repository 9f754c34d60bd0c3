//! Column type inference for tables.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column data type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    String,
    Boolean,
    Json,
    Mixed,
    Null,
}

/// Infer column type from a sample of values.
///
/// Strings only win when every non-null cell is a string; a column mixing
/// strings with other kinds is [`ColumnType::Mixed`].
pub fn infer_column_type<'a, I>(values: I) -> ColumnType
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut has_int = false;
    let mut has_float = false;
    let mut has_bool = false;
    let mut has_string = false;
    let mut has_json = false;
    let mut any = false;

    for v in values {
        match v {
            Value::Null => continue,
            Value::Number(n) => {
                if n.is_f64() {
                    has_float = true;
                } else {
                    has_int = true;
                }
            }
            Value::Bool(_) => has_bool = true,
            Value::String(_) => has_string = true,
            Value::Array(_) | Value::Object(_) => has_json = true,
        }
        any = true;
    }

    if !any {
        return ColumnType::Null;
    }
    if has_string {
        return if has_int || has_float || has_bool || has_json {
            ColumnType::Mixed
        } else {
            ColumnType::String
        };
    }
    if has_json {
        return if has_int || has_float || has_bool {
            ColumnType::Mixed
        } else {
            ColumnType::Json
        };
    }
    if has_float {
        return ColumnType::Float;
    }
    if has_int {
        return ColumnType::Integer;
    }
    ColumnType::Boolean
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_infer_column_type_int() {
        let values = [json!(1), json!(2), json!(3)];
        assert_eq!(infer_column_type(&values), ColumnType::Integer);
    }

    #[test]
    fn test_infer_column_type_string_with_nulls() {
        let values = [json!("a"), Value::Null, json!("b")];
        assert_eq!(infer_column_type(&values), ColumnType::String);
    }

    #[test]
    fn test_infer_column_type_mixed() {
        let values = [json!("a"), json!(1.5)];
        assert_eq!(infer_column_type(&values), ColumnType::Mixed);
    }

    #[test]
    fn test_infer_column_type_all_null() {
        let values = [Value::Null, Value::Null];
        assert_eq!(infer_column_type(&values), ColumnType::Null);
    }
}
