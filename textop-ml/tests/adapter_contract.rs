//! Contract tests for the `TextTransformer` adapter using a stub featurizer.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fmt;
use textop_ml::{ArrayLike, ColumnList, Operator, TextFeaturizer, TextTransformer, TextTransformerParams};

#[derive(Debug, PartialEq)]
enum StubError {
    Rejected(String),
    Boom(usize),
}

impl fmt::Display for StubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StubError::Rejected(msg) => write!(f, "rejected: {msg}"),
            StubError::Boom(n) => write!(f, "boom after {n} samples"),
        }
    }
}

impl std::error::Error for StubError {}

/// Records what the adapter hands it and emits one feature per sample.
#[derive(Debug)]
struct RecordingFeaturizer {
    params: TextTransformerParams,
    fitted_on: Option<usize>,
    seen_y: Option<Value>,
}

impl TextFeaturizer for RecordingFeaturizer {
    type Error = StubError;

    fn from_params(params: TextTransformerParams) -> Result<Self, StubError> {
        if params.min_num_words > 100 {
            return Err(StubError::Rejected("min_num_words".into()));
        }
        Ok(Self {
            params,
            fitted_on: None,
            seen_y: None,
        })
    }

    fn fit(&mut self, x: &ArrayLike, y: Option<&Value>) -> Result<(), StubError> {
        if !self.params.activate_flag {
            return Err(StubError::Boom(x.n_samples()));
        }
        self.fitted_on = Some(x.n_samples());
        self.seen_y = y.cloned();
        Ok(())
    }

    fn transform(&self, x: &ArrayLike) -> Result<ArrayLike, StubError> {
        Ok(ArrayLike::TwoD(
            (0..x.n_samples()).map(|i| vec![json!(i as f64)]).collect(),
        ))
    }
}

type StubOp = TextTransformer<RecordingFeaturizer>;

#[test]
fn omitted_lists_reach_wrapped_as_empty() {
    let op = StubOp::new(TextTransformerParams::default()).unwrap();
    let params = &op.wrapped().params;
    assert_eq!(params.column_headers_list, Some(ColumnList::Names(vec![])));
    assert_eq!(params.columns_to_be_deleted, Some(ColumnList::Names(vec![])));
}

#[test]
fn explicit_null_lists_reach_wrapped_as_empty() {
    let params = TextTransformerParams::from_value(json!({
        "column_headers_list": null,
        "columns_to_be_deleted": null,
        "text_columns": null
    }))
    .unwrap();
    let op = StubOp::new(params).unwrap();
    let params = &op.wrapped().params;
    assert_eq!(params.column_headers_list, Some(ColumnList::default()));
    assert_eq!(params.columns_to_be_deleted, Some(ColumnList::default()));
    assert_eq!(params.text_columns, None);
}

#[test]
fn given_lists_are_passed_through() {
    let params = TextTransformerParams::default()
        .with_column_headers(vec!["id", "body"])
        .with_columns_to_be_deleted(vec![0i64]);
    let op = StubOp::new(params).unwrap();
    let params = &op.wrapped().params;
    assert_eq!(params.column_headers_list, Some(ColumnList::from(vec!["id", "body"])));
    assert_eq!(params.columns_to_be_deleted, Some(ColumnList::Indices(vec![0])));
}

#[test]
fn fit_returns_the_adapter_itself() {
    let mut op = StubOp::new(TextTransformerParams::default()).unwrap();
    let expected: *const StubOp = &op;
    let x = ArrayLike::OneD(vec![json!("a"), json!("b")]);
    let returned: *const StubOp = op.fit(&x, Some(&json!([0, 1]))).unwrap();
    assert!(std::ptr::eq(expected, returned));
    assert_eq!(op.wrapped().fitted_on, Some(2));
    assert_eq!(op.wrapped().seen_y, Some(json!([0, 1])));
}

#[test]
fn transform_preserves_sample_count() {
    let mut op = StubOp::new(TextTransformerParams::default()).unwrap();
    let x = ArrayLike::TwoD(vec![vec![json!(1), json!("x")]; 7]);
    let out = op.fit(&x, None).unwrap().transform(&x).unwrap();
    assert_eq!(out.n_samples(), x.n_samples());
}

#[test]
fn wrapped_errors_propagate_unchanged() {
    let err = StubOp::new(TextTransformerParams::default().with_min_num_words(500)).unwrap_err();
    assert_eq!(err, StubError::Rejected("min_num_words".into()));

    let mut op = StubOp::new(TextTransformerParams::default().with_activate_flag(false)).unwrap();
    let err = op
        .fit(&ArrayLike::OneD(vec![json!(1), json!(2), json!(3)]), None)
        .unwrap_err();
    assert_eq!(err, StubError::Boom(3));
}

#[test]
fn schemas_do_not_depend_on_wrapped() {
    let op = StubOp::new(TextTransformerParams::default()).unwrap();
    assert_eq!(op.name(), "TextTransformer");
    assert_eq!(
        op.schemas().output_transform()["description"],
        json!("Features; the outer array is over samples.")
    );
}
