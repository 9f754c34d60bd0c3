//! The `TextTransformer` operator.

use crate::data::array::ArrayLike;
use crate::error::TextOpError;
use crate::operator::{Operator, OperatorSchemas};
use crate::text::featurizer::{TextFeaturizer, Word2VecTextTransformer};
use crate::text::params::TextTransformerParams;
use crate::text::schema::text_transformer_schemas;
use serde_json::Value;

/// Operator exposing a [`TextFeaturizer`] to pipelines.
///
/// Construction normalizes the hyperparameters and instantiates the wrapped
/// featurizer; `fit` and `transform` delegate to it and return its errors
/// unchanged.
#[derive(Debug)]
pub struct TextTransformer<W = Word2VecTextTransformer> {
    wrapped: W,
}

impl<W: TextFeaturizer> TextTransformer<W> {
    /// Build the operator. Absent `column_headers_list` and
    /// `columns_to_be_deleted` become empty lists before `W` sees them.
    pub fn new(params: TextTransformerParams) -> Result<Self, W::Error> {
        let params = params.normalized();
        tracing::debug!(
            drop_columns = params.drop_columns,
            min_num_words = params.min_num_words,
            activate_flag = params.activate_flag,
            "Constructing text transformer"
        );
        Ok(Self {
            wrapped: W::from_params(params)?,
        })
    }

    /// Fit the wrapped featurizer and return the operator for chaining.
    pub fn fit(&mut self, x: &ArrayLike, y: Option<&Value>) -> Result<&mut Self, W::Error> {
        self.wrapped.fit(x, y)?;
        Ok(self)
    }

    pub fn transform(&self, x: &ArrayLike) -> Result<ArrayLike, W::Error> {
        self.wrapped.transform(x)
    }

    pub fn wrapped(&self) -> &W {
        &self.wrapped
    }
}

impl TextTransformer<Word2VecTextTransformer> {
    /// Build the default operator from a JSON hyperparameter object.
    pub fn from_hyperparams(hyperparams: Value) -> Result<Self, TextOpError> {
        Self::new(TextTransformerParams::from_value(hyperparams)?)
    }

    /// See [`Word2VecTextTransformer::output_headers`].
    pub fn output_headers(&self) -> Option<Vec<String>> {
        self.wrapped.output_headers()
    }
}

impl<W> Operator for TextTransformer<W> {
    fn name(&self) -> &str {
        "TextTransformer"
    }

    fn schemas(&self) -> &OperatorSchemas {
        text_transformer_schemas()
    }
}
