//! Text featurizers: the components the [`TextTransformer`](super::TextTransformer)
//! adapter wraps.

use crate::data::array::ArrayLike;
use crate::data::schema::{ColumnType, infer_column_type};
use crate::error::TextOpError;
use crate::text::embedder::Word2VecSvd;
use crate::text::params::{TextProcessingOptions, TextTransformerParams};
use crate::text::tokenize::{cell_text, word_count};
use serde_json::Value;
use std::collections::BTreeSet;

/// A component converting text columns of an array-like to numeric features.
pub trait TextFeaturizer: Sized {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Instantiate from a normalized hyperparameter set.
    fn from_params(params: TextTransformerParams) -> Result<Self, Self::Error>;

    /// Learn from `x`; `y` is accepted for pipeline compatibility.
    fn fit(&mut self, x: &ArrayLike, y: Option<&Value>) -> Result<(), Self::Error>;

    fn transform(&self, x: &ArrayLike) -> Result<ArrayLike, Self::Error>;
}

/// State learned by [`Word2VecTextTransformer::fit`].
#[derive(Debug, Clone)]
enum FitState {
    /// `activate_flag` was false: transform passes input through.
    Inactive,
    Active(ActiveState),
}

#[derive(Debug, Clone)]
struct ActiveState {
    headers: Vec<String>,
    text_columns: Vec<usize>,
    deleted: BTreeSet<usize>,
    /// One embedder per entry of `text_columns`.
    embedders: Vec<Word2VecSvd>,
}

/// Word2vec + SVD featurizer over the text columns of a table.
#[derive(Debug, Clone)]
pub struct Word2VecTextTransformer {
    params: TextTransformerParams,
    options: TextProcessingOptions,
    state: Option<FitState>,
}

impl Word2VecTextTransformer {
    pub fn params(&self) -> &TextTransformerParams {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Names of the featurized columns, once fitted.
    pub fn text_columns(&self) -> Option<Vec<String>> {
        match self.state.as_ref()? {
            FitState::Inactive => Some(Vec::new()),
            FitState::Active(s) => Some(s.text_columns.iter().map(|&i| s.headers[i].clone()).collect()),
        }
    }

    /// Headers of the transform output: the kept input headers followed by the
    /// generated feature headers. `None` before fit or when inactive.
    pub fn output_headers(&self) -> Option<Vec<String>> {
        let FitState::Active(s) = self.state.as_ref()? else {
            return None;
        };
        let mut headers: Vec<String> = s
            .headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !s.deleted.contains(i))
            .map(|(_, h)| h.clone())
            .collect();
        for (&col, embedder) in s.text_columns.iter().zip(&s.embedders) {
            for k in 0..embedder.n_components() {
                headers.push(format!(
                    "{}_{}_{k}",
                    TextProcessingOptions::WORD2VEC,
                    s.headers[col]
                ));
            }
        }
        Some(headers)
    }

    fn column_headers(&self, n_columns: usize) -> Vec<String> {
        match &self.params.column_headers_list {
            Some(list) if list.len() == n_columns => list.to_strings(),
            Some(list) if !list.is_empty() => {
                tracing::warn!(
                    given = list.len(),
                    n_columns,
                    "column_headers_list does not match the column count; using positional headers"
                );
                positional_headers(n_columns)
            }
            _ => positional_headers(n_columns),
        }
    }

    fn detect_text_columns(
        &self,
        rows: &[Vec<Value>],
        headers: &[String],
        deleted: &BTreeSet<usize>,
    ) -> Vec<usize> {
        let min_words = self.params.min_num_words as f64;
        (0..headers.len())
            .filter(|i| !deleted.contains(i))
            .filter(|&i| {
                let cells = rows.iter().map(|r| &r[i]);
                if infer_column_type(cells) != ColumnType::String {
                    return false;
                }
                let texts: Vec<&str> = rows.iter().filter_map(|r| r[i].as_str()).collect();
                let mean = texts.iter().map(|t| word_count(t)).sum::<usize>() as f64
                    / texts.len() as f64;
                let is_text = mean >= min_words;
                tracing::debug!(column = %headers[i], mean_words = mean, is_text, "Text detection");
                is_text
            })
            .collect()
    }
}

fn positional_headers(n: usize) -> Vec<String> {
    (0..n).map(|i| i.to_string()).collect()
}

impl TextFeaturizer for Word2VecTextTransformer {
    type Error = TextOpError;

    fn from_params(params: TextTransformerParams) -> Result<Self, TextOpError> {
        if params.min_num_words < 0 {
            return Err(TextOpError::invalid_hyperparameter(format!(
                "min_num_words must be non-negative, got {}",
                params.min_num_words
            )));
        }
        let options = TextProcessingOptions::parse(&params.text_processing_options)?;
        Ok(Self {
            params,
            options,
            state: None,
        })
    }

    fn fit(&mut self, x: &ArrayLike, _y: Option<&Value>) -> Result<(), TextOpError> {
        if !self.params.activate_flag {
            tracing::debug!("activate_flag is false; skipping text featurization");
            self.state = Some(FitState::Inactive);
            return Ok(());
        }

        let rows = x.to_rows()?;
        if rows.is_empty() {
            return Err(TextOpError::empty_data("cannot fit on zero samples"));
        }
        let n_columns = rows[0].len();
        let headers = self.column_headers(n_columns);

        let mut deleted: BTreeSet<usize> = match &self.params.columns_to_be_deleted {
            Some(list) => list.resolve(&headers)?.into_iter().collect(),
            None => BTreeSet::new(),
        };

        let mut text_columns = match &self.params.text_columns {
            Some(list) => list.resolve(&headers)?,
            None => self.detect_text_columns(&rows, &headers, &deleted),
        };
        text_columns.sort_unstable();
        text_columns.dedup();

        if self.params.drop_columns {
            deleted.extend(text_columns.iter().copied());
        }

        tracing::info!(
            samples = rows.len(),
            columns = n_columns,
            text_columns = text_columns.len(),
            "Fitting text transformer"
        );

        let embedders = text_columns
            .iter()
            .map(|&col| {
                let texts: Vec<String> = rows.iter().map(|r| cell_text(&r[col])).collect();
                Word2VecSvd::fit(&texts, &self.options.word2vec)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.state = Some(FitState::Active(ActiveState {
            headers,
            text_columns,
            deleted,
            embedders,
        }));
        Ok(())
    }

    fn transform(&self, x: &ArrayLike) -> Result<ArrayLike, TextOpError> {
        let state = match &self.state {
            None => {
                return Err(TextOpError::not_fitted(
                    "call fit before transform on the text transformer",
                ));
            }
            Some(FitState::Inactive) => return Ok(x.clone()),
            Some(FitState::Active(state)) => state,
        };

        let rows = x.to_rows()?;
        let n_columns = x.n_columns().unwrap_or(state.headers.len());
        if n_columns != state.headers.len() {
            return Err(TextOpError::FeatureMismatch {
                expected: state.headers.len(),
                got: n_columns,
            });
        }

        let out = rows
            .into_iter()
            .map(|row| {
                let mut features: Vec<Value> = Vec::new();
                for (&col, embedder) in state.text_columns.iter().zip(&state.embedders) {
                    features.extend(
                        embedder
                            .embed(&cell_text(&row[col]))
                            .into_iter()
                            .map(float_value),
                    );
                }
                let mut kept: Vec<Value> = row
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| !state.deleted.contains(i))
                    .map(|(_, v)| v)
                    .collect();
                kept.extend(features);
                kept
            })
            .collect();

        Ok(ArrayLike::TwoD(out))
    }
}

fn float_value(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
