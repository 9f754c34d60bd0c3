//! Hyperparameters of the text transformer.

use crate::error::TextOpError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A homogeneous list of column names or of column indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnList {
    Names(Vec<String>),
    Indices(Vec<i64>),
}

impl Default for ColumnList {
    fn default() -> Self {
        ColumnList::Names(Vec::new())
    }
}

impl ColumnList {
    pub fn len(&self) -> usize {
        match self {
            ColumnList::Names(v) => v.len(),
            ColumnList::Indices(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries rendered as header strings.
    pub fn to_strings(&self) -> Vec<String> {
        match self {
            ColumnList::Names(v) => v.clone(),
            ColumnList::Indices(v) => v.iter().map(i64::to_string).collect(),
        }
    }

    /// Resolve entries to column positions.
    ///
    /// Names are matched against `headers`; indices must lie in `0..headers.len()`.
    pub fn resolve(&self, headers: &[String]) -> Result<Vec<usize>, TextOpError> {
        match self {
            ColumnList::Names(names) => names
                .iter()
                .map(|name| {
                    headers
                        .iter()
                        .position(|h| h == name)
                        .ok_or_else(|| TextOpError::column_not_found(name.clone()))
                })
                .collect(),
            ColumnList::Indices(indices) => indices
                .iter()
                .map(|&i| {
                    usize::try_from(i)
                        .ok()
                        .filter(|&i| i < headers.len())
                        .ok_or_else(|| {
                            TextOpError::column_not_found(format!(
                                "index {i} (table has {} columns)",
                                headers.len()
                            ))
                        })
                })
                .collect(),
        }
    }
}

impl From<Vec<String>> for ColumnList {
    fn from(names: Vec<String>) -> Self {
        ColumnList::Names(names)
    }
}

impl From<Vec<&str>> for ColumnList {
    fn from(names: Vec<&str>) -> Self {
        ColumnList::Names(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<i64>> for ColumnList {
    fn from(indices: Vec<i64>) -> Self {
        ColumnList::Indices(indices)
    }
}

/// The hyperparameter set handed to a text featurizer.
///
/// Field names and defaults follow the operator's hyperparameter schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextTransformerParams {
    /// Featurizers to apply and their options, keyed by featurizer name.
    #[serde(default)]
    pub text_processing_options: Map<String, Value>,
    /// Headers of the incoming columns.
    #[serde(default)]
    pub column_headers_list: Option<ColumnList>,
    /// Drop the original text columns from the output.
    #[serde(default)]
    pub drop_columns: bool,
    /// Minimum mean word count for a column to be detected as text.
    #[serde(default = "default_min_num_words")]
    pub min_num_words: i64,
    /// Columns removed from the output.
    #[serde(default)]
    pub columns_to_be_deleted: Option<ColumnList>,
    /// Explicit text columns; `None` means detect them.
    #[serde(default)]
    pub text_columns: Option<ColumnList>,
    /// When false the transformer passes its input through untouched.
    #[serde(default = "default_true")]
    pub activate_flag: bool,
}

fn default_min_num_words() -> i64 {
    3
}

fn default_true() -> bool {
    true
}

impl Default for TextTransformerParams {
    fn default() -> Self {
        Self {
            text_processing_options: Map::new(),
            column_headers_list: None,
            drop_columns: false,
            min_num_words: default_min_num_words(),
            columns_to_be_deleted: None,
            text_columns: None,
            activate_flag: true,
        }
    }
}

impl TextTransformerParams {
    /// Parse a hyperparameter object. Unknown keys are rejected.
    pub fn from_value(value: Value) -> Result<Self, TextOpError> {
        serde_json::from_value(value)
            .map_err(|e| TextOpError::invalid_hyperparameter(e.to_string()))
    }

    /// Substitute empty lists for absent `column_headers_list` and
    /// `columns_to_be_deleted`.
    pub fn normalized(mut self) -> Self {
        if self.column_headers_list.is_none() {
            self.column_headers_list = Some(ColumnList::default());
        }
        if self.columns_to_be_deleted.is_none() {
            self.columns_to_be_deleted = Some(ColumnList::default());
        }
        self
    }

    pub fn with_text_processing_options(mut self, options: Map<String, Value>) -> Self {
        self.text_processing_options = options;
        self
    }

    pub fn with_column_headers(mut self, headers: impl Into<ColumnList>) -> Self {
        self.column_headers_list = Some(headers.into());
        self
    }

    pub fn with_drop_columns(mut self, drop: bool) -> Self {
        self.drop_columns = drop;
        self
    }

    pub fn with_min_num_words(mut self, min_num_words: i64) -> Self {
        self.min_num_words = min_num_words;
        self
    }

    pub fn with_columns_to_be_deleted(mut self, columns: impl Into<ColumnList>) -> Self {
        self.columns_to_be_deleted = Some(columns.into());
        self
    }

    pub fn with_text_columns(mut self, columns: impl Into<ColumnList>) -> Self {
        self.text_columns = Some(columns.into());
        self
    }

    pub fn with_activate_flag(mut self, activate: bool) -> Self {
        self.activate_flag = activate;
        self
    }
}

/// Training options of the word2vec + SVD featurizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Word2VecOptions {
    /// Number of features generated per text column.
    pub output_dim: usize,
    /// Dimensionality of the learned word vectors.
    pub vector_size: usize,
    /// Maximum skip-gram context distance.
    pub window: usize,
    /// Minimum token count to enter the vocabulary.
    pub min_count: usize,
    pub epochs: usize,
    /// Negative samples per positive pair.
    pub negative: usize,
    pub learning_rate: f64,
    pub seed: u64,
    /// Regex whose matches are the tokens of a document.
    pub token_pattern: String,
    pub lowercase: bool,
}

impl Default for Word2VecOptions {
    fn default() -> Self {
        Self {
            output_dim: 30,
            vector_size: 50,
            window: 5,
            min_count: 1,
            epochs: 5,
            negative: 5,
            learning_rate: 0.025,
            seed: 42,
            token_pattern: default_token_pattern(),
            lowercase: true,
        }
    }
}

fn default_token_pattern() -> String {
    r"\w+".to_string()
}

impl Word2VecOptions {
    pub fn validate(&self) -> Result<(), TextOpError> {
        if self.output_dim == 0 {
            return Err(TextOpError::invalid_hyperparameter(
                "word2vec.output_dim must be positive",
            ));
        }
        if self.vector_size == 0 {
            return Err(TextOpError::invalid_hyperparameter(
                "word2vec.vector_size must be positive",
            ));
        }
        if self.window == 0 {
            return Err(TextOpError::invalid_hyperparameter(
                "word2vec.window must be positive",
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(TextOpError::invalid_hyperparameter(
                "word2vec.learning_rate must be a positive number",
            ));
        }
        regex::Regex::new(&self.token_pattern).map_err(|e| {
            TextOpError::invalid_hyperparameter(format!("word2vec.token_pattern: {e}"))
        })?;
        Ok(())
    }

    /// Features produced per text column.
    pub fn n_components(&self) -> usize {
        self.output_dim.min(self.vector_size)
    }
}

/// Parsed `text_processing_options`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextProcessingOptions {
    pub word2vec: Word2VecOptions,
}

impl TextProcessingOptions {
    pub const WORD2VEC: &'static str = "word2vec";

    /// Parse the options map. An empty map selects word2vec with defaults.
    pub fn parse(options: &Map<String, Value>) -> Result<Self, TextOpError> {
        let mut word2vec = Word2VecOptions::default();
        for (key, value) in options {
            match key.as_str() {
                Self::WORD2VEC => {
                    word2vec = match value {
                        Value::Null => Word2VecOptions::default(),
                        other => serde_json::from_value(other.clone()).map_err(|e| {
                            TextOpError::invalid_hyperparameter(format!(
                                "text_processing_options.word2vec: {e}"
                            ))
                        })?,
                    };
                }
                other => {
                    return Err(TextOpError::invalid_hyperparameter(format!(
                        "unknown text processing option '{other}'"
                    )));
                }
            }
        }
        word2vec.validate()?;
        Ok(Self { word2vec })
    }
}
