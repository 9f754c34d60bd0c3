//! # textop-ml: schema-annotated text featurization operator
//!
//! This crate provides `TextTransformer`, a pipeline operator that turns text
//! columns into numeric features with word2vec embeddings reduced by a
//! truncated SVD. Alongside `fit`/`transform` the operator publishes JSON-Schema
//! documents for its hyperparameters and its input/output shapes, so an outer
//! optimizer can reason about it without running it.
//!
//! ## Layout
//!
//! - `operator`: the `Operator` trait and combined schema documents
//! - `text`: the adapter, its hyperparameters, and the word2vec + SVD featurizer
//! - `data`: array-like containers, column type inference, and file loaders
//! - `config`: layered configuration
//!
//! ```no_run
//! use textop_ml::{ArrayLike, TextTransformer};
//! use serde_json::json;
//!
//! let mut op = TextTransformer::from_hyperparams(json!({"drop_columns": true}))?;
//! let x = ArrayLike::from_value(json!([[1, "the food was great"], [2, "slow and cold service"]]))?;
//! let features = op.fit(&x, None)?.transform(&x)?;
//! assert_eq!(features.n_samples(), 2);
//! # Ok::<(), textop_ml::TextOpError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod operator;
pub mod text;

// Re-exports
pub use config::TextOpConfig;
pub use data::{ArrayLike, Table};
pub use error::TextOpError;
pub use operator::{Operator, OperatorSchemas, SchemaPart};
pub use text::{
    ColumnList, TextFeaturizer, TextTransformer, TextTransformerParams, Word2VecOptions,
    Word2VecTextTransformer,
};
