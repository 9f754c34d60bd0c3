//! Text featurization: the `TextTransformer` operator and its word2vec + SVD
//! featurizer.

pub mod adapter;
pub mod embedder;
pub mod featurizer;
pub mod params;
pub mod schema;
pub mod svd;
pub mod tokenize;
pub mod word2vec;

pub use adapter::TextTransformer;
pub use embedder::Word2VecSvd;
pub use featurizer::{TextFeaturizer, Word2VecTextTransformer};
pub use params::{ColumnList, TextProcessingOptions, TextTransformerParams, Word2VecOptions};
pub use schema::text_transformer_schemas;
pub use svd::TruncatedSvd;
pub use word2vec::{Vocabulary, Word2Vec};
