//! Per-column text embedder: word2vec document vectors reduced by truncated SVD.

use crate::error::TextOpError;
use crate::text::params::Word2VecOptions;
use crate::text::svd::TruncatedSvd;
use crate::text::tokenize::Tokenizer;
use crate::text::word2vec::Word2Vec;
use ndarray::Array2;

#[derive(Debug, Clone)]
pub struct Word2VecSvd {
    tokenizer: Tokenizer,
    model: Word2Vec,
    svd: TruncatedSvd,
}

impl Word2VecSvd {
    /// Train word vectors on `texts` and fit the reduction on their document vectors.
    pub fn fit(texts: &[String], opts: &Word2VecOptions) -> Result<Self, TextOpError> {
        let tokenizer = Tokenizer::new(&opts.token_pattern, opts.lowercase)?;
        let docs: Vec<Vec<String>> = texts.iter().map(|t| tokenizer.tokenize(t)).collect();
        let model = Word2Vec::train(&docs, opts);

        let mut doc_matrix = Array2::zeros((docs.len(), model.vector_size()));
        for (mut row, doc) in doc_matrix.rows_mut().into_iter().zip(&docs) {
            row.assign(&model.document_vector(doc));
        }
        let n_components = opts.n_components();
        if docs.len() < n_components {
            tracing::warn!(
                samples = docs.len(),
                n_components,
                "Fewer samples than SVD components; trailing components will be zero"
            );
        }
        let svd = TruncatedSvd::fit(&doc_matrix, n_components);

        tracing::debug!(
            vocab = model.vocab().len(),
            documents = docs.len(),
            n_components,
            leading_singular_value = svd.singular_values().get(0).copied().unwrap_or(0.0),
            "Fitted word2vec+SVD embedder"
        );
        Ok(Self {
            tokenizer,
            model,
            svd,
        })
    }

    pub fn n_components(&self) -> usize {
        self.svd.n_components()
    }

    pub fn embed(&self, text: &str) -> Vec<f64> {
        let tokens = self.tokenizer.tokenize(text);
        self.svd
            .project(self.model.document_vector(&tokens).view())
            .to_vec()
    }
}
