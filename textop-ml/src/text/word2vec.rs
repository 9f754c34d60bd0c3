//! Skip-gram word2vec with negative sampling.

use crate::text::params::Word2VecOptions;
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Exponent applied to unigram counts for the negative sampling distribution.
const UNIGRAM_POWER: f64 = 0.75;
/// Dot products are clamped to this range before the sigmoid.
const MAX_EXP: f64 = 6.0;

/// Token vocabulary ordered by descending count, ties broken lexicographically.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<String>,
    counts: Vec<u64>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn build(docs: &[Vec<String>], min_count: usize) -> Self {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for doc in docs {
            for token in doc {
                *counts.entry(token.as_str()).or_insert(0) += 1;
            }
        }

        let mut entries: Vec<(&str, u64)> = counts
            .into_iter()
            .filter(|(_, c)| *c >= min_count as u64)
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let words: Vec<String> = entries.iter().map(|(w, _)| w.to_string()).collect();
        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();
        Self {
            counts: entries.iter().map(|(_, c)| *c).collect(),
            words,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    pub fn count(&self, idx: usize) -> u64 {
        self.counts.get(idx).copied().unwrap_or(0)
    }
}

/// Cumulative unigram^0.75 table for drawing negative samples.
struct NegativeTable {
    cumulative: Vec<f64>,
}

impl NegativeTable {
    fn new(vocab: &Vocabulary) -> Self {
        let mut total = 0.0;
        let cumulative = (0..vocab.len())
            .map(|i| {
                total += (vocab.count(i) as f64).powf(UNIGRAM_POWER);
                total
            })
            .collect();
        Self { cumulative }
    }

    fn sample(&self, rng: &mut StdRng) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let u = rng.gen_range(0.0..total);
        self.cumulative
            .partition_point(|&c| c <= u)
            .min(self.cumulative.len() - 1)
    }
}

/// Trained word vectors.
#[derive(Debug, Clone)]
pub struct Word2Vec {
    vocab: Vocabulary,
    /// Input vectors, one row per vocabulary entry.
    vectors: Array2<f64>,
}

impl Word2Vec {
    /// Train on tokenized documents.
    pub fn train(docs: &[Vec<String>], opts: &Word2VecOptions) -> Self {
        let vocab = Vocabulary::build(docs, opts.min_count);
        let dim = opts.vector_size;
        let mut rng = StdRng::seed_from_u64(opts.seed);

        let mut syn0 = Array2::from_shape_fn((vocab.len(), dim), |_| {
            rng.gen_range(-0.5..0.5) / dim as f64
        });

        if vocab.is_empty() {
            tracing::warn!("word2vec vocabulary is empty; all document vectors will be zero");
            return Self {
                vocab,
                vectors: syn0,
            };
        }

        let mut syn1neg = Array2::<f64>::zeros((vocab.len(), dim));
        let table = NegativeTable::new(&vocab);
        let sentences: Vec<Vec<usize>> = docs
            .iter()
            .map(|doc| doc.iter().filter_map(|t| vocab.get(t)).collect())
            .collect();

        let words_per_epoch: usize = sentences.iter().map(Vec::len).sum();
        let total_words = words_per_epoch as f64 * opts.epochs as f64 + 1.0;
        let min_alpha = opts.learning_rate * 1e-4;
        let window = opts.window.max(1);
        let mut processed = 0usize;
        let mut neu1e = Array1::<f64>::zeros(dim);

        for epoch in 0..opts.epochs {
            for sentence in &sentences {
                for (pos, &center) in sentence.iter().enumerate() {
                    let alpha = (opts.learning_rate * (1.0 - processed as f64 / total_words))
                        .max(min_alpha);
                    let reduced = window - rng.gen_range(0..window);
                    let start = pos.saturating_sub(reduced);
                    let end = pos.saturating_add(reduced).min(sentence.len() - 1);

                    for (ctx_pos, &context) in sentence.iter().enumerate().take(end + 1).skip(start) {
                        if ctx_pos == pos {
                            continue;
                        }
                        neu1e.fill(0.0);

                        for d in 0..=opts.negative {
                            let (target, label) = if d == 0 {
                                (center, 1.0)
                            } else {
                                let t = table.sample(&mut rng);
                                if t == center {
                                    continue;
                                }
                                (t, 0.0)
                            };
                            let f = syn0.row(context).dot(&syn1neg.row(target));
                            let g = (label - sigmoid(f)) * alpha;
                            neu1e.scaled_add(g, &syn1neg.row(target));
                            syn1neg.row_mut(target).scaled_add(g, &syn0.row(context));
                        }

                        syn0.row_mut(context).scaled_add(1.0, &neu1e);
                    }
                    processed += 1;
                }
            }
            tracing::trace!(epoch, processed, "word2vec epoch finished");
        }

        Self {
            vocab,
            vectors: syn0,
        }
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn vector_size(&self) -> usize {
        self.vectors.ncols()
    }

    pub fn vector(&self, word: &str) -> Option<ArrayView1<'_, f64>> {
        self.vocab.get(word).map(|i| self.vectors.row(i))
    }

    /// Mean of the in-vocabulary token vectors; zero when none are known.
    pub fn document_vector(&self, tokens: &[String]) -> Array1<f64> {
        let mut sum = Array1::zeros(self.vector_size());
        let mut n = 0usize;
        for v in tokens.iter().filter_map(|t| self.vector(t)) {
            sum += &v;
            n += 1;
        }
        if n > 0 {
            sum /= n as f64;
        }
        sum
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x.clamp(-MAX_EXP, MAX_EXP)).exp())
}
