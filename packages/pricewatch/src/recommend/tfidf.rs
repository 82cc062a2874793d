//! TF-IDF vectorization and cosine similarity over listing names.

use std::collections::HashMap;

/// Lowercase alphanumeric tokens of a name.
///
/// `"Galaxy S24-Ultra 256GB"` → `["galaxy", "s24", "ultra", "256gb"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// TF-IDF model fitted over a small corpus of names.
pub struct TfIdf {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfIdf {
    /// Fit vocabulary and inverse document frequencies over a corpus.
    ///
    /// IDF is smoothed (`ln((1 + n) / (1 + df)) + 1`) so terms present
    /// in every document still carry weight and nothing divides by
    /// zero.
    pub fn fit(corpus: &[Vec<String>]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_freq: Vec<usize> = Vec::new();

        for document in corpus {
            let mut seen: Vec<usize> = Vec::new();
            for token in document {
                let index = *vocabulary.entry(token.clone()).or_insert_with(|| {
                    document_freq.push(0);
                    document_freq.len() - 1
                });
                if !seen.contains(&index) {
                    document_freq[index] += 1;
                    seen.push(index);
                }
            }
        }

        let n = corpus.len() as f32;
        let idf = document_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    /// TF-IDF vector of a tokenized document over the fitted vocabulary.
    ///
    /// Out-of-vocabulary tokens are ignored.
    pub fn vectorize(&self, tokens: &[String]) -> Vec<f32> {
        let mut vector = vec![0.0; self.idf.len()];
        if tokens.is_empty() {
            return vector;
        }
        for token in tokens {
            if let Some(&index) = self.vocabulary.get(token) {
                vector[index] += 1.0;
            }
        }
        let len = tokens.len() as f32;
        for (value, idf) in vector.iter_mut().zip(&self.idf) {
            *value = (*value / len) * idf;
        }
        vector
    }
}

/// Cosine similarity between two equal-length vectors; zero when
/// either has no magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
