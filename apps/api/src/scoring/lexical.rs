//! Lexical similarity: TF-IDF cosine over the two-document corpus {job, resume}.
//!
//! Term weighting:
//! - tokens are runs of two or more word characters, lower-cased, stop words removed
//! - tf = raw count of the term in the document
//! - idf = `ln((1 + n) / (1 + df)) + 1` (smoothed, never zero)
//! - each document row is L2-normalized

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::scoring::fallback::LEXICAL_INDETERMINATE;
use crate::scoring::similarity::cosine_similarity;
use crate::scoring::stop_words::is_stop_word;

static RE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

#[derive(Debug, Error, PartialEq)]
pub enum LexicalError {
    #[error("empty vocabulary: documents contain only stop words or no tokens")]
    EmptyVocabulary,
}

/// Document-term matrix produced by [`fit_transform`].
#[derive(Debug, Clone)]
pub struct TfIdfMatrix {
    /// Terms in column order (sorted).
    pub terms: Vec<String>,
    pub idf: Vec<f64>,
    /// One L2-normalized row per input document.
    pub rows: Vec<Vec<f64>>,
}

pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE_TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Learns the vocabulary and idf of `documents` and returns their tf-idf rows.
pub fn fit_transform(documents: &[&str]) -> Result<TfIdfMatrix, LexicalError> {
    let counts: Vec<HashMap<String, u32>> = documents
        .iter()
        .map(|doc| {
            let mut tf = HashMap::new();
            for token in tokenize(doc) {
                *tf.entry(token).or_insert(0) += 1;
            }
            tf
        })
        .collect();

    // term -> document frequency, ordered so columns are deterministic
    let mut doc_frequency: BTreeMap<&str, u32> = BTreeMap::new();
    for tf in &counts {
        for term in tf.keys() {
            *doc_frequency.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    if doc_frequency.is_empty() {
        return Err(LexicalError::EmptyVocabulary);
    }

    let n = documents.len() as f64;
    let terms: Vec<String> = doc_frequency.keys().map(|t| t.to_string()).collect();
    let idf: Vec<f64> = doc_frequency
        .values()
        .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
        .collect();

    let rows = counts
        .iter()
        .map(|tf| {
            let mut row: Vec<f64> = terms
                .iter()
                .zip(&idf)
                .map(|(term, idf)| tf.get(term).copied().unwrap_or(0) as f64 * idf)
                .collect();
            let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > 0.0 {
                row.iter_mut().for_each(|x| *x /= norm);
            }
            row
        })
        .collect();

    Ok(TfIdfMatrix { terms, idf, rows })
}

/// TF-IDF cosine between the job text and the resume text, in [0, 1].
///
/// Falls back to [`LEXICAL_INDETERMINATE`] when neither text has a usable term.
pub fn lexical_similarity(jd: &str, resume: &str) -> f64 {
    match fit_transform(&[jd, resume]) {
        Ok(matrix) => cosine_similarity(&matrix.rows[0], &matrix.rows[1]).clamp(0.0, 1.0),
        Err(e) => {
            debug!(error = %e, fallback = LEXICAL_INDETERMINATE, "lexical similarity indeterminate");
            LEXICAL_INDETERMINATE
        }
    }
}
