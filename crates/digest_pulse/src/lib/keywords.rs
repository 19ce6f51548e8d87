//! Keyword extraction by TF-IDF over a single-document corpus.
//!
//! Tokens are lowercased runs of two or more word characters with English
//! stop words removed. With one document every smoothed IDF equals one, so
//! the ranking reduces to L2-normalized term counts.

use std::{
    collections::{HashMap, HashSet},
    sync::LazyLock,
};

use regex::Regex;

pub const DEFAULT_TOP_N: usize = 10;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?u)\b\w\w+\b").expect("Failed to compile token regex")
});

static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| include_str!("keywords/stop_words.txt").lines().collect());

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum KeywordError {
    #[error("empty vocabulary; perhaps the document only contains stop words")]
    EmptyVocabulary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTerm {
    pub term: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct KeywordExtractor {
    top_n: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

impl KeywordExtractor {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Ranked terms, highest score first, ties in ascending term order
    pub fn score(&self, text: &str) -> Result<Vec<ScoredTerm>, KeywordError> {
        let lowered = text.to_lowercase();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for token in TOKEN_RE.find_iter(&lowered).map(|m| m.as_str()) {
            if !STOP_WORDS.contains(token) {
                *counts.entry(token).or_default() += 1;
            }
        }

        if counts.is_empty() {
            return Err(KeywordError::EmptyVocabulary);
        }

        // smoothed idf: ln((1 + n) / (1 + df)) + 1 with n = df = 1
        let idf = 1.0_f64;
        let norm = counts
            .values()
            .map(|&c| (c as f64 * idf).powi(2))
            .sum::<f64>()
            .sqrt();

        let mut terms: Vec<ScoredTerm> = counts
            .into_iter()
            .map(|(term, count)| ScoredTerm {
                term: term.to_string(),
                score: count as f64 * idf / norm,
            })
            .collect();

        terms.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.term.cmp(&b.term)));
        terms.truncate(self.top_n);

        Ok(terms)
    }

    /// Top terms of `text`; empty when nothing survives tokenization
    pub fn extract(&self, text: &str) -> Vec<String> {
        match self.score(text) {
            Ok(terms) => terms.into_iter().map(|t| t.term).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Keyword extraction produced nothing");
                Vec::new()
            }
        }
    }
}
