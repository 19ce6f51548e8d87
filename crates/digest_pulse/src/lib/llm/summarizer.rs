use std::future::Future;

use serde::Serialize;

/// Decoding bounds passed with every summarization request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
    pub truncation: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_length: 30,
            do_sample: false,
            truncation: true,
        }
    }
}

/// An abstractive summarization model that accepts a batch of inputs
pub trait Summarizer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn model(&self) -> &str;

    /// Summarizes every chunk in `chunks`, returning one summary per chunk in
    /// the same order
    fn summarize_batch(
        &self,
        chunks: &[&str],
        params: &GenerationParams,
    ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;

    /// Whether `error` means the model could not be reached at all, as
    /// opposed to failing on this particular input
    fn is_unavailable(_error: &Self::Error) -> bool {
        false
    }
}
