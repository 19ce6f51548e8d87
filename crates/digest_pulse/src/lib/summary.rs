//! # Chunked summarization
//!
//! Summarization models accept a bounded amount of input, so text is cut
//! into fixed-size character windows, sent to the model a few windows at a
//! time, and the per-window summaries are stitched back together in order.
//!
//! Failures degrade instead of propagating: a failed batch falls back to the
//! leading sentences of each of its windows, and a model that cannot be
//! reached at all falls back to a short preview of the input. Every window
//! records which of those happened so callers can tell a complete summary
//! from a partial one.

use itertools::Itertools;
use serde::Serialize;

use crate::{GenerationParams, Summarizer};

/// Returned in place of a summary when there is nothing to summarize
pub const NO_TEXT_SENTINEL: &str = "No text to summarize";

#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub max_chunk_chars: usize,
    pub batch_size: usize,
    pub preview_chars: usize,
    pub generation: GenerationParams,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: 1000,
            batch_size: 2,
            preview_chars: 200,
            generation: GenerationParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChunkOutcome {
    Generated,
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkSummary {
    pub index: usize,
    pub text: String,
    pub outcome: ChunkOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    /// Every window was summarized by the model
    Complete,
    /// Some windows fell back to their leading sentences
    Partial,
    /// No window was summarized by the model
    Degraded,
    /// The input was empty
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryResult {
    Empty,
    Chunked(Vec<ChunkSummary>),
    /// The model could not be invoked; holds a prefix of the input
    Preview { text: String, reason: String },
}

impl SummaryResult {
    pub fn text(&self) -> String {
        match self {
            SummaryResult::Empty => NO_TEXT_SENTINEL.to_string(),
            SummaryResult::Chunked(chunks) => chunks.iter().map(|c| c.text.as_str()).join(" "),
            SummaryResult::Preview { text, .. } => text.clone(),
        }
    }

    pub fn chunks(&self) -> &[ChunkSummary] {
        match self {
            SummaryResult::Chunked(chunks) => chunks,
            _ => &[],
        }
    }

    pub fn status(&self) -> SummaryStatus {
        match self {
            SummaryResult::Empty => SummaryStatus::Empty,
            SummaryResult::Preview { .. } => SummaryStatus::Degraded,
            SummaryResult::Chunked(chunks) => {
                let generated = chunks
                    .iter()
                    .filter(|c| c.outcome == ChunkOutcome::Generated)
                    .count();
                match generated {
                    n if n == chunks.len() => SummaryStatus::Complete,
                    0 => SummaryStatus::Degraded,
                    _ => SummaryStatus::Partial,
                }
            }
        }
    }
}

/// Splits `text` into contiguous windows of at most `max_chars` characters.
///
/// Windows ignore word and sentence boundaries. Concatenating the windows
/// gives back `text` exactly.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::with_capacity(text.len() / max_chars + 1);
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}

/// First two `". "`-separated sentences of `chunk`, closed with a period
pub fn leading_sentences(chunk: &str) -> String {
    format!("{}.", chunk.split(". ").take(2).join(". "))
}

/// The first `max_chars` characters of `text`, with an ellipsis if cut
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[derive(Debug)]
pub struct ChunkedSummarizer<S> {
    backend: S,
    config: SummaryConfig,
}

impl<S> ChunkedSummarizer<S>
where
    S: Summarizer + Send + Sync,
{
    pub fn new(backend: S) -> Self {
        Self::with_config(backend, SummaryConfig::default())
    }

    pub fn with_config(backend: S, config: SummaryConfig) -> Self {
        Self { backend, config }
    }

    #[tracing::instrument(skip_all, fields(model = self.backend.model(), chars = text.len()))]
    pub async fn summarize(&self, text: &str) -> SummaryResult {
        if text.trim().is_empty() {
            return SummaryResult::Empty;
        }

        let chunks = chunk_text(text, self.config.max_chunk_chars);
        tracing::info!(count = chunks.len(), "Summarizing chunks");

        let mut summaries: Vec<ChunkSummary> = Vec::with_capacity(chunks.len());

        for (batch_idx, batch) in chunks.chunks(self.config.batch_size.max(1)).enumerate() {
            let first_index = summaries.len();

            let reason = match self
                .backend
                .summarize_batch(batch, &self.config.generation)
                .await
            {
                Ok(outputs) if outputs.len() == batch.len() => {
                    summaries.extend(outputs.into_iter().enumerate().map(|(offset, text)| {
                        ChunkSummary {
                            index: first_index + offset,
                            text: text.trim().to_string(),
                            outcome: ChunkOutcome::Generated,
                        }
                    }));
                    continue;
                }
                Ok(outputs) => format!(
                    "model returned {} summaries for {} chunks",
                    outputs.len(),
                    batch.len()
                ),
                Err(e) if summaries.is_empty() && S::is_unavailable(&e) => {
                    tracing::error!(error = %e, "Summarization model unavailable");
                    return SummaryResult::Preview {
                        text: preview(text, self.config.preview_chars),
                        reason: e.to_string(),
                    };
                }
                Err(e) => e.to_string(),
            };

            tracing::warn!(batch = batch_idx + 1, %reason, "Batch failed, using leading sentences");
            summaries.extend(batch.iter().enumerate().map(|(offset, chunk)| ChunkSummary {
                index: first_index + offset,
                text: leading_sentences(chunk),
                outcome: ChunkOutcome::Fallback {
                    reason: reason.clone(),
                },
            }));
        }

        SummaryResult::Chunked(summaries)
    }
}
