use std::sync::{Arc, Mutex};

use digest_pulse::{GenerationParams, Summarizer};

use super::MockError;

#[derive(Clone)]
pub struct MockSummarizer {
    pub summary: String,
    pub calls: Arc<Mutex<Vec<Vec<String>>>>,
    pub fail_with: Option<String>,
    pub unavailable: bool,
}

impl MockSummarizer {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            unavailable: false,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("")
        }
    }

    /// Behaves like a model endpoint that refuses connections
    pub fn unreachable() -> Self {
        Self {
            unavailable: true,
            ..Self::failing("connection refused")
        }
    }
}

impl Summarizer for MockSummarizer {
    type Error = MockError;

    fn model(&self) -> &str {
        "mock-bart"
    }

    async fn summarize_batch(
        &self,
        chunks: &[&str],
        _params: &GenerationParams,
    ) -> Result<Vec<String>, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push(chunks.iter().map(|c| c.to_string()).collect());
        if let Some(ref msg) = self.fail_with {
            return Err(MockError(msg.clone()));
        }
        Ok(chunks.iter().map(|_| self.summary.clone()).collect())
    }

    fn is_unavailable(error: &Self::Error) -> bool {
        error.0 == "connection refused"
    }
}
