//! Client for Hugging Face style summarization inference endpoints.
//!
//! The request body is `{"inputs": [...], "parameters": {...}}` and the
//! response is one `{"summary_text": ...}` object per input, which is the
//! shape served both by the hosted inference API and by text-generation
//! inference containers running a summarization pipeline.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{GenerationParams, Summarizer};

#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    client: Client,
    api_token: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum HuggingFaceError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Expected {expected} summaries, got {got}")]
    BatchMismatch { expected: usize, got: usize },
}

#[derive(Debug, Serialize)]
struct SummarizationRequest<'a> {
    inputs: &'a [&'a str],
    parameters: &'a GenerationParams,
}

#[derive(Debug, Deserialize)]
struct SummarizationOutput {
    summary_text: String,
}

impl HuggingFaceClient {
    pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
    pub const DEFAULT_MODEL: &str = "facebook/bart-large-cnn";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_token: None,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: Self::DEFAULT_MODEL.into(),
        }
    }

    pub fn with_api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }

    pub async fn send_summarization_request(
        &self,
        inputs: &[&str],
        params: &GenerationParams,
    ) -> Result<Vec<String>, HuggingFaceError> {
        let body = SummarizationRequest {
            inputs,
            parameters: params,
        };

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(HuggingFaceError::Api { status, message });
        }

        let outputs = resp.json::<Vec<SummarizationOutput>>().await?;
        if outputs.len() != inputs.len() {
            return Err(HuggingFaceError::BatchMismatch {
                expected: inputs.len(),
                got: outputs.len(),
            });
        }

        Ok(outputs.into_iter().map(|o| o.summary_text).collect())
    }
}

impl Summarizer for HuggingFaceClient {
    type Error = HuggingFaceError;

    fn model(&self) -> &str {
        &self.model
    }

    async fn summarize_batch(
        &self,
        chunks: &[&str],
        params: &GenerationParams,
    ) -> Result<Vec<String>, Self::Error> {
        self.send_summarization_request(chunks, params)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize batch"))
    }

    fn is_unavailable(error: &Self::Error) -> bool {
        match error {
            HuggingFaceError::Request(e) => e.is_connect() || e.is_builder(),
            // bad token, gated model, unknown model
            HuggingFaceError::Api { status, .. } => matches!(*status, 401 | 403 | 404),
            HuggingFaceError::BatchMismatch { .. } => false,
        }
    }
}
