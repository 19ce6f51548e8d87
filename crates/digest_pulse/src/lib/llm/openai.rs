//! Client for OpenAI-compatible speech-to-text endpoints.
//!
//! Works against the hosted API as well as self-hosted whisper servers that
//! expose `/audio/transcriptions`, which is how the small `tiny` model is
//! usually served.

use std::path::Path;

use reqwest::Client;

use crate::{TranscribeResponse, Transcriber};

#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

impl OpenAIClient {
    pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &str = "tiny";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: None,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: Self::DEFAULT_MODEL.into(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub async fn send_transcribe_request(
        &self,
        audio_path: &Path,
    ) -> Result<TranscribeResponse, OpenAIError> {
        let bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string();
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(audio_path))?;

        let form = reqwest::multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .part("file", part);

        let mut request = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .multipart(form);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let resp = request
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        Ok(resp.json::<TranscribeResponse>().await?)
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        _ => "audio/wav",
    }
}

impl Transcriber for OpenAIClient {
    type Error = OpenAIError;

    fn model(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(skip(self), fields(model = %self.model))]
    async fn transcribe(&self, audio_file: &Path) -> Result<TranscribeResponse, Self::Error> {
        let response = self
            .send_transcribe_request(audio_file)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to transcribe audio"))?;

        tracing::info!(
            chars = response.text.len(),
            duration = ?response.duration,
            "Transcription complete"
        );
        Ok(response)
    }
}
