use std::{future::Future, path::Path};

use serde::Deserialize;

pub trait Transcriber {
    type Error: std::error::Error + Send + Sync + 'static;

    fn model(&self) -> &str;

    fn transcribe(
        &self,
        audio_file: &Path,
    ) -> impl Future<Output = Result<TranscribeResponse, Self::Error>> + Send;
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscribeResponse {
    pub text: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub segments: Option<Vec<TranscribeSegment>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscribeSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}
