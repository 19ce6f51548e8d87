use std::sync::LazyLock;

use media_bindings::BindingError;
use regex::Regex;

static RATE_LIMIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)HTTP Error 429\b|\b429:? Too Many Requests")
        .expect("rate limit pattern is valid")
});

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to read document: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to open document: {0}")]
    Open(#[from] lopdf::Error),
}

/// Why the audio for a video job could not be obtained
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("YouTube is rate limiting requests. Please wait a few minutes and try again.")]
    RateLimited,
    #[error(
        "YouTube is blocking automated requests. Please try again later or use a different video."
    )]
    BotDetected,
    #[error("Failed to download video after multiple attempts: {0}")]
    Failed(String),
    #[error("Error extracting audio: {0}")]
    Extraction(String),
}

impl DownloadError {
    /// Classifies a failed download from the tool's diagnostic output
    pub fn classify(output: &str) -> Self {
        if output.contains("Sign in to confirm you're not a bot") {
            DownloadError::BotDetected
        } else if RATE_LIMIT_RE.is_match(output) {
            DownloadError::RateLimited
        } else {
            let detail = output.lines().rev().find(|l| !l.trim().is_empty());
            DownloadError::Failed(detail.unwrap_or("unknown error").trim().to_string())
        }
    }
}

impl From<BindingError> for DownloadError {
    fn from(e: BindingError) -> Self {
        match e {
            BindingError::Failed { .. } => DownloadError::classify(e.stderr()),
            other => DownloadError::Failed(other.to_string()),
        }
    }
}
