use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use digest_pulse::{TranscribeResponse, Transcriber};

use super::MockError;

#[derive(Clone)]
pub struct MockTranscriber {
    pub response_text: String,
    pub calls: Arc<Mutex<Vec<PathBuf>>>,
    pub fail_with: Option<String>,
}

impl MockTranscriber {
    pub fn new(response_text: &str) -> Self {
        Self {
            response_text: response_text.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            response_text: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl Transcriber for MockTranscriber {
    type Error = MockError;

    fn model(&self) -> &str {
        "mock-whisper"
    }

    async fn transcribe(&self, audio_file: &Path) -> Result<TranscribeResponse, Self::Error> {
        self.calls.lock().unwrap().push(audio_file.to_path_buf());
        if let Some(ref msg) = self.fail_with {
            return Err(MockError(msg.clone()));
        }
        Ok(TranscribeResponse {
            text: self.response_text.clone(),
            duration: Some(120.0),
            segments: None,
        })
    }
}
