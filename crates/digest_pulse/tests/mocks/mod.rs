#![allow(dead_code)]

pub mod audio_handler;
pub mod ocr;
pub mod store;
pub mod summarizer;
pub mod transcriber;

/// Error type shared by the mocks
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MockError(pub String);
