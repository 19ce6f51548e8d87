//! # Digest Pulse
//!
//! Turns images, PDFs and videos into extracted text, a short summary and a
//! handful of keywords, and serves the results over HTTP.

pub mod document;
pub mod error;
pub mod keywords;
mod llm;
pub mod ocr;
mod processor;
pub mod server;
pub mod summary;
pub mod tracing;
pub mod yt;

pub use llm::{huggingface, openai};
pub use llm::{
    summarizer::{GenerationParams, Summarizer},
    transcriber::{TranscribeResponse, TranscribeSegment, Transcriber},
};
pub use processor::{
    builder::VideoProcessorBuilder, PipelineStage, VideoDigest, VideoOutcome, VideoProcessor,
};
