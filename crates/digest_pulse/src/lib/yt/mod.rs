pub mod audio_handler;
pub mod url;

use std::{
    future::Future,
    path::{Path, PathBuf},
};

use crate::error::DownloadError;

/// Where the audio of a video job comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    Remote(String),
    Local(PathBuf),
}

impl VideoSource {
    /// `http(s)://` sources are remote, anything else is a local path
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            VideoSource::Remote(source.to_string())
        } else {
            VideoSource::Local(PathBuf::from(source))
        }
    }
}

pub trait AudioHandler {
    /// Fetches the audio track of a remote video into `dir` as mp3
    fn download(
        &self,
        url: &str,
        dir: &Path,
    ) -> impl Future<Output = Result<PathBuf, DownloadError>> + Send;

    /// Demuxes the audio track of a local video into `dir` as mp3
    fn extract(
        &self,
        video: &Path,
        dir: &Path,
    ) -> impl Future<Output = Result<PathBuf, DownloadError>> + Send;

    /// Re-encodes `audio` into the waveform the transcriber expects
    fn normalize(
        &self,
        audio: &Path,
        dir: &Path,
    ) -> impl Future<Output = anyhow::Result<PathBuf>> + Send;
}
