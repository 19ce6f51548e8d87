use std::path::{Path, PathBuf};

use anyhow::Context;
use media_bindings::{random_user_agent, BindingError, Ffmpeg, YtDlp};

use crate::{
    error::DownloadError,
    yt::{url::alternate_url, AudioHandler},
};

/// Audio acquisition backed by the `yt-dlp` and `ffmpeg` binaries
#[derive(Debug, Clone, Default)]
pub struct YtDlpWrapper {
    yt_dlp: YtDlp,
    ffmpeg: Ffmpeg,
}

impl YtDlpWrapper {
    const AUDIO_FORMAT: &str = "mp3";
    const REMOTE_BASE_NAME: &str = "youtube_audio";
    const WAV_FILE_NAME: &str = "converted_audio.wav";

    pub fn new(yt_dlp: YtDlp, ffmpeg: Ffmpeg) -> Self {
        Self { yt_dlp, ffmpeg }
    }

    async fn try_download(&self, url: &str, dir: &Path) -> Result<PathBuf, BindingError> {
        let output_template = dir.join(format!("{}.%(ext)s", Self::REMOTE_BASE_NAME));
        let audio_path = dir.join(format!("{}.{}", Self::REMOTE_BASE_NAME, Self::AUDIO_FORMAT));

        self.yt_dlp
            .download_audio(url, Self::AUDIO_FORMAT, &output_template, random_user_agent())
            .await?;

        if !tokio::fs::try_exists(&audio_path).await.unwrap_or(false) {
            return Err(BindingError::MissingOutput {
                program: "yt-dlp".into(),
                path: audio_path,
            });
        }
        Ok(audio_path)
    }
}

impl AudioHandler for YtDlpWrapper {
    #[tracing::instrument(skip(self))]
    async fn download(&self, url: &str, dir: &Path) -> Result<PathBuf, DownloadError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| DownloadError::Failed(e.to_string()))?;

        let first_error = match self.try_download(url, dir).await {
            Ok(path) => return Ok(path),
            Err(e) => e,
        };
        tracing::warn!(error = %first_error, "Download failed");

        // a single retry with the other spelling of the same video
        let Some(alternate) = alternate_url(url) else {
            return Err(first_error.into());
        };
        tracing::info!(%alternate, "Retrying with alternate URL");

        self.try_download(&alternate, dir)
            .await
            .map_err(DownloadError::from)
            .inspect_err(|e| tracing::error!(error = %e, "Download failed with alternate URL"))
    }

    #[tracing::instrument(skip(self))]
    async fn extract(&self, video: &Path, dir: &Path) -> Result<PathBuf, DownloadError> {
        let stem = video
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("video_audio");
        let audio_path = dir.join(format!("{stem}.{}", Self::AUDIO_FORMAT));

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| DownloadError::Extraction(e.to_string()))?;

        self.ffmpeg
            .extract_audio(video, &audio_path)
            .await
            .map_err(|e| DownloadError::Extraction(e.to_string()))
            .inspect_err(|e| tracing::error!(error = %e, "Failed to extract audio"))?;

        Ok(audio_path)
    }

    #[tracing::instrument(skip(self))]
    async fn normalize(&self, audio: &Path, dir: &Path) -> anyhow::Result<PathBuf> {
        let wav_path = dir.join(Self::WAV_FILE_NAME);
        self.ffmpeg
            .convert_to_wav(audio, &wav_path)
            .await
            .with_context(|| format!("Failed to convert {} to wav", audio.display()))?;
        Ok(wav_path)
    }
}
