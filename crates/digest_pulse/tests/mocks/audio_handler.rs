use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use digest_pulse::{error::DownloadError, yt::AudioHandler};

#[derive(Clone, Default)]
pub struct MockAudioHandler {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
    pub normalize_fails: bool,
}

impl MockAudioHandler {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn without_ffmpeg() -> Self {
        Self {
            normalize_fails: true,
            ..Default::default()
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn write_fake_audio(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"ID3 fake mp3").unwrap();
        path
    }
}

impl AudioHandler for MockAudioHandler {
    async fn download(&self, url: &str, dir: &Path) -> Result<PathBuf, DownloadError> {
        self.record(format!("download:{url}"));
        if let Some(ref msg) = self.fail_with {
            return Err(DownloadError::Failed(msg.clone()));
        }
        Ok(Self::write_fake_audio(dir, "youtube_audio.mp3"))
    }

    async fn extract(&self, video: &Path, dir: &Path) -> Result<PathBuf, DownloadError> {
        self.record(format!("extract:{}", video.display()));
        if let Some(ref msg) = self.fail_with {
            return Err(DownloadError::Extraction(msg.clone()));
        }
        let stem = video.file_stem().unwrap().to_string_lossy();
        Ok(Self::write_fake_audio(dir, &format!("{stem}.mp3")))
    }

    async fn normalize(&self, audio: &Path, dir: &Path) -> anyhow::Result<PathBuf> {
        self.record(format!(
            "normalize:{}",
            audio.file_name().unwrap().to_string_lossy()
        ));
        if self.normalize_fails {
            anyhow::bail!("ffmpeg is not installed or not on PATH");
        }
        Ok(Self::write_fake_audio(dir, "converted_audio.wav"))
    }
}
