use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{command, BindingError};

/// `ffmpeg` invocations used by the audio pipeline
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    bin: PathBuf,
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Ffmpeg {
    /// Sample rate the speech models expect
    pub const SAMPLE_RATE: u32 = 16_000;

    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    /// Demuxes the audio track of `video` into an mp3 at `output`,
    /// overwriting any existing file
    #[tracing::instrument(skip(self))]
    pub async fn extract_audio(&self, video: &Path, output: &Path) -> Result<(), BindingError> {
        command::run(&self.bin, &extract_audio_args(video, output)).await?;
        command::expect_output(&self.bin, output).await
    }

    /// Re-encodes `input` to a mono 16-bit PCM waveform at `output`
    #[tracing::instrument(skip(self))]
    pub async fn convert_to_wav(&self, input: &Path, output: &Path) -> Result<(), BindingError> {
        command::run(&self.bin, &convert_to_wav_args(input, output)).await?;
        command::expect_output(&self.bin, output).await
    }
}

fn extract_audio_args(video: &Path, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        video.into(),
        "-vn".into(),
        "-acodec".into(),
        "libmp3lame".into(),
        "-f".into(),
        "mp3".into(),
        output.into(),
    ]
}

fn convert_to_wav_args(input: &Path, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        input.into(),
        "-ar".into(),
        Ffmpeg::SAMPLE_RATE.to_string().into(),
        "-ac".into(),
        "1".into(),
        "-c:a".into(),
        "pcm_s16le".into(),
        output.into(),
    ]
}
