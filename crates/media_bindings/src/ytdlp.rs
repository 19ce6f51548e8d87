use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use rand::seq::SliceRandom;

use crate::{command, BindingError};

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
];

/// Picks one of a handful of common desktop browser user agents
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Audio downloads through the `yt-dlp` CLI
#[derive(Debug, Clone)]
pub struct YtDlp {
    bin: PathBuf,
    cookies: Option<PathBuf>,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl YtDlp {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            cookies: None,
        }
    }

    pub fn new_with_cookies(bin: impl Into<PathBuf>, cookies: Option<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            cookies,
        }
    }

    /// Downloads the best audio-only stream of `url` and converts it to
    /// `audio_format`.
    ///
    /// `output_template` is a yt-dlp template such as `dir/name.%(ext)s`; the
    /// caller is responsible for checking the converted file exists.
    #[tracing::instrument(skip(self))]
    pub async fn download_audio(
        &self,
        url: &str,
        audio_format: &str,
        output_template: &Path,
        user_agent: &str,
    ) -> Result<(), BindingError> {
        let args = self.download_audio_args(url, audio_format, output_template, user_agent);
        command::run(&self.bin, &args).await.map(|_| ())
    }

    fn download_audio_args(
        &self,
        url: &str,
        audio_format: &str,
        output_template: &Path,
        user_agent: &str,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--format".into(),
            "bestaudio/best".into(),
            "--extract-audio".into(),
            "--audio-format".into(),
            audio_format.into(),
            "--no-playlist".into(),
            "--no-progress".into(),
            "--extractor-retries".into(),
            "3".into(),
            "--retries".into(),
            "5".into(),
            "--fragment-retries".into(),
            "5".into(),
            "--user-agent".into(),
            user_agent.into(),
            "--add-header".into(),
            "Accept-Language:en-US,en;q=0.5".into(),
            "--output".into(),
            output_template.into(),
        ];

        if let Some(cookies) = &self.cookies {
            args.push("--cookies".into());
            args.push(cookies.into());
        }

        args.push("--".into());
        args.push(url.into());
        args
    }
}
