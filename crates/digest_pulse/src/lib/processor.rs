pub mod builder;

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use digest_store::{JobResult, OutputStore};

use crate::{
    keywords::KeywordExtractor,
    summary::{ChunkedSummarizer, SummaryResult},
    yt::{url::video_id, AudioHandler, VideoSource},
    Summarizer, Transcriber,
};

/// Checkpoints of a video job, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    AudioAcquired,
    AudioNormalized,
    Transcribed,
    Summarized,
    KeywordsExtracted,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Start => "start",
            PipelineStage::AudioAcquired => "audio_acquired",
            PipelineStage::AudioNormalized => "audio_normalized",
            PipelineStage::Transcribed => "transcribed",
            PipelineStage::Summarized => "summarized",
            PipelineStage::KeywordsExtracted => "keywords_extracted",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct VideoDigest {
    pub transcript: String,
    pub summary: SummaryResult,
    pub keywords: Vec<String>,
    pub download_url: String,
}

#[derive(Debug, Clone)]
pub enum VideoOutcome {
    Done(VideoDigest),
    /// The audio could not be obtained
    Failed { error: String },
}

impl VideoOutcome {
    pub fn into_job_result(self) -> JobResult {
        match self {
            VideoOutcome::Done(digest) => {
                JobResult::succeeded(digest.summary.text(), digest.keywords, digest.download_url)
            }
            VideoOutcome::Failed { error } => JobResult::failed(error),
        }
    }
}

/// Turns a video into a transcript, a summary and keywords
#[derive(Debug)]
pub struct VideoProcessor<D, A, T, S>
where
    D: OutputStore + Send + Sync + 'static,
    A: AudioHandler + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    workdir: PathBuf,
    store: D,
    audio_handler: A,
    transcriber: T,
    summarizer: Arc<ChunkedSummarizer<S>>,
    keywords: KeywordExtractor,
}

impl<D, A, T, S> VideoProcessor<D, A, T, S>
where
    D: OutputStore + Send + Sync + 'static,
    A: AudioHandler + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    /// Each job works in its own directory so concurrent jobs never share
    /// intermediate files
    async fn create_job_dir(&self) -> anyhow::Result<PathBuf> {
        let job_dir = self
            .workdir
            .join(uuid::Uuid::new_v4().simple().to_string());
        tokio::fs::create_dir_all(&job_dir)
            .await
            .with_context(|| format!("Failed to create job directory {}", job_dir.display()))?;
        Ok(job_dir)
    }

    #[tracing::instrument(skip(self))]
    async fn acquire_audio(&self, source: &VideoSource, job_dir: &Path) -> Result<PathBuf, String> {
        let audio = match source {
            VideoSource::Remote(url) => {
                tracing::info!(video_id = ?video_id(url), "Downloading audio");
                self.audio_handler.download(url, job_dir).await
            }
            VideoSource::Local(path) => self.audio_handler.extract(path, job_dir).await,
        };

        audio
            .inspect_err(|e| tracing::error!(error = %e, "Failed to acquire audio"))
            .map_err(|e| e.to_string())
    }

    /// Falls back to the compressed audio when re-encoding fails
    #[tracing::instrument(skip(self))]
    async fn normalize_audio(&self, audio: PathBuf, job_dir: &Path) -> PathBuf {
        match self.audio_handler.normalize(&audio, job_dir).await {
            Ok(wav) => wav,
            Err(e) => {
                tracing::warn!(error = ?e, "Audio normalization failed, transcribing compressed audio");
                audio
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn transcribe(&self, audio: &Path) -> String {
        match self.transcriber.transcribe(audio).await {
            Ok(response) => {
                tracing::debug!(
                    duration = ?response.duration,
                    segments = response.segments.as_ref().map_or(0, Vec::len),
                    "Transcription received"
                );
                response.text.trim().to_string()
            }
            Err(e) => {
                tracing::error!(error = %e, model = self.transcriber.model(), "Transcription failed");
                String::new()
            }
        }
    }

    /// Runs a video job to completion.
    ///
    /// Unobtainable audio is reported as [`VideoOutcome::Failed`]; the only
    /// errors returned are failures to write output files.
    #[tracing::instrument(skip(self))]
    pub async fn process(&self, source: &VideoSource) -> anyhow::Result<VideoOutcome> {
        let job_dir = self.create_job_dir().await?;
        tracing::debug!(stage = %PipelineStage::Start, job_dir = ?job_dir);

        let audio = match self.acquire_audio(source, &job_dir).await {
            Ok(audio) => audio,
            Err(error) => {
                tracing::info!(stage = %PipelineStage::Failed, %error);
                return Ok(VideoOutcome::Failed { error });
            }
        };
        tracing::debug!(stage = %PipelineStage::AudioAcquired, audio = ?audio);

        let audio = self.normalize_audio(audio, &job_dir).await;
        tracing::debug!(stage = %PipelineStage::AudioNormalized, audio = ?audio);

        let transcript = self.transcribe(&audio).await;
        self.store
            .save_transcript(&transcript)
            .await
            .context("Failed to save transcript")?;
        tracing::debug!(stage = %PipelineStage::Transcribed, chars = transcript.len());

        let summary = self.summarizer.summarize(&transcript).await;
        tracing::debug!(stage = %PipelineStage::Summarized, status = ?summary.status());

        let keywords = self.keywords.extract(&transcript);
        tracing::debug!(stage = %PipelineStage::KeywordsExtracted, count = keywords.len());

        let stored = self
            .store
            .save_summary(&summary.text(), &keywords)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to save summary"))
            .context("Failed to save summary")?;
        tracing::info!(stage = %PipelineStage::Done, file = %stored.file_name, "Video processed");

        Ok(VideoOutcome::Done(VideoDigest {
            transcript,
            summary,
            keywords,
            download_url: stored.download_url(),
        }))
    }
}
