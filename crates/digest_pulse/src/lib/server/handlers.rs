use std::{
    path::{Path as FsPath, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    body::Body,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use digest_store::OutputStore;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use crate::{
    server::{ApiError, AppState, Backends},
    summary::SummaryStatus,
    yt::VideoSource,
    VideoOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadKind {
    Image,
    Pdf,
}

impl UploadKind {
    fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = FsPath::new(file_name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match extension.as_str() {
            "png" | "jpg" | "jpeg" => Some(UploadKind::Image),
            "pdf" => Some(UploadKind::Pdf),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Complete,
    /// Some PDF pages could not be read
    Partial,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub extracted_text: String,
    pub summary: String,
    pub download_url: String,
    pub keywords: Vec<String>,
    pub summary_status: SummaryStatus,
    pub extraction_status: ExtractionStatus,
}

#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    pub video_source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoResponse {
    pub summary: String,
    pub download_url: String,
    pub keywords: Vec<String>,
    pub summary_status: SummaryStatus,
}

/// An uploaded file, held in memory until it passes validation
struct Upload {
    file_name: String,
    bytes: axum::body::Bytes,
}

/// Pulls the `field` file part out of a multipart body
async fn read_upload(multipart: &mut Multipart, field: &str) -> Result<Upload, ApiError> {
    while let Some(part) = multipart.next_field().await? {
        if part.name() != Some(field) {
            continue;
        }
        let file_name = part.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(ApiError::BadRequest("No file selected".into()));
        }
        let bytes = part.bytes().await?;
        return Ok(Upload { file_name, bytes });
    }
    Err(ApiError::BadRequest("No file uploaded".into()))
}

/// Writes an upload under a generated name, keeping its extension
async fn save_upload(upload_dir: &FsPath, upload: &Upload) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .with_context(|| format!("Failed to create upload directory {}", upload_dir.display()))?;

    let extension = FsPath::new(&upload.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let path = upload_dir.join(format!("{}.{extension}", uuid::Uuid::new_v4().simple()));

    tokio::fs::write(&path, &upload.bytes)
        .await
        .with_context(|| format!("Failed to save upload to {}", path.display()))?;
    tracing::info!(file_name = %upload.file_name, path = ?path, "Saved upload");
    Ok(path)
}

#[tracing::instrument(skip_all)]
pub(super) async fn process<B: Backends>(
    State(state): State<Arc<AppState<B>>>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, ApiError> {
    let upload = read_upload(&mut multipart, "file").await?;
    let kind = UploadKind::from_file_name(&upload.file_name).ok_or(ApiError::UnsupportedFileType)?;
    if upload.bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".into()));
    }

    let path = save_upload(&state.config.upload_dir, &upload).await?;

    let (text, extraction_status) = match kind {
        UploadKind::Image => (
            state.images.extract_text(&path).await,
            ExtractionStatus::Complete,
        ),
        UploadKind::Pdf => match state.documents.extract_text(&path).await {
            Ok(Some(doc)) => {
                let status = if doc.is_partial() {
                    ExtractionStatus::Partial
                } else {
                    ExtractionStatus::Complete
                };
                (Some(doc.text), status)
            }
            Ok(None) => (None, ExtractionStatus::Complete),
            Err(e) => {
                tracing::error!(error = %e, "Failed to process PDF");
                (None, ExtractionStatus::Complete)
            }
        },
    };

    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return Err(ApiError::ExtractionFailed);
    };

    state.store.save_extracted_text(&text).await?;

    let summary = state.summarizer.summarize(&text).await;
    let keywords = state.keywords.extract(&text);
    let stored = state.store.save_summary(&summary.text(), &keywords).await?;

    Ok(Json(ProcessResponse {
        summary: summary.text(),
        summary_status: summary.status(),
        extracted_text: text,
        download_url: stored.download_url(),
        keywords,
        extraction_status,
    }))
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case("multipart/form-data"))
}

/// Accepts either a `video_file` upload or a JSON `video_source` URL
async fn read_video_source(
    upload_dir: &FsPath,
    request: Request,
) -> Result<VideoSource, ApiError> {
    if is_multipart(request.headers()) {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        let upload = read_upload(&mut multipart, "video_file").await?;
        let path = save_upload(upload_dir, &upload).await?;
        return Ok(VideoSource::Local(path));
    }

    let Json(body) = Json::<VideoRequest>::from_request(request, &())
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;

    match body.video_source.as_deref().map(VideoSource::parse) {
        Some(source @ VideoSource::Remote(_)) => Ok(source),
        Some(VideoSource::Local(_)) => Err(ApiError::BadRequest(
            "video_source must be an http(s) URL".into(),
        )),
        None => Err(ApiError::BadRequest("No video source provided".into())),
    }
}

#[tracing::instrument(skip_all)]
pub(super) async fn process_video<B: Backends>(
    State(state): State<Arc<AppState<B>>>,
    request: Request,
) -> Result<Json<VideoResponse>, ApiError> {
    let source = read_video_source(&state.config.upload_dir, request).await?;

    match state.video.process(&source).await? {
        VideoOutcome::Done(digest) => Ok(Json(VideoResponse {
            summary: digest.summary.text(),
            summary_status: digest.summary.status(),
            download_url: digest.download_url,
            keywords: digest.keywords,
        })),
        VideoOutcome::Failed { error } => Err(ApiError::VideoFailed { error }),
    }
}

#[tracing::instrument(skip(state))]
pub(super) async fn download<B: Backends>(
    State(state): State<Arc<AppState<B>>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let Some(path) = state.store.locate(&filename).await? else {
        return Err(ApiError::NotFound(filename));
    };

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(filename));
        }
        Err(e) => return Err(anyhow::Error::from(e).context("Failed to open download").into()),
    };

    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}

pub(super) async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
