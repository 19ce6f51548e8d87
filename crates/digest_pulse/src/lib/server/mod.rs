//! # HTTP interface
//!
//! Every model-backed component is built once at startup and shared with the
//! handlers through [`AppState`]. The concrete component types are bundled
//! in a [`Backends`] implementation, so the router can run against the real
//! tools or against test doubles.

mod error;
mod handlers;

use std::{path::PathBuf, sync::Arc};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use digest_store::{FsOutputStore, OutputStore};
use media_bindings::{Pdftoppm, Tesseract};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub use error::ApiError;
pub use handlers::{ExtractionStatus, ProcessResponse, VideoRequest, VideoResponse};

use crate::{
    document::{DocumentProcessor, DEFAULT_OCR_DPI},
    huggingface::HuggingFaceClient,
    keywords::KeywordExtractor,
    ocr::{PageRasterizer, TextExtractor, TextRecognizer},
    openai::OpenAIClient,
    summary::{ChunkedSummarizer, SummaryConfig},
    yt::{audio_handler::YtDlpWrapper, AudioHandler},
    Summarizer, Transcriber, VideoProcessor, VideoProcessorBuilder,
};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Where uploaded files are saved
    pub upload_dir: PathBuf,
    /// Parent of the per-job video working directories
    pub work_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub cors_origins: Vec<String>,
    pub ocr_dpi: u32,
    pub summary: SummaryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            work_dir: PathBuf::from("downloads"),
            max_upload_bytes: 100 * 1024 * 1024,
            cors_origins: Vec::new(),
            ocr_dpi: DEFAULT_OCR_DPI,
            summary: SummaryConfig::default(),
        }
    }
}

/// The concrete types behind each capability the handlers use
pub trait Backends: Send + Sync + 'static {
    type Store: OutputStore + Clone + Send + Sync + 'static;
    type Recognizer: TextRecognizer + Clone + Send + Sync + 'static;
    type Rasterizer: PageRasterizer + Send + Sync + 'static;
    type Audio: AudioHandler + Send + Sync + 'static;
    type Transcriber: Transcriber + Send + Sync + 'static;
    type Summarizer: Summarizer + Send + Sync + 'static;
}

/// External binaries for OCR and media, HTTP model endpoints for speech and
/// summarization, files on disk for output
#[derive(Debug)]
pub struct LiveBackends;

impl Backends for LiveBackends {
    type Store = FsOutputStore;
    type Recognizer = Tesseract;
    type Rasterizer = Pdftoppm;
    type Audio = YtDlpWrapper;
    type Transcriber = OpenAIClient;
    type Summarizer = HuggingFaceClient;
}

pub struct AppState<B: Backends> {
    pub config: ServerConfig,
    pub store: B::Store,
    pub summarizer: Arc<ChunkedSummarizer<B::Summarizer>>,
    pub keywords: KeywordExtractor,
    pub images: TextExtractor<B::Recognizer>,
    pub documents: DocumentProcessor<B::Recognizer, B::Rasterizer>,
    pub video: VideoProcessor<B::Store, B::Audio, B::Transcriber, B::Summarizer>,
}

impl<B: Backends> AppState<B> {
    pub fn new(
        config: ServerConfig,
        store: B::Store,
        recognizer: B::Recognizer,
        rasterizer: B::Rasterizer,
        audio_handler: B::Audio,
        transcriber: B::Transcriber,
        summarizer: B::Summarizer,
    ) -> Self {
        let summarizer = Arc::new(ChunkedSummarizer::with_config(
            summarizer,
            config.summary.clone(),
        ));
        let keywords = KeywordExtractor::default();

        let video = VideoProcessorBuilder::new(&config.work_dir)
            .store(store.clone())
            .audio_handler(audio_handler)
            .transcriber(transcriber)
            .summarizer(Arc::clone(&summarizer))
            .keywords(keywords)
            .build();

        Self {
            images: TextExtractor::new(recognizer.clone()),
            documents: DocumentProcessor::new(recognizer, rasterizer).with_dpi(config.ocr_dpi),
            config,
            store,
            summarizer,
            keywords,
            video,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin.trim())
                .inspect_err(|e| tracing::warn!(%origin, error = %e, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn router<B: Backends>(state: AppState<B>) -> Router {
    let body_limit = state.config.max_upload_bytes;
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/process", post(handlers::process::<B>))
        .route("/process_video", post(handlers::process_video::<B>))
        .route("/download/:filename", get(handlers::download::<B>))
        .route("/health", get(handlers::health))
        .route("/healthz", get(handlers::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
