use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use digest_pulse::{
    document::DEFAULT_OCR_DPI,
    huggingface::HuggingFaceClient,
    openai::OpenAIClient,
    server::{router, AppState, LiveBackends, ServerConfig},
    summary::SummaryConfig,
    tracing::init_tracing_subscriber,
    yt::audio_handler::YtDlpWrapper,
};
use digest_store::FsOutputStore;
use media_bindings::{Ffmpeg, Pdftoppm, Tesseract, YtDlp};

#[derive(Parser)]
#[command(name = "digest-pulse", about = "Text, summary and keywords from images, PDFs and videos")]
struct Cli {
    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Directory uploaded files are saved to
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    upload_dir: PathBuf,

    /// Directory summaries and side files are written to
    #[arg(long, env = "OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    /// Working directory for video jobs
    #[arg(long, env = "WORK_DIR", default_value = "downloads")]
    work_dir: PathBuf,

    /// Maximum request body size in megabytes
    #[arg(long, env = "MAX_UPLOAD_MB", default_value = "100")]
    max_upload_mb: usize,

    /// Tokio worker threads
    #[arg(long, env = "WORKERS", default_value = "2")]
    workers: usize,

    /// Comma separated list of allowed CORS origins
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Vec<String>,

    /// Base URL of the summarization inference API
    #[arg(long, env = "SUMMARIZER_URL", default_value = HuggingFaceClient::DEFAULT_BASE_URL)]
    summarizer_url: String,

    #[arg(long, env = "SUMMARIZER_MODEL", default_value = HuggingFaceClient::DEFAULT_MODEL)]
    summarizer_model: String,

    #[arg(long, env = "SUMMARIZER_TOKEN")]
    summarizer_token: Option<String>,

    /// Base URL of the OpenAI-compatible transcription API
    #[arg(long, env = "WHISPER_URL", default_value = OpenAIClient::DEFAULT_BASE_URL)]
    whisper_url: String,

    #[arg(long, env = "WHISPER_MODEL", default_value = OpenAIClient::DEFAULT_MODEL)]
    whisper_model: String,

    #[arg(long, env = "WHISPER_API_KEY")]
    whisper_api_key: Option<String>,

    /// Path to yt-dlp cookies file
    #[arg(long, env = "YTDLP_COOKIES_PATH")]
    cookies_path: Option<PathBuf>,

    #[arg(long, env = "OCR_LANGUAGE", default_value = "eng")]
    ocr_language: String,

    #[arg(long, env = "OCR_DPI", default_value_t = DEFAULT_OCR_DPI)]
    ocr_dpi: u32,

    #[arg(long, env = "YTDLP_BIN", default_value = "yt-dlp")]
    ytdlp_bin: PathBuf,

    #[arg(long, env = "FFMPEG_BIN", default_value = "ffmpeg")]
    ffmpeg_bin: PathBuf,

    #[arg(long, env = "TESSERACT_BIN", default_value = "tesseract")]
    tesseract_bin: PathBuf,

    #[arg(long, env = "PDFTOPPM_BIN", default_value = "pdftoppm")]
    pdftoppm_bin: PathBuf,
}

async fn serve(cli: Cli) -> anyhow::Result<()> {
    let store = FsOutputStore::init(&cli.output_dir).await?;

    let mut transcriber = OpenAIClient::new(&cli.whisper_url).with_model(&cli.whisper_model);
    if let Some(api_key) = &cli.whisper_api_key {
        transcriber = transcriber.with_api_key(api_key);
    }

    let mut summarizer =
        HuggingFaceClient::new(&cli.summarizer_url).with_model(&cli.summarizer_model);
    if let Some(token) = &cli.summarizer_token {
        summarizer = summarizer.with_api_token(token);
    }

    let recognizer = Tesseract::new(&cli.tesseract_bin).with_language(&cli.ocr_language);
    let audio_handler = YtDlpWrapper::new(
        YtDlp::new_with_cookies(&cli.ytdlp_bin, cli.cookies_path.clone()),
        Ffmpeg::new(&cli.ffmpeg_bin),
    );

    let config = ServerConfig {
        upload_dir: cli.upload_dir,
        work_dir: cli.work_dir,
        max_upload_bytes: cli.max_upload_mb * 1024 * 1024,
        cors_origins: cli.cors_origins,
        ocr_dpi: cli.ocr_dpi,
        summary: SummaryConfig::default(),
    };
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.upload_dir.display()))?;

    let state = AppState::<LiveBackends>::new(
        config,
        store,
        recognizer,
        Pdftoppm::new(&cli.pdftoppm_bin),
        audio_handler,
        transcriber,
        summarizer,
    );

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .context("Invalid HOST/PORT")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Digest Pulse listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(cli.workers.max(1))
        .enable_all()
        .build()?
        .block_on(serve(cli))
}
