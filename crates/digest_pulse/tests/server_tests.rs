mod mocks;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use digest_pulse::server::{router, AppState, Backends, ServerConfig};
use digest_store::FsOutputStore;
use http_body_util::BodyExt;
use mocks::{
    audio_handler::MockAudioHandler,
    ocr::{MockRasterizer, MockRecognizer},
    summarizer::MockSummarizer,
    transcriber::MockTranscriber,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "digest-pulse-test-boundary";

struct MockBackends;

impl Backends for MockBackends {
    type Store = FsOutputStore;
    type Recognizer = MockRecognizer;
    type Rasterizer = MockRasterizer;
    type Audio = MockAudioHandler;
    type Transcriber = MockTranscriber;
    type Summarizer = MockSummarizer;
}

struct TestApp {
    router: Router,
    dirs: TempDir,
}

impl TestApp {
    async fn new(recognizer: MockRecognizer, audio_handler: MockAudioHandler) -> Self {
        let dirs = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            upload_dir: dirs.path().join("uploads"),
            work_dir: dirs.path().join("downloads"),
            ..Default::default()
        };
        let store = FsOutputStore::init(dirs.path().join("output")).await.unwrap();

        let state = AppState::<MockBackends>::new(
            config,
            store,
            recognizer,
            MockRasterizer { pages: 1 },
            audio_handler,
            MockTranscriber::new("The committee approved the budget. The budget passed."),
            MockSummarizer::new("The budget passed."),
        );

        Self {
            router: router(state),
            dirs,
        }
    }

    async fn with_defaults() -> Self {
        Self::new(
            MockRecognizer::new("  Invoice total due Friday. Invoice number 42.  "),
            MockAudioHandler::default(),
        )
        .await
    }

    fn output_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.dirs.path().join("output")) else {
            return Vec::new();
        };
        entries
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect()
    }

    fn upload_count(&self) -> usize {
        std::fs::read_dir(self.dirs.path().join("uploads"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send(request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }
}

fn multipart_request(uri: &str, field: &str, file_name: &str, contents: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ─── Health & downloads ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::with_defaults().await;
    for uri in ["/health", "/healthz"] {
        let (status, body) = app
            .send(Request::get(uri).body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }
}

#[tokio::test]
async fn test_unknown_download_is_not_found() {
    let app = TestApp::with_defaults().await;
    let (status, body) = app
        .send_json(
            Request::get("/download/summary_missing.txt")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "File summary_missing.txt not found"}));
}

#[tokio::test]
async fn test_download_does_not_escape_output_dir() {
    let app = TestApp::with_defaults().await;
    std::fs::write(app.dirs.path().join("secret.txt"), "secret").unwrap();

    let (status, _) = app
        .send(
            Request::get("/download/..%2Fsecret.txt")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── /process ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unsupported_upload_is_rejected_before_writing() {
    let app = TestApp::with_defaults().await;
    let (status, body) = app
        .send_json(multipart_request("/process", "file", "notes.txt", b"hello"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unsupported file type");
    assert!(app.output_files().is_empty());
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn test_missing_file_field() {
    let app = TestApp::with_defaults().await;
    let (status, body) = app
        .send_json(multipart_request("/process", "attachment", "scan.png", b"png"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn test_empty_file_name() {
    let app = TestApp::with_defaults().await;
    let (status, body) = app
        .send_json(multipart_request("/process", "file", "", b"png"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file selected");
}

#[tokio::test]
async fn test_image_upload_then_download_summary() {
    let app = TestApp::with_defaults().await;
    let (status, body) = app
        .send_json(multipart_request("/process", "file", "scan.PNG", b"\x89PNG fake"))
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(
        body["extracted_text"],
        "Invoice total due Friday. Invoice number 42."
    );
    assert_eq!(body["summary"], "The budget passed.");
    assert_eq!(body["summary_status"], "complete");
    assert_eq!(body["extraction_status"], "complete");
    assert_eq!(body["keywords"][0], "invoice");

    let download_url = body["download_url"].as_str().unwrap();
    assert!(download_url.starts_with("/download/summary_"));

    let (status, contents) = app
        .send(Request::get(download_url).body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    let contents = String::from_utf8(contents).unwrap();
    assert!(contents.contains("The budget passed."));
    assert!(contents.contains("invoice"));

    assert!(app.output_files().contains(&"extracted_text.txt".to_string()));
}

#[tokio::test]
async fn test_unreadable_image_is_an_extraction_failure() {
    let app = TestApp::new(
        MockRecognizer::failing("tesseract crashed"),
        MockAudioHandler::default(),
    )
    .await;
    let (status, body) = app
        .send_json(multipart_request("/process", "file", "scan.jpg", b"jpeg"))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to extract text from the file");
}

#[tokio::test]
async fn test_corrupt_pdf_is_an_extraction_failure() {
    let app = TestApp::with_defaults().await;
    let (status, body) = app
        .send_json(multipart_request("/process", "file", "report.pdf", b"not a pdf"))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to extract text from the file");
}

// ─── /process_video ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_video_source() {
    let app = TestApp::with_defaults().await;
    let (status, body) = app.send_json(json_request("/process_video", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No video source provided");
}

#[tokio::test]
async fn test_video_url_is_processed() {
    let app = TestApp::with_defaults().await;
    let (status, body) = app
        .send_json(json_request(
            "/process_video",
            json!({"video_source": "https://youtu.be/dQw4w9WgXcQ"}),
        ))
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["summary"], "The budget passed.");
    assert_eq!(body["summary_status"], "complete");
    assert_eq!(body["keywords"][0], "budget");
    assert!(body["download_url"]
        .as_str()
        .unwrap()
        .starts_with("/download/summary_"));
    assert!(app.output_files().contains(&"transcription.txt".to_string()));
}

#[tokio::test]
async fn test_video_upload_is_processed() {
    let audio_handler = MockAudioHandler::default();
    let calls = audio_handler.calls.clone();
    let app = TestApp::new(MockRecognizer::new(""), audio_handler).await;

    let (status, _) = app
        .send_json(multipart_request(
            "/process_video",
            "video_file",
            "lecture.mp4",
            b"fake video",
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(calls.lock().unwrap()[0].starts_with("extract:"));
    assert_eq!(app.upload_count(), 1);
}

#[tokio::test]
async fn test_failed_video_reports_empty_result() {
    let app = TestApp::new(
        MockRecognizer::new(""),
        MockAudioHandler::failing("Video unavailable"),
    )
    .await;
    let (status, body) = app
        .send_json(json_request(
            "/process_video",
            json!({"video_source": "https://youtu.be/dQw4w9WgXcQ"}),
        ))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Video unavailable"));
    assert_eq!(body["summary"], "");
    assert_eq!(body["download_url"], "");
    assert_eq!(body["keywords"], json!([]));
}
