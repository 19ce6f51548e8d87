use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use digest_pulse::ocr::{PageRasterizer, TextRecognizer};

use super::MockError;

#[derive(Clone)]
pub struct MockRecognizer {
    pub text: String,
    pub calls: Arc<Mutex<Vec<PathBuf>>>,
    pub fail_with: Option<String>,
}

impl MockRecognizer {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("")
        }
    }
}

impl TextRecognizer for MockRecognizer {
    type Error = MockError;

    async fn recognize(&self, image: &Path) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(image.to_path_buf());
        if let Some(ref msg) = self.fail_with {
            return Err(MockError(msg.clone()));
        }
        Ok(self.text.clone())
    }
}

/// Reports one page image per page without rendering anything
pub struct MockRasterizer {
    pub pages: usize,
}

impl PageRasterizer for MockRasterizer {
    type Error = MockError;

    async fn rasterize(
        &self,
        _pdf: &Path,
        _dpi: u32,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, Self::Error> {
        Ok((1..=self.pages)
            .map(|n| out_dir.join(format!("page-{n}.png")))
            .collect())
    }
}
