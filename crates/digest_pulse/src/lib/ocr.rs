use std::{
    future::Future,
    path::{Path, PathBuf},
};

use media_bindings::{BindingError, Pdftoppm, Tesseract};

/// Reads printed text off an image file
pub trait TextRecognizer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn recognize(&self, image: &Path) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Renders each page of a PDF to an image, returned in page order
pub trait PageRasterizer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn rasterize(
        &self,
        pdf: &Path,
        dpi: u32,
        out_dir: &Path,
    ) -> impl Future<Output = Result<Vec<PathBuf>, Self::Error>> + Send;
}

impl TextRecognizer for Tesseract {
    type Error = BindingError;

    async fn recognize(&self, image: &Path) -> Result<String, Self::Error> {
        self.image_to_string(image).await
    }
}

impl PageRasterizer for Pdftoppm {
    type Error = BindingError;

    async fn rasterize(
        &self,
        pdf: &Path,
        dpi: u32,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, Self::Error> {
        Pdftoppm::rasterize(self, pdf, dpi, out_dir).await
    }
}

/// Image to text
#[derive(Debug, Clone)]
pub struct TextExtractor<R> {
    recognizer: R,
}

impl<R> TextExtractor<R>
where
    R: TextRecognizer + Send + Sync,
{
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    /// Trimmed text found in `image`.
    ///
    /// `None` means recognition failed; an image without text gives
    /// `Some("")`.
    #[tracing::instrument(skip(self))]
    pub async fn extract_text(&self, image: &Path) -> Option<String> {
        self.recognizer
            .recognize(image)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error extracting text from image"))
            .ok()
            .map(|text| text.trim().to_string())
    }
}
