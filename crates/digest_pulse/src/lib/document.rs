//! # PDF text extraction
//!
//! The embedded text layer is read first. Scanned documents have no usable
//! text layer, so when that pass comes back blank every page is rendered to
//! an image and run through OCR instead.

use std::path::Path;

use lopdf::Document;

use crate::{
    error::DocumentError,
    ocr::{PageRasterizer, TextRecognizer},
};

pub const DEFAULT_OCR_DPI: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    TextLayer,
    Ocr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Extracted { page: u32, chars: usize },
    Empty { page: u32 },
    Failed { page: u32, reason: String },
}

impl PageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, PageOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub text: String,
    pub method: ExtractionMethod,
    /// Outcomes of the pass that produced `text`, in page order
    pub pages: Vec<PageOutcome>,
}

impl ExtractedDocument {
    /// Some pages could not be read
    pub fn is_partial(&self) -> bool {
        self.pages.iter().any(PageOutcome::is_failed)
    }
}

/// Accumulated text of one extraction pass
#[derive(Debug, Default)]
struct Pass {
    text: String,
    pages: Vec<PageOutcome>,
}

impl Pass {
    fn push(&mut self, page: u32, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.pages.push(PageOutcome::Empty { page });
        } else {
            self.text.push_str(text);
            self.text.push('\n');
            self.pages.push(PageOutcome::Extracted {
                page,
                chars: trimmed.chars().count(),
            });
        }
    }

    fn fail(&mut self, page: u32, reason: impl ToString) {
        self.pages.push(PageOutcome::Failed {
            page,
            reason: reason.to_string(),
        });
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn finish(self, method: ExtractionMethod) -> ExtractedDocument {
        ExtractedDocument {
            text: self.text.trim().to_string(),
            method,
            pages: self.pages,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentProcessor<R, P> {
    recognizer: R,
    rasterizer: P,
    dpi: u32,
}

impl<R, P> DocumentProcessor<R, P>
where
    R: TextRecognizer + Send + Sync,
    P: PageRasterizer + Send + Sync,
{
    pub fn new(recognizer: R, rasterizer: P) -> Self {
        Self {
            recognizer,
            rasterizer,
            dpi: DEFAULT_OCR_DPI,
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Extracts the text of the PDF at `path`.
    ///
    /// Only an unreadable or unparsable file is an error. `Ok(None)` means
    /// neither the text layer nor OCR found anything.
    #[tracing::instrument(skip(self))]
    pub async fn extract_text(
        &self,
        path: &Path,
    ) -> Result<Option<ExtractedDocument>, DocumentError> {
        let bytes = tokio::fs::read(path).await?;
        let layer = read_text_layer(&bytes)?;

        if !layer.is_blank() {
            return Ok(Some(layer.finish(ExtractionMethod::TextLayer)));
        }

        tracing::info!("No text layer found, falling back to OCR");
        let ocr = self.ocr_pages(path).await;
        if ocr.is_blank() {
            tracing::warn!("OCR found no text either");
            return Ok(None);
        }

        Ok(Some(ocr.finish(ExtractionMethod::Ocr)))
    }

    async fn ocr_pages(&self, path: &Path) -> Pass {
        let mut pass = Pass::default();

        let scratch = match tempfile::TempDir::new() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::error!(error = ?e, "Failed to create scratch directory for page images");
                return pass;
            }
        };

        let images = match self
            .rasterizer
            .rasterize(path, self.dpi, scratch.path())
            .await
        {
            Ok(images) => images,
            Err(e) => {
                tracing::error!(error = %e, "Failed to rasterize PDF pages");
                return pass;
            }
        };

        for (page, image) in (1..).zip(images.iter()) {
            match self.recognizer.recognize(image).await {
                Ok(text) => pass.push(page, &text),
                Err(e) => {
                    tracing::warn!(page, error = %e, "OCR failed for page, skipping");
                    pass.fail(page, e);
                }
            }
        }

        pass
    }
}

fn read_text_layer(bytes: &[u8]) -> Result<Pass, DocumentError> {
    let doc = Document::load_mem(bytes)?;
    let mut pass = Pass::default();

    // get_pages is keyed by page number, so iteration is in page order
    for page in doc.get_pages().into_keys() {
        match doc.extract_text(&[page]) {
            Ok(text) => pass.push(page, &text),
            Err(e) => {
                tracing::warn!(page, error = %e, "Failed to read text layer of page, skipping");
                pass.fail(page, e);
            }
        }
    }

    Ok(pass)
}
