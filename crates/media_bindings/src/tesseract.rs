use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{command, BindingError};

/// Printed-text recognition through the `tesseract` CLI
#[derive(Debug, Clone)]
pub struct Tesseract {
    bin: PathBuf,
    language: String,
}

impl Default for Tesseract {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl Tesseract {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            language: "eng".into(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Returns the text tesseract reads off `image`, untrimmed
    #[tracing::instrument(skip(self))]
    pub async fn image_to_string(&self, image: &Path) -> Result<String, BindingError> {
        let stdout = command::run(&self.bin, &self.args(image)).await?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    fn args(&self, image: &Path) -> Vec<OsString> {
        vec![
            image.into(),
            "stdout".into(),
            "-l".into(),
            self.language.as_str().into(),
        ]
    }
}
