use std::{future::Future, path::PathBuf};

pub mod fs;

/// A file written into the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub file_name: String,
    pub path: PathBuf,
}

impl StoredFile {
    /// Route under which the HTTP layer serves this file
    pub fn download_url(&self) -> String {
        format!("/download/{}", self.file_name)
    }
}

pub trait OutputStore {
    /// Writes a new, uniquely named summary file
    fn save_summary(
        &self,
        summary: &str,
        keywords: &[String],
    ) -> impl Future<Output = anyhow::Result<StoredFile>> + Send;

    /// Overwrites the extracted-text side file
    fn save_extracted_text(
        &self,
        text: &str,
    ) -> impl Future<Output = anyhow::Result<StoredFile>> + Send;

    /// Overwrites the raw transcript side file
    fn save_transcript(&self, text: &str)
        -> impl Future<Output = anyhow::Result<StoredFile>> + Send;

    /// Resolves a previously written file by name. Names that are not a
    /// single plain path component never resolve.
    fn locate(
        &self,
        file_name: &str,
    ) -> impl Future<Output = anyhow::Result<Option<PathBuf>>> + Send;
}
