use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use tokio::io::AsyncWriteExt;

use crate::{
    store::{OutputStore, StoredFile},
    SummaryDocument,
};

#[derive(Debug, Clone)]
pub struct FsOutputStore {
    root: PathBuf,
}

impl FsOutputStore {
    const EXTRACTED_TEXT_FILE: &str = "extracted_text.txt";
    const TRANSCRIPT_FILE: &str = "transcription.txt";

    /// Creates the output directory if it does not exist yet
    pub async fn init(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, path = ?root, "Failed to create output directory"))
            .with_context(|| format!("Failed to create output directory {}", root.display()))?;

        Ok(Self { root })
    }

    async fn overwrite(&self, file_name: &str, contents: &str) -> anyhow::Result<StoredFile> {
        let path = self.root.join(file_name);
        tokio::fs::write(&path, contents)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, path = ?path, "Failed to write output file"))
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(StoredFile {
            file_name: file_name.to_string(),
            path,
        })
    }
}

impl OutputStore for FsOutputStore {
    #[tracing::instrument(skip_all)]
    async fn save_summary(&self, summary: &str, keywords: &[String]) -> anyhow::Result<StoredFile> {
        let file_name = format!("summary_{}.txt", uuid::Uuid::new_v4().simple());
        let path = self.root.join(&file_name);
        let rendered = SummaryDocument::new(summary, keywords).render();

        // summary files are immutable once written
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(rendered.as_bytes()).await?;
        file.flush().await?;

        tracing::info!(file = %file_name, "Summary saved");
        Ok(StoredFile { file_name, path })
    }

    async fn save_extracted_text(&self, text: &str) -> anyhow::Result<StoredFile> {
        self.overwrite(Self::EXTRACTED_TEXT_FILE, text).await
    }

    async fn save_transcript(&self, text: &str) -> anyhow::Result<StoredFile> {
        self.overwrite(Self::TRANSCRIPT_FILE, text).await
    }

    async fn locate(&self, file_name: &str) -> anyhow::Result<Option<PathBuf>> {
        if !is_plain_file_name(file_name) {
            tracing::warn!(file_name, "Rejected download name");
            return Ok(None);
        }

        let path = self.root.join(file_name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Some(path)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to stat {}", path.display())),
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains('\\')
}
