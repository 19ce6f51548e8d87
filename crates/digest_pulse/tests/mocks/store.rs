use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use digest_store::{OutputStore, StoredFile};

/// Records writes in memory; `failing` rejects every write
#[derive(Clone, Default)]
pub struct MockOutputStore {
    pub summaries: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    pub transcripts: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockOutputStore {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    fn check(&self) -> anyhow::Result<()> {
        match self.fail_with {
            Some(ref msg) => Err(anyhow::anyhow!("{}", msg)),
            None => Ok(()),
        }
    }

    fn stored(file_name: &str) -> StoredFile {
        StoredFile {
            file_name: file_name.to_string(),
            path: PathBuf::from("/tmp/mock-output").join(file_name),
        }
    }
}

impl OutputStore for MockOutputStore {
    async fn save_summary(&self, summary: &str, keywords: &[String]) -> anyhow::Result<StoredFile> {
        self.check()?;
        let mut summaries = self.summaries.lock().unwrap();
        summaries.push((summary.to_string(), keywords.to_vec()));
        Ok(Self::stored(&format!("summary_{}.txt", summaries.len())))
    }

    async fn save_extracted_text(&self, _text: &str) -> anyhow::Result<StoredFile> {
        self.check()?;
        Ok(Self::stored("extracted_text.txt"))
    }

    async fn save_transcript(&self, text: &str) -> anyhow::Result<StoredFile> {
        self.check()?;
        self.transcripts.lock().unwrap().push(text.to_string());
        Ok(Self::stored("transcription.txt"))
    }

    async fn locate(&self, _file_name: &str) -> anyhow::Result<Option<PathBuf>> {
        Ok(None)
    }
}
