use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Final outcome of one pipeline run, as handed back to HTTP callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub summary: String,
    pub keywords: Vec<String>,
    #[serde(rename = "download_url")]
    pub download_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobResult {
    pub fn succeeded(
        summary: impl Into<String>,
        keywords: Vec<String>,
        download_path: impl Into<String>,
    ) -> Self {
        Self {
            summary: summary.into(),
            keywords,
            download_path: download_path.into(),
            error: None,
        }
    }

    /// A run that never got far enough to produce anything
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            summary: String::new(),
            keywords: Vec::new(),
            download_path: String::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// The human readable summary file offered for download
#[derive(Debug, Clone)]
pub struct SummaryDocument<'a> {
    pub summary: &'a str,
    pub keywords: &'a [String],
    pub generated_at: DateTime<Utc>,
}

impl<'a> SummaryDocument<'a> {
    const RULE_WIDTH: usize = 50;

    pub fn new(summary: &'a str, keywords: &'a [String]) -> Self {
        Self {
            summary,
            keywords,
            generated_at: Utc::now(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Document Summary\n");
        out.push_str(&"=".repeat(Self::RULE_WIDTH));
        out.push_str("\n\n");
        out.push_str(self.summary);
        out.push_str("\n\n");
        out.push_str("Key Topics & Keywords\n");
        out.push_str(&"-".repeat(Self::RULE_WIDTH));
        out.push('\n');
        out.push_str(&self.keywords.iter().join(", "));
        out.push_str("\n\n");
        out.push_str(&format!("Generated: {}\n", self.generated_at.to_rfc3339()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_result_is_empty_apart_from_error() {
        let result = JobResult::failed("Error extracting audio");
        assert!(result.is_failed());
        assert!(result.summary.is_empty());
        assert!(result.keywords.is_empty());
        assert!(result.download_path.is_empty());
    }

    #[test]
    fn test_job_result_serializes_download_url() {
        let result = JobResult::succeeded("short", vec!["rust".into()], "/download/summary_1.txt");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["download_url"], "/download/summary_1.txt");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_render_lists_summary_then_keywords() {
        let keywords = vec!["parliament".to_string(), "budget".to_string()];
        let doc = SummaryDocument::new("The house debated the budget.", &keywords);
        let rendered = doc.render();

        let summary_at = rendered.find("The house debated the budget.").unwrap();
        let keywords_at = rendered.find("parliament, budget").unwrap();
        assert!(summary_at < keywords_at);
        assert!(rendered.starts_with("Document Summary\n"));
    }
}
