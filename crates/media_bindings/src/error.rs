use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("{program} is not installed or not on PATH")]
    MissingBinary { program: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("{program} did not produce expected output: {}", .path.display())]
    MissingOutput { program: String, path: PathBuf },
}

impl BindingError {
    /// Diagnostic output of a failed invocation, empty for other variants
    pub fn stderr(&self) -> &str {
        match self {
            BindingError::Failed { stderr, .. } => stderr,
            _ => "",
        }
    }
}
