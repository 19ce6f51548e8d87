use std::{ffi::OsString, io::ErrorKind, path::Path, process::Stdio};

use tokio::process::Command;

use crate::BindingError;

/// Runs `program` to completion and returns its stdout.
///
/// A non-zero exit is turned into [`BindingError::Failed`] carrying the
/// captured stderr, a missing executable into [`BindingError::MissingBinary`].
pub(crate) async fn run(program: &Path, args: &[OsString]) -> Result<Vec<u8>, BindingError> {
    let program_name = program.display().to_string();
    tracing::debug!(program = %program_name, ?args, "Spawning external tool");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => BindingError::MissingBinary {
                program: program_name.clone(),
            },
            _ => BindingError::Io(e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(BindingError::Failed {
            program: program_name,
            status: output.status.to_string(),
            stderr,
        });
    }

    Ok(output.stdout)
}

/// Fails with [`BindingError::MissingOutput`] unless `path` exists and is non-empty
pub(crate) async fn expect_output(program: &Path, path: &Path) -> Result<(), BindingError> {
    let produced = tokio::fs::metadata(path)
        .await
        .map(|meta| meta.len() > 0)
        .unwrap_or(false);

    if produced {
        Ok(())
    } else {
        Err(BindingError::MissingOutput {
            program: program.display().to_string(),
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_reported() {
        let result = run(Path::new("/nonexistent/bin/not-a-tool"), &[]).await;
        assert!(matches!(result, Err(BindingError::MissingBinary { .. })));
    }

    #[tokio::test]
    async fn test_expect_output_rejects_missing_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let program = Path::new("tool");

        let missing = dir.path().join("missing.wav");
        assert!(matches!(
            expect_output(program, &missing).await,
            Err(BindingError::MissingOutput { .. })
        ));

        let empty = dir.path().join("empty.wav");
        std::fs::write(&empty, b"").unwrap();
        assert!(expect_output(program, &empty).await.is_err());

        let written = dir.path().join("written.wav");
        std::fs::write(&written, b"RIFF").unwrap();
        assert!(expect_output(program, &written).await.is_ok());
    }
}
