//! RAII guard for temporary on-disk artifacts.

use std::path::{Path, PathBuf};

/// A temporary file path that is removed (best effort) when dropped.
///
/// Owns the uploaded video and the intermediate audio files so that every
/// exit path of a job -- success, stage failure, or panic unwind -- attempts
/// cleanup. A failed removal is logged and otherwise ignored: cleanup is
/// not part of the job's success/failure contract.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    /// Reserve a unique path in the system temp directory with the given
    /// extension. The file itself is created by whoever writes to the path.
    pub fn with_extension(extension: &str) -> Self {
        let filename = format!("clipbrief_{}.{extension}", uuid::Uuid::new_v4());
        Self {
            path: std::env::temp_dir().join(filename),
        }
    }

    /// Wrap an existing path so it is removed on drop.
    pub fn from_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove temp artifact");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_file_on_drop() {
        let artifact = TempArtifact::with_extension("tmp");
        let path = artifact.path().to_path_buf();
        std::fs::write(&path, b"scratch").expect("write should succeed");
        assert!(path.exists());

        drop(artifact);
        assert!(!path.exists(), "file must be removed on drop");
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let artifact = TempArtifact::with_extension("tmp");
        let path = artifact.path().to_path_buf();
        assert!(!path.exists());
        // Drop without ever creating the file; must not panic.
        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn paths_are_unique() {
        let a = TempArtifact::with_extension("wav");
        let b = TempArtifact::with_extension("wav");
        assert_ne!(a.path(), b.path());
    }
}
