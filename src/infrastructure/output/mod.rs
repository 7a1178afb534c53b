//! Output writing: putting a generated file map on disk

pub mod filesystem_output;

pub use filesystem_output::*;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::generation::OutputFileMap;

/// Errors raised while writing generated files
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: String,
        source: std::io::Error,
    },
}

impl OutputError {
    pub(crate) fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.display().to_string(),
            source,
        }
    }
}

/// What a write pass did with each file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    /// Files whose content on disk already matched
    pub unchanged: Vec<PathBuf>,
    /// Backup copies made before overwriting
    pub backed_up: Vec<PathBuf>,
}

/// Destination for a generated file map
#[async_trait]
pub trait OutputWriter: Send + Sync {
    async fn write_files(&self, files: &OutputFileMap) -> Result<WriteSummary, OutputError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn files(entries: &[(PathBuf, &str)]) -> OutputFileMap {
        entries
            .iter()
            .map(|(path, content)| (path.clone(), content.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_write_files_creates_parents() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let writer = FileSystemOutputWriter::new();

        let map = files(&[
            (temp_dir.path().join("src/main.rs"), "fn main() {}"),
            (temp_dir.path().join("Cargo.toml"), "[package]\nname = \"demo\""),
        ]);
        let summary = writer.write_files(&map).await.unwrap();

        assert_eq!(summary.written.len(), 2);
        let main_content = std::fs::read_to_string(temp_dir.path().join("src/main.rs"))
            .expect("Failed to read main.rs");
        assert_eq!(main_content, "fn main() {}");
    }

    #[tokio::test]
    async fn test_backup_on_overwrite() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let target = temp_dir.path().join("README.md");
        std::fs::write(&target, "old").unwrap();

        let writer = FileSystemOutputWriter::new();
        let summary = writer
            .write_files(&files(&[(target.clone(), "new")]))
            .await
            .unwrap();

        assert_eq!(summary.backed_up, vec![temp_dir.path().join("README.md.bak")]);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("README.md.bak")).unwrap(),
            "old"
        );
    }

    #[tokio::test]
    async fn test_unchanged_file_is_not_rewritten() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let target = temp_dir.path().join("package.json");
        std::fs::write(&target, "{}").unwrap();

        let writer = FileSystemOutputWriter::new().with_backup(false);
        let summary = writer
            .write_files(&files(&[(target.clone(), "{}")]))
            .await
            .unwrap();

        assert!(summary.written.is_empty());
        assert_eq!(summary.unchanged, vec![target]);
        assert!(summary.backed_up.is_empty());
    }

    #[tokio::test]
    async fn test_no_backup_when_disabled() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let target = temp_dir.path().join("cli.py");
        std::fs::write(&target, "old").unwrap();

        let writer = FileSystemOutputWriter::new().with_backup(false);
        writer
            .write_files(&files(&[(target.clone(), "new")]))
            .await
            .unwrap();
        assert!(!temp_dir.path().join("cli.py.bak").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_executable_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let writer = FileSystemOutputWriter::new();
        let map = files(&[
            (temp_dir.path().join("setup.sh"), "echo hi"),
            (temp_dir.path().join("bin/cli.js"), "#!/usr/bin/env node\n"),
            (temp_dir.path().join("cli.ts"), "export {}"),
        ]);
        writer.write_files(&map).await.unwrap();

        let mode = |name: &str| {
            std::fs::metadata(temp_dir.path().join(name))
                .expect("Failed to get metadata")
                .permissions()
                .mode()
                & 0o777
        };
        assert_eq!(mode("setup.sh"), 0o755);
        assert_eq!(mode("bin/cli.js"), 0o755);
        assert_ne!(mode("cli.ts"), 0o755);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shebang_must_start_the_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let writer = FileSystemOutputWriter::new();
        let map = files(&[
            (temp_dir.path().join("cli.py"), "#!/usr/bin/env python3\n"),
            (temp_dir.path().join("late.py"), "\n#!/usr/bin/env python3\n"),
        ]);
        writer.write_files(&map).await.unwrap();

        let mode = |name: &str| {
            std::fs::metadata(temp_dir.path().join(name))
                .expect("Failed to get metadata")
                .permissions()
                .mode()
                & 0o777
        };
        assert_eq!(mode("cli.py"), 0o755);
        assert_ne!(mode("late.py"), 0o755);
    }
}
