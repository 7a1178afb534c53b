//! Filesystem-based output writer

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::generation::OutputFileMap;
use crate::infrastructure::output::{OutputError, OutputWriter, WriteSummary};

/// Writes generated files to disk
#[derive(Debug, Clone)]
pub struct FileSystemOutputWriter {
    backup_existing: bool,
    executable_extensions: Vec<String>,
}

impl FileSystemOutputWriter {
    pub fn new() -> Self {
        Self {
            backup_existing: true,
            executable_extensions: vec!["sh".to_string()],
        }
    }

    /// Copy a differing existing file to `<name>.bak` before overwriting it
    pub fn with_backup(mut self, backup_existing: bool) -> Self {
        self.backup_existing = backup_existing;
        self
    }

    /// Extensions (without dot) whose files are marked executable
    pub fn with_executable_extensions(mut self, extensions: Vec<String>) -> Self {
        self.executable_extensions = extensions;
        self
    }

    /// Shebang on byte 0, or an extension listed as executable
    #[cfg(unix)]
    fn is_executable(&self, path: &Path, content: &str) -> bool {
        content.starts_with("#!")
            || path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| self.executable_extensions.iter().any(|e| e == ext))
    }

    async fn write_one(
        &self,
        path: &Path,
        content: &str,
        summary: &mut WriteSummary,
    ) -> Result<(), OutputError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| OutputError::io("create directory", parent, e))?;
        }

        if let Ok(existing) = fs::read(path).await {
            if existing == content.as_bytes() {
                debug!(path = %path.display(), "Unchanged, skipping write");
                summary.unchanged.push(path.to_path_buf());
                return Ok(());
            }
            if self.backup_existing {
                let backup = backup_path(path);
                fs::write(&backup, &existing)
                    .await
                    .map_err(|e| OutputError::io("write backup", &backup, e))?;
                summary.backed_up.push(backup);
            }
        }

        let mut file = fs::File::create(path)
            .await
            .map_err(|e| OutputError::io("create file", path, e))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|e| OutputError::io("write file", path, e))?;
        file.flush()
            .await
            .map_err(|e| OutputError::io("flush file", path, e))?;

        #[cfg(unix)]
        if self.is_executable(path, content) {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
                .await
                .map_err(|e| OutputError::io("set permissions on", path, e))?;
        }

        summary.written.push(path.to_path_buf());
        Ok(())
    }
}

impl Default for FileSystemOutputWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    path.with_file_name(name)
}

#[async_trait]
impl OutputWriter for FileSystemOutputWriter {
    async fn write_files(&self, files: &OutputFileMap) -> Result<WriteSummary, OutputError> {
        let mut summary = WriteSummary::default();
        for (path, content) in files {
            self.write_one(path, content, &mut summary).await?;
        }
        Ok(summary)
    }
}
