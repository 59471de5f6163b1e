use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use zip::write::{FileOptions, ZipWriter};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn exists(&self, path: &str) -> bool {
        self.base_path.join(path).exists()
    }

    /// Creates the base directory when it is missing.
    pub fn ensure_base_dir(&self) -> Result<()> {
        if !self.base_path.exists() {
            tracing::debug!("Creating directory {}", self.base_path.display());
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(())
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

/// Packs already written artifacts into a single zip and stores it as `archive_name`.
pub async fn archive_artifacts<S: Storage>(
    storage: &S,
    artifacts: &[String],
    archive_name: &str,
) -> Result<()> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for artifact in artifacts {
        let data = storage.read_file(artifact).await?;
        zip.start_file::<_, ()>(artifact.as_str(), FileOptions::default())?;
        zip.write_all(&data)?;
    }
    let zip_data = zip.finish()?.into_inner();

    tracing::debug!(
        "Writing {} ({} bytes, {} files)",
        archive_name,
        zip_data.len(),
        artifacts.len()
    );
    storage.write_file(archive_name, &zip_data).await
}
