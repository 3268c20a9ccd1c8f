use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::domain::{ResumePath, ResumeUpload};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("stored file not found")]
    NotFound,
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Where uploaded resumes are kept.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Stores the upload and returns where it ended up. Existing files are never overwritten.
    async fn save(&self, upload: &ResumeUpload) -> Result<ResumePath, StorageError>;
    async fn read(&self, path: &ResumePath) -> Result<Vec<u8>, StorageError>;
    /// Deletes a stored resume; a file that is already gone is not an error.
    async fn remove(&self, path: &ResumePath) -> Result<(), StorageError>;
}

/// Keeps resumes on disk under `<root>/resumes/`.
#[derive(Debug, Clone)]
pub struct FsResumeStore {
    root: PathBuf,
}

impl FsResumeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn directory(&self) -> PathBuf {
        self.root.join(ResumePath::DIRECTORY)
    }
}

#[async_trait]
impl ResumeStore for FsResumeStore {
    async fn save(&self, upload: &ResumeUpload) -> Result<ResumePath, StorageError> {
        let directory = self.directory();
        tokio::fs::create_dir_all(&directory).await?;

        let mut file_name = sanitize_file_name(&upload.file_name);
        loop {
            let target = directory.join(&file_name);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)
                .await
            {
                Ok(mut file) => {
                    file.write_all(&upload.bytes).await?;
                    file.flush().await?;
                    return Ok(ResumePath::in_resumes(&file_name));
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    file_name = with_random_suffix(&sanitize_file_name(&upload.file_name));
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn read(&self, path: &ResumePath) -> Result<Vec<u8>, StorageError> {
        let target = self.directory().join(sanitize_file_name(path.file_name()));
        match tokio::fs::read(&target).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StorageError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    async fn remove(&self, path: &ResumePath) -> Result<(), StorageError> {
        let target = self.directory().join(sanitize_file_name(path.file_name()));
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Keeps only the final path component and replaces anything outside `[A-Za-z0-9._-]`.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "resume".to_string()
    } else {
        cleaned.to_string()
    }
}

fn with_random_suffix(file_name: &str) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(7).collect();
    let path = Path::new(file_name);
    match (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|s| s.to_str()),
    ) {
        (Some(stem), Some(ext)) => format!("{stem}_{suffix}.{ext}"),
        _ => format!("{file_name}_{suffix}"),
    }
}
