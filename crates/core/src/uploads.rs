//! Uploaded-file intake: naming rules and the content area.
//!
//! Bytes are written to a [`ContentStore`] under a generated name before
//! the owning record is committed. The name is the sanitized original
//! filename prefixed with a microsecond timestamp and the file's position
//! in its batch, so two files with the same original name never collide.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Name used when sanitizing leaves nothing usable.
pub const FALLBACK_FILENAME: &str = "upload";

/// One file payload from a multi-file upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as sent by the client. Empty means "no file selected".
    pub original_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(original_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            original_name: original_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Entries without a filename are skipped silently.
    pub fn is_selected(&self) -> bool {
        !self.original_name.trim().is_empty()
    }
}

/// An ordered batch of files submitted with one collection create/update.
///
/// The single `description` applies to every image created from the batch.
#[derive(Debug, Clone, Default)]
pub struct UploadBatch {
    pub files: Vec<UploadedFile>,
    pub description: Option<String>,
}

impl UploadBatch {
    pub fn new(files: Vec<UploadedFile>, description: Option<String>) -> Self {
        Self { files, description }
    }

    /// Files that will actually produce an image record.
    pub fn selected(&self) -> impl Iterator<Item = &UploadedFile> {
        self.files.iter().filter(|f| f.is_selected())
    }

    pub fn is_empty(&self) -> bool {
        self.selected().next().is_none()
    }
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// Reduce a client-supplied filename to a safe, flat ASCII name.
///
/// ```
/// use mycotheca_core::uploads::sanitize_filename;
/// assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
/// assert_eq!(sanitize_filename("C:\\fotos\\my pic.jpg"), "my_pic.jpg");
/// assert_eq!(sanitize_filename("..."), "upload");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let last = name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned: String = last
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Name under which the `index`-th file of a batch is stored.
///
/// Format: `{YYYYmmdd_HHMMSS_micros}_{index:02}_{sanitized}`.
pub fn stored_name(now: Timestamp, index: usize, original: &str) -> String {
    format!(
        "{}_{index:02}_{}",
        now.format("%Y%m%d_%H%M%S_%6f"),
        sanitize_filename(original)
    )
}

/// Whether `name` is a plain stored filename (no directories, no traversal).
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
        && !name.starts_with('.')
}

// ---------------------------------------------------------------------------
// Content store
// ---------------------------------------------------------------------------

/// Durable storage for uploaded bytes, addressed by stored filename.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Write `bytes` under `name`. Must fail rather than overwrite.
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<(), CoreError>;

    /// Remove a stored file. Removing a missing file is not an error.
    async fn remove(&self, name: &str) -> Result<(), CoreError>;

    /// Read a stored file back.
    async fn read(&self, name: &str) -> Result<Vec<u8>, CoreError>;
}

/// A [`ContentStore`] backed by a local directory.
#[derive(Debug, Clone)]
pub struct LocalContentStore {
    root: PathBuf,
}

impl LocalContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the backing directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), CoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| CoreError::storage(self.root.display().to_string(), e))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, CoreError> {
        if is_plain_name(name) {
            Ok(self.root.join(name))
        } else {
            Err(CoreError::validation(
                "filename",
                format!("'{name}' is not a stored filename"),
            ))
        }
    }
}

#[async_trait]
impl ContentStore for LocalContentStore {
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<(), CoreError> {
        let path = self.path_for(name)?;
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| CoreError::storage(name, e))?;
        file.write_all(bytes)
            .await
            .map_err(|e| CoreError::storage(name, e))?;
        file.flush().await.map_err(|e| CoreError::storage(name, e))?;
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), CoreError> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::storage(name, e)),
        }
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, CoreError> {
        let path = self.path_for(name)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| CoreError::storage(name, e))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    fn at() -> Timestamp {
        chrono::Utc
            .with_ymd_and_hms(2024, 3, 15, 10, 15, 0)
            .unwrap()
    }

    #[test]
    fn sanitize_strips_unsafe_characters() {
        assert_eq!(sanitize_filename("cogumelo (1).JPG"), "cogumelo_1.JPG");
        assert_eq!(sanitize_filename("açaí.png"), "aa.png");
        assert_eq!(sanitize_filename("/tmp/.hidden"), "hidden");
    }

    #[test]
    fn stored_name_has_timestamp_and_index() {
        assert_eq!(
            stored_name(at(), 3, "cap.jpg"),
            "20240315_101500_000000_03_cap.jpg"
        );
    }

    #[test]
    fn same_original_name_in_batch_does_not_collide() {
        let a = stored_name(at(), 0, "photo.jpg");
        let b = stored_name(at(), 1, "photo.jpg");
        assert_ne!(a, b);
    }

    #[test]
    fn plain_name_rejects_traversal() {
        assert!(is_plain_name("20240315_cap.jpg"));
        assert!(!is_plain_name("../secret"));
        assert!(!is_plain_name("a/b.jpg"));
        assert!(!is_plain_name(""));
    }

    #[test]
    fn unselected_files_are_skipped() {
        let batch = UploadBatch::new(
            vec![UploadedFile::new("", b"".to_vec()), UploadedFile::new("a.jpg", b"x".to_vec())],
            None,
        );
        assert_eq!(batch.selected().count(), 1);
        assert!(!batch.is_empty());
        assert!(UploadBatch::default().is_empty());
    }

    #[tokio::test]
    async fn local_store_writes_reads_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalContentStore::new(dir.path());

        store.put("a.jpg", b"bytes").await.unwrap();
        assert_eq!(store.read("a.jpg").await.unwrap(), b"bytes");

        store.remove("a.jpg").await.unwrap();
        assert!(store.read("a.jpg").await.is_err());
        // Removing again is fine.
        store.remove("a.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn local_store_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalContentStore::new(dir.path());

        store.put("a.jpg", b"first").await.unwrap();
        assert_matches!(
            store.put("a.jpg", b"second").await,
            Err(CoreError::StorageIo { .. })
        );
        assert_eq!(store.read("a.jpg").await.unwrap(), b"first");
    }

    #[tokio::test]
    async fn local_store_rejects_path_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalContentStore::new(dir.path());
        assert_matches!(
            store.read("../Cargo.toml").await,
            Err(CoreError::Validation { .. })
        );
    }
}
