//! Local blob storage for uploaded files.
//!
//! Files live under `<root>/<dir>/<stored name>`. Stored names are generated
//! on upload and never contain path separators, so a name taken from a URL
//! can be joined onto a directory without escaping it.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

/// Top-level directories under the storage root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageDir {
    StaffImages,
    StaffMedicalImages,
    Events,
}

impl StorageDir {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageDir::StaffImages => "staff_images",
            StorageDir::StaffMedicalImages => "staff_medical_images",
            StorageDir::Events => "events",
        }
    }
}

/// Directories searched, in order, when serving a staff file by name.
pub const STAFF_FILE_SEARCH_ORDER: [StorageDir; 3] = [
    StorageDir::StaffImages,
    StorageDir::StaffMedicalImages,
    StorageDir::Events,
];

#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write `bytes` under `dir` and return the generated stored name.
    pub async fn put(&self, dir: StorageDir, original_name: &str, bytes: &[u8]) -> io::Result<String> {
        let directory = self.root.join(dir.as_str());
        tokio::fs::create_dir_all(&directory).await?;

        let stored = stored_name(original_name);
        tokio::fs::write(directory.join(&stored), bytes).await?;
        tracing::debug!(dir = dir.as_str(), file = %stored, size = bytes.len(), "Stored upload");
        Ok(stored)
    }

    /// Delete a stored file. A file that is already gone is not an error.
    pub async fn remove(&self, dir: StorageDir, stored: &str) -> io::Result<()> {
        let Some(name) = safe_name(stored) else {
            return Ok(());
        };
        match tokio::fs::remove_file(self.root.join(dir.as_str()).join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Delete several files, logging failures instead of returning them.
    ///
    /// Used after the owning rows are already gone, when a leftover blob is
    /// preferable to failing the request.
    pub async fn remove_all(&self, dir: StorageDir, stored: &[String]) {
        for name in stored {
            if let Err(e) = self.remove(dir, name).await {
                tracing::warn!(dir = dir.as_str(), file = %name, error = %e, "Failed to delete blob");
            }
        }
    }

    /// First existing file named `stored` across `dirs`.
    pub async fn locate(&self, dirs: &[StorageDir], stored: &str) -> Option<PathBuf> {
        let name = safe_name(stored)?;
        for dir in dirs {
            let candidate = self.root.join(dir.as_str()).join(name);
            if tokio::fs::metadata(&candidate)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false)
            {
                return Some(candidate);
            }
        }
        None
    }
}

/// `name` if it is a bare file name.
fn safe_name(name: &str) -> Option<&str> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    (!bad).then_some(name)
}

/// `<millis>_<8 hex>_<sanitized original>`.
fn stored_name(original: &str) -> String {
    let base = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.');
    let sanitized = if sanitized.is_empty() { "upload" } else { sanitized };

    let tag = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", Utc::now().timestamp_millis(), &tag[..8], sanitized)
}

/// Content type guessed from a file extension.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
