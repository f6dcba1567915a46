//! Per-download scratch files.

use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

/// File name used when sanitizing leaves nothing.
const FALLBACK_FILENAME: &str = "download";

/// A uniquely named directory under the scratch root, removed on drop.
#[derive(Debug)]
pub(crate) struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create `root/<uuid>/`.
    pub(crate) async fn create(root: &Path) -> std::io::Result<Self> {
        let path = root.join(Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&path).await?;
        Ok(Self { path })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let path = std::mem::take(&mut self.path);
        // Removal blocks; keep it off the async workers when a runtime is around.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || remove_scratch(&path));
            }
            Err(_) => remove_scratch(&path),
        }
    }
}

fn remove_scratch(path: &Path) {
    if let Err(e) = std::fs::remove_dir_all(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove scratch directory");
        }
    }
}

/// Wait until a dropped scratch directory has been removed in the background.
#[cfg(test)]
pub(crate) async fn wait_until_removed(path: &Path) -> bool {
    for _ in 0..200 {
        if !path.exists() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    !path.exists()
}

/// An object downloaded into its own scratch directory.
///
/// The directory and file are deleted when this value is dropped, so keep it
/// alive until the file has been fully read.
#[derive(Debug)]
pub struct DownloadedFile {
    path: PathBuf,
    size: u64,
    // Dropped last: fields drop in declaration order.
    _scratch: ScratchDir,
}

impl DownloadedFile {
    pub(crate) fn new(scratch: ScratchDir, path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            _scratch: scratch,
        }
    }

    /// Location of the downloaded bytes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of bytes written.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Sanitize a resource name for use as a local file name.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores,
/// and never yields `.`, `..` or an empty name.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.chars().all(|c| c == '.') {
        FALLBACK_FILENAME.to_string()
    } else {
        sanitized
    }
}
