use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Temporary files owned by a single request.
///
/// Paths are tracked before anything is written to them. Whatever is still
/// tracked when the guard goes out of scope is removed, whether the request
/// succeeded, failed or its future was dropped. Removal errors are ignored.
#[derive(Debug, Default)]
pub struct ScratchFiles {
    paths: Vec<PathBuf>,
}

impl ScratchFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `path` for cleanup and hand it back
    pub fn track(&mut self, path: PathBuf) -> PathBuf {
        self.paths.push(path.clone());
        path
    }
}

impl Drop for ScratchFiles {
    fn drop(&mut self) {
        // Blocking removal on the runtime thread; a request tracks only a few files
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::trace!(path = %path.display(), "Removed scratch file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::debug!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove scratch file"
                ),
            }
        }
    }
}

/// Move a finished file from the work area to `to` in one step.
///
/// Readers of `to` see either the previous file or the complete new one. When
/// the two locations are on different filesystems the file is first copied to
/// a hidden sibling of `to` and renamed from there.
pub async fn persist(from: &Path, to: &Path) -> std::io::Result<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }

    let file_name = to
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut scratch = ScratchFiles::new();
    let staging = scratch.track(to.with_file_name(format!(
        ".{}.{}.tmp",
        file_name,
        Uuid::new_v4().simple()
    )));

    tokio::fs::copy(from, &staging).await?;
    tokio::fs::rename(&staging, to).await?;
    tokio::fs::remove_file(from).await.ok();
    Ok(())
}
