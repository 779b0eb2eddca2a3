//! Scoped scratch workspace for external tool invocations.
//!
//! Every invocation gets its own unique temporary directory; the
//! directory and everything in it are removed when the workspace is
//! dropped, on success and failure paths alike. No fixed shared temp
//! path exists anywhere in the gateway.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A uniquely-named temporary directory tied to one tool invocation.
#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: TempDir,
}

impl ScratchWorkspace {
    /// Create a fresh workspace directory.
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("hanko-").tempdir()?;
        Ok(Self { dir })
    }

    /// Directory root of this workspace.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Path for a named file inside the workspace. The file is not
    /// created; tools write to it.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write bytes to a named file and return its path.
    pub async fn write(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.path_for(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Read a named file back into memory.
    pub async fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.path_for(name)).await
    }

    /// Find the first file whose name starts with `prefix`. Tools that
    /// pick their own output extension (yt-dlp) are read back this way.
    pub async fn find_with_prefix(&self, prefix: &str) -> io::Result<Option<PathBuf>> {
        let mut entries = tokio::fs::read_dir(self.dir.path()).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(prefix) {
                return Ok(Some(entry.path()));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let ws = ScratchWorkspace::create().unwrap();
        ws.write("input.bin", b"payload").await.unwrap();
        assert_eq!(ws.read("input.bin").await.unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_workspace_removed_on_drop() {
        let root = {
            let ws = ScratchWorkspace::create().unwrap();
            ws.write("leftover", b"x").await.unwrap();
            ws.root().to_path_buf()
        };
        assert!(!root.exists());
    }

    #[test]
    fn test_workspaces_are_unique() {
        let a = ScratchWorkspace::create().unwrap();
        let b = ScratchWorkspace::create().unwrap();
        assert_ne!(a.root(), b.root());
    }

    #[tokio::test]
    async fn test_find_with_prefix() {
        let ws = ScratchWorkspace::create().unwrap();
        ws.write("download.mp4", b"media").await.unwrap();
        let found = ws.find_with_prefix("download.").await.unwrap().unwrap();
        assert!(found.ends_with("download.mp4"));

        assert!(ws.find_with_prefix("missing.").await.unwrap().is_none());
    }
}
