//! Remote media fetching collaborator.
//!
//! A URL plus a desired container go in, downloaded (and merged) media
//! bytes come out. Site handling, stream selection, and merging belong
//! to the downloader tool.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::process::Command;

use super::error::ExternalError;
use super::workspace::ScratchWorkspace;

/// Trait seam for remote media fetching.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, url: &str, container: &str) -> Result<Bytes, ExternalError>;
}

/// yt-dlp backed fetcher.
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    binary: PathBuf,
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("yt-dlp"),
        }
    }
}

impl YtDlpFetcher {
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch(&self, url: &str, container: &str) -> Result<Bytes, ExternalError> {
        let workspace = ScratchWorkspace::create()?;
        // The tool picks the final extension; the merge format pins the
        // container for multi-stream sources
        let output_template = workspace.path_for("download.%(ext)s");

        let mut command = Command::new(&self.binary);
        command
            .arg("--no-playlist")
            .arg("--merge-output-format")
            .arg(container)
            .arg("-o")
            .arg(&output_template)
            .arg(url);

        super::run_tool("yt-dlp", &mut command).await?;

        let output_path = workspace
            .find_with_prefix("download.")
            .await?
            .ok_or_else(|| ExternalError::MissingOutput {
                tool: "yt-dlp".to_string(),
            })?;

        let bytes = tokio::fs::read(&output_path).await?;
        Ok(Bytes::from(bytes))
    }
}
