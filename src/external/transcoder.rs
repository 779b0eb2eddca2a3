//! Video transcoding collaborator.
//!
//! Modeled as an opaque invocation: a media byte stream plus target
//! container/bitrate hints go in, transcoded bytes come out. Container
//! and bitrate semantics belong to the tool, not the gateway.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::process::Command;

use super::error::ExternalError;
use super::workspace::ScratchWorkspace;

/// Target hints for a transcode invocation.
#[derive(Debug, Clone)]
pub struct TranscodeTarget {
    /// Output container extension, e.g. "mp4", "webm"
    pub container: String,
    /// Optional video bitrate hint, e.g. "2M"
    pub video_bitrate: Option<String>,
    /// Optional audio bitrate hint, e.g. "128k"
    pub audio_bitrate: Option<String>,
}

impl TranscodeTarget {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            video_bitrate: None,
            audio_bitrate: None,
        }
    }
}

/// Trait seam for video transcoding.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(
        &self,
        input: &[u8],
        target: &TranscodeTarget,
    ) -> Result<Bytes, ExternalError>;
}

/// ffmpeg-backed transcoder.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
        }
    }
}

impl FfmpegTranscoder {
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        input: &[u8],
        target: &TranscodeTarget,
    ) -> Result<Bytes, ExternalError> {
        let workspace = ScratchWorkspace::create()?;
        let input_path = workspace.write("input", input).await?;
        let output_name = format!("output.{}", target.container);
        let output_path = workspace.path_for(&output_name);

        let mut command = Command::new(&self.binary);
        command.arg("-y").arg("-i").arg(&input_path);
        if let Some(ref bitrate) = target.video_bitrate {
            command.arg("-b:v").arg(bitrate);
        }
        if let Some(ref bitrate) = target.audio_bitrate {
            command.arg("-b:a").arg(bitrate);
        }
        command.arg(&output_path);

        super::run_tool("ffmpeg", &mut command).await?;

        if !output_path.exists() {
            return Err(ExternalError::MissingOutput {
                tool: "ffmpeg".to_string(),
            });
        }

        let bytes = workspace.read(&output_name).await?;
        Ok(Bytes::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_defaults() {
        let target = TranscodeTarget::new("mp4");
        assert_eq!(target.container, "mp4");
        assert!(target.video_bitrate.is_none());
        assert!(target.audio_bitrate.is_none());
    }

    #[tokio::test]
    async fn test_missing_binary_is_launch_error() {
        let transcoder = FfmpegTranscoder::with_binary("/nonexistent/ffmpeg-binary");
        let err = transcoder
            .transcode(b"not media", &TranscodeTarget::new("mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExternalError::Launch { .. }));
    }
}
