//! External conversion collaborators.
//!
//! Video transcoding, document export, and remote media fetching are
//! opaque external tool invocations, not gateway logic: each collaborator
//! is a trait seam with a process-spawning implementation (ffmpeg,
//! soffice, yt-dlp). Inputs and outputs cross the boundary as byte
//! buffers; each invocation runs inside its own scoped scratch workspace
//! and emits start/end/error events.

pub mod error;
pub mod exporter;
pub mod fetcher;
pub mod transcoder;
pub mod workspace;

pub use error::ExternalError;
pub use exporter::{DocumentExporter, ExportTarget, SofficeExporter};
pub use fetcher::{MediaFetcher, YtDlpFetcher};
pub use transcoder::{FfmpegTranscoder, TranscodeTarget, Transcoder};
pub use workspace::ScratchWorkspace;

use tokio::process::Command;

/// Run an external tool to completion, capturing stderr for diagnostics.
pub(crate) async fn run_tool(tool: &str, command: &mut Command) -> Result<(), ExternalError> {
    tracing::info!(tool, "invoking external tool");

    let output = command
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| ExternalError::Launch {
            tool: tool.to_string(),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::error!(tool, status = %output.status, "external tool failed");
        return Err(ExternalError::ToolFailed {
            tool: tool.to_string(),
            status: output.status.to_string(),
            stderr,
        });
    }

    tracing::info!(tool, "external tool finished");
    Ok(())
}
