use anyhow::Context;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

use hanko::composer;
use hanko::external::{
    DocumentExporter, ExportTarget, FfmpegTranscoder, MediaFetcher, SofficeExporter,
    TranscodeTarget, Transcoder, YtDlpFetcher,
};

/// Hanko media conversion gateway - product-sheet compositing and media conversion
#[derive(Parser, Debug)]
#[command(name = "hanko")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a product-sheet image from a subject photo and a watermark
    Compose {
        /// Subject photo file
        subject: PathBuf,

        /// Watermark/logo image file
        watermark: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "sheet.jpg")]
        out: PathBuf,

        /// Output format: jpeg or png
        #[arg(long)]
        format: Option<String>,

        /// JPEG quality (1-100)
        #[arg(long)]
        quality: Option<String>,

        /// Canvas layout: sheet or overlay
        #[arg(long)]
        layout: Option<String>,

        /// Watermark mode: diagonal or center
        #[arg(long)]
        mode: Option<String>,

        /// Watermark opacity (0-1)
        #[arg(long)]
        opacity: Option<String>,

        /// Watermark scale (multiplier of canvas width)
        #[arg(long)]
        scale: Option<String>,

        /// Watermark angle in degrees (diagonal mode)
        #[arg(long)]
        angle: Option<String>,
    },

    /// Transcode a video file through ffmpeg
    Transcode {
        /// Input media file
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        out: PathBuf,

        /// Output container
        #[arg(long, default_value = "mp4")]
        container: String,

        /// Video bitrate hint, e.g. 2M
        #[arg(long)]
        video_bitrate: Option<String>,

        /// Audio bitrate hint, e.g. 128k
        #[arg(long)]
        audio_bitrate: Option<String>,
    },

    /// Export a document through LibreOffice
    Export {
        /// Input document file
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        out: PathBuf,

        /// Export format
        #[arg(long, default_value = "pdf")]
        format: String,

        /// Export filter options
        #[arg(long)]
        filter: Option<String>,
    },

    /// Fetch remote media through yt-dlp
    Fetch {
        /// Media page URL
        url: String,

        /// Output file
        #[arg(short, long)]
        out: PathBuf,

        /// Desired container
        #[arg(long, default_value = "mp4")]
        container: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hanko::logging::init_subscriber().expect("Failed to initialize logging subsystem");

    let args = Args::parse();

    match args.command {
        Command::Compose {
            subject,
            watermark,
            out,
            format,
            quality,
            layout,
            mode,
            opacity,
            scale,
            angle,
        } => {
            let subject_bytes = tokio::fs::read(&subject)
                .await
                .with_context(|| format!("failed to read {}", subject.display()))?;
            let watermark_bytes = tokio::fs::read(&watermark)
                .await
                .with_context(|| format!("failed to read {}", watermark.display()))?;

            let mut fields = HashMap::new();
            for (key, value) in [
                ("format", format),
                ("quality", quality),
                ("layout", layout),
                ("mode", mode),
                ("opacity", opacity),
                ("scale", scale),
                ("angle", angle),
            ] {
                if let Some(value) = value {
                    fields.insert(key.to_string(), value);
                }
            }

            // The pipeline is CPU-bound; keep it off the async workers
            let composed = tokio::task::spawn_blocking(move || {
                composer::compose(Some(&subject_bytes), Some(&watermark_bytes), &fields)
            })
            .await
            .context("compose task panicked")??;

            tokio::fs::write(&out, &composed.data)
                .await
                .with_context(|| format!("failed to write {}", out.display()))?;

            tracing::info!(
                out = %out.display(),
                content_type = composed.content_type,
                width = composed.width,
                height = composed.height,
                bytes = composed.data.len(),
                "composition written"
            );
        }

        Command::Transcode {
            input,
            out,
            container,
            video_bitrate,
            audio_bitrate,
        } => {
            let input_bytes = tokio::fs::read(&input)
                .await
                .with_context(|| format!("failed to read {}", input.display()))?;

            let target = TranscodeTarget {
                container,
                video_bitrate,
                audio_bitrate,
            };
            let transcoded = FfmpegTranscoder::default()
                .transcode(&input_bytes, &target)
                .await?;

            tokio::fs::write(&out, &transcoded).await?;
            tracing::info!(out = %out.display(), bytes = transcoded.len(), "transcode written");
        }

        Command::Export {
            input,
            out,
            format,
            filter,
        } => {
            let input_bytes = tokio::fs::read(&input)
                .await
                .with_context(|| format!("failed to read {}", input.display()))?;

            let mut target = ExportTarget::new(format);
            if let Some(filter) = filter {
                target = target.with_filter(filter);
            }
            let exported = SofficeExporter::default().export(&input_bytes, &target).await?;

            tokio::fs::write(&out, &exported).await?;
            tracing::info!(out = %out.display(), bytes = exported.len(), "export written");
        }

        Command::Fetch {
            url,
            out,
            container,
        } => {
            let fetched = YtDlpFetcher::default().fetch(&url, &container).await?;

            tokio::fs::write(&out, &fetched).await?;
            tracing::info!(out = %out.display(), bytes = fetched.len(), "fetch written");
        }
    }

    Ok(())
}
