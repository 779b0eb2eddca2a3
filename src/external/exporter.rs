//! Document export collaborator.
//!
//! A document byte buffer plus a target export format (typically PDF) and
//! optional export filter options go in, exported bytes come out. Filter
//! semantics belong to the office suite.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::process::Command;

use super::error::ExternalError;
use super::workspace::ScratchWorkspace;

/// Target for a document export invocation.
#[derive(Debug, Clone)]
pub struct ExportTarget {
    /// Output format extension, e.g. "pdf"
    pub format: String,
    /// Optional export filter options appended to the convert-to argument
    pub filter: Option<String>,
}

impl ExportTarget {
    pub fn pdf() -> Self {
        Self {
            format: "pdf".to_string(),
            filter: None,
        }
    }

    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// soffice `--convert-to` argument: `format` or `format:filter`.
    pub fn convert_to_arg(&self) -> String {
        match self.filter {
            Some(ref filter) => format!("{}:{}", self.format, filter),
            None => self.format.clone(),
        }
    }
}

/// Trait seam for document export.
#[async_trait]
pub trait DocumentExporter: Send + Sync {
    async fn export(&self, input: &[u8], target: &ExportTarget) -> Result<Bytes, ExternalError>;
}

/// LibreOffice (soffice) backed exporter.
#[derive(Debug, Clone)]
pub struct SofficeExporter {
    binary: PathBuf,
}

impl Default for SofficeExporter {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("soffice"),
        }
    }
}

impl SofficeExporter {
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl DocumentExporter for SofficeExporter {
    async fn export(&self, input: &[u8], target: &ExportTarget) -> Result<Bytes, ExternalError> {
        let workspace = ScratchWorkspace::create()?;
        let input_path = workspace.write("document", input).await?;
        let output_name = format!("document.{}", target.format);

        let mut command = Command::new(&self.binary);
        command
            .arg("--headless")
            .arg("--convert-to")
            .arg(target.convert_to_arg())
            .arg("--outdir")
            .arg(workspace.root())
            .arg(&input_path);

        super::run_tool("soffice", &mut command).await?;

        if !workspace.path_for(&output_name).exists() {
            return Err(ExternalError::MissingOutput {
                tool: "soffice".to_string(),
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
    fn test_convert_to_arg_plain() {
        assert_eq!(ExportTarget::pdf().convert_to_arg(), "pdf");
    }

    #[test]
    fn test_convert_to_arg_with_filter() {
        let target = ExportTarget::new("pdf").with_filter("writer_pdf_Export");
        assert_eq!(target.convert_to_arg(), "pdf:writer_pdf_Export");
    }

    #[tokio::test]
    async fn test_missing_binary_is_launch_error() {
        let exporter = SofficeExporter::with_binary("/nonexistent/soffice-binary");
        let err = exporter
            .export(b"not a document", &ExportTarget::pdf())
            .await
            .unwrap_err();
        assert!(matches!(err, ExternalError::Launch { .. }));
    }
}
