//! Report export
//!
//! The backend renders the report; this module fetches the complete bytes
//! and hands them to a [`ReportSink`] (share sheet, download folder...).
//! Nothing reaches the sink unless the whole body arrived.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use shared::models::{DateRange, ReportFormat};
use thiserror::Error;

use crate::ClientError;
use crate::api::CajeroApi;

/// A fully downloaded report
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    pub format: ReportFormat,
    pub range: DateRange,
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl RenderedReport {
    pub fn new(format: ReportFormat, range: DateRange, bytes: Vec<u8>) -> Self {
        let file_name = if range.start() == range.end() {
            format!("reporte-ventas_{}.{}", range.start(), format.extension())
        } else {
            format!(
                "reporte-ventas_{}_{}.{}",
                range.start(),
                range.end(),
                format.extension()
            )
        };
        Self {
            format,
            range,
            file_name,
            mime_type: format.mime_type(),
            bytes,
        }
    }
}

/// Where rendered reports are delivered for the user
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn deliver(&self, report: &RenderedReport) -> std::io::Result<()>;
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Report delivery failed: {0}")]
    Delivery(#[from] std::io::Error),
}

impl ExportError {
    pub fn user_message(&self) -> String {
        match self {
            ExportError::Client(e) => e.user_message(),
            ExportError::Delivery(_) => "No se pudo guardar el reporte".to_string(),
        }
    }
}

/// Fetch a report and deliver it.
///
/// Safe to repeat: each call issues its own GET and nothing changes
/// server-side.
pub async fn export_report<A, S>(
    api: &A,
    format: ReportFormat,
    range: DateRange,
    sink: &S,
) -> Result<RenderedReport, ExportError>
where
    A: CajeroApi + ?Sized,
    S: ReportSink + ?Sized,
{
    let bytes = api.report(format, range).await?;
    if bytes.is_empty() {
        return Err(ClientError::InvalidResponse("empty report body".into()).into());
    }
    let report = RenderedReport::new(format, range, bytes);
    sink.deliver(&report).await?;
    tracing::info!(
        format = %format,
        file = %report.file_name,
        size = report.bytes.len(),
        "Report exported"
    );
    Ok(report)
}

/// Saves reports into a directory (the download collaborator)
///
/// Writes to a hidden temporary file first and renames it, so an
/// interrupted write never leaves a truncated report behind.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, report: &RenderedReport) -> PathBuf {
        self.dir.join(&report.file_name)
    }
}

#[async_trait]
impl ReportSink for FileSink {
    async fn deliver(&self, report: &RenderedReport) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let target = self.path_for(report);
        let partial = self.dir.join(format!(".{}.part", report.file_name));
        if let Err(e) = tokio::fs::write(&partial, &report.bytes).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
        tokio::fs::rename(&partial, &target).await?;
        tracing::debug!(path = %target.display(), "Report saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Call, MockApi};
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CollectingSink {
        delivered: Mutex<Vec<RenderedReport>>,
    }

    #[async_trait]
    impl ReportSink for CollectingSink {
        async fn deliver(&self, report: &RenderedReport) -> std::io::Result<()> {
            self.delivered.lock().unwrap().push(report.clone());
            Ok(())
        }
    }

    fn jan_first() -> DateRange {
        DateRange::day(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[tokio::test]
    async fn test_repeated_export_issues_independent_requests() {
        let api = MockApi::default();
        api.push_report(Ok(b"PK-xlsx".to_vec()));
        api.push_report(Ok(b"PK-xlsx".to_vec()));
        let sink = CollectingSink::default();

        let first = export_report(&api, ReportFormat::Excel, jan_first(), &sink)
            .await
            .unwrap();
        let second = export_report(&api, ReportFormat::Excel, jan_first(), &sink)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.file_name, "reporte-ventas_2024-01-01.xlsx");
        assert_eq!(
            api.calls(),
            vec![
                Call::Report(ReportFormat::Excel, jan_first()),
                Call::Report(ReportFormat::Excel, jan_first()),
            ]
        );
        assert_eq!(sink.delivered.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_delivers_nothing() {
        let api = MockApi::default();
        api.push_report(Err(ClientError::Api {
            status: 500,
            message: Some("Error generando PDF".into()),
        }));
        api.push_report(Ok(Vec::new()));
        let sink = CollectingSink::default();

        let err = export_report(&api, ReportFormat::Pdf, jan_first(), &sink)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Error generando PDF");

        let err = export_report(&api, ReportFormat::Pdf, jan_first(), &sink)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExportError::Client(ClientError::InvalidResponse(_))
        ));
        assert!(sink.delivered.lock().unwrap().is_empty());
    }

    #[test]
    fn test_file_name_for_range() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();
        let report = RenderedReport::new(ReportFormat::Pdf, range, vec![1]);
        assert_eq!(report.file_name, "reporte-ventas_2024-01-01_2024-01-31.pdf");
        assert_eq!(report.mime_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_file_sink_writes_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("reportes"));
        let report = RenderedReport::new(ReportFormat::Pdf, jan_first(), b"%PDF-1.7".to_vec());

        sink.deliver(&report).await.unwrap();

        let path = sink.path_for(&report);
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7");
        let leftovers: Vec<_> = std::fs::read_dir(sink.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
