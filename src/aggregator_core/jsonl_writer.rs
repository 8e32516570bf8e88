//! JSONL writer for aggregation reports - one snapshot per line in `reports.jsonl`

use super::engine::AggregationReport;
use super::writer_backend::{ReportWriterBackend, ReportWriterError};
use async_trait::async_trait;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const REPORTS_FILE_NAME: &str = "reports.jsonl";

#[derive(Serialize)]
struct ReportLine<'a> {
    generated_at: i64,
    #[serde(flatten)]
    report: &'a AggregationReport,
}

pub struct JsonlReportWriter {
    writer: BufWriter<File>,
    file_path: PathBuf,
}

impl JsonlReportWriter {
    /// Append to `<output_dir>/reports.jsonl`, creating the directory if needed
    pub fn new(output_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        let file_path = output_dir.join(REPORTS_FILE_NAME);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;

        log::info!("📝 Writing reports to: {}", file_path.display());

        Ok(Self {
            writer: BufWriter::new(file),
            file_path,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn write_report(&mut self, report: &AggregationReport, generated_at: i64) -> Result<(), ReportWriterError> {
        let json = serde_json::to_string(&ReportLine { generated_at, report })?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for JsonlReportWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

#[async_trait]
impl ReportWriterBackend for JsonlReportWriter {
    async fn write_report(
        &mut self,
        report: &AggregationReport,
        generated_at: i64,
    ) -> Result<(), ReportWriterError> {
        JsonlReportWriter::write_report(self, report, generated_at)
    }

    async fn flush(&mut self) -> Result<(), ReportWriterError> {
        JsonlReportWriter::flush(self)?;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "JSONL"
    }
}
