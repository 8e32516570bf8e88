//! Unified writer interface for aggregation reports
//!
//! Routes writes to either JSONL or SQLite backend based on configuration.

use super::engine::AggregationReport;
use super::jsonl_writer::JsonlReportWriter;
use super::sqlite_writer::SqliteReportWriter;
use super::writer_backend::{ReportWriterBackend, ReportWriterError};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendType {
    Jsonl,
    Sqlite,
}

/// Unified writer that routes to either JSONL or SQLite backend
pub enum ReportWriter {
    Jsonl(JsonlReportWriter),
    Sqlite(SqliteReportWriter),
}

impl ReportWriter {
    /// `output_path` is a directory for JSONL and a database file for SQLite
    pub fn new(backend: BackendType, output_path: PathBuf) -> Result<Self, ReportWriterError> {
        match backend {
            BackendType::Jsonl => {
                let writer = JsonlReportWriter::new(output_path)?;
                Ok(ReportWriter::Jsonl(writer))
            }
            BackendType::Sqlite => {
                let writer = SqliteReportWriter::new(output_path)?;
                Ok(ReportWriter::Sqlite(writer))
            }
        }
    }

    pub async fn write_report(
        &mut self,
        report: &AggregationReport,
        generated_at: i64,
    ) -> Result<(), ReportWriterError> {
        match self {
            ReportWriter::Jsonl(w) => w.write_report(report, generated_at),
            ReportWriter::Sqlite(w) => ReportWriterBackend::write_report(w, report, generated_at).await,
        }
    }

    pub async fn flush(&mut self) -> Result<(), ReportWriterError> {
        match self {
            ReportWriter::Jsonl(w) => {
                w.flush()?;
                Ok(())
            }
            ReportWriter::Sqlite(w) => ReportWriterBackend::flush(w).await,
        }
    }

    pub fn backend_type(&self) -> &'static str {
        match self {
            ReportWriter::Jsonl(w) => w.backend_type(),
            ReportWriter::Sqlite(w) => w.backend_type(),
        }
    }
}
