//! Tab-delimited audit log, one line per processed row.
//!
//! The header is written once at creation. Every append is flushed so an
//! interrupted run still leaves a readable log.

use std::fs::File;
use std::io;
use std::path::Path;

use aiu_core::OutcomeRecord;

use crate::error::{io_err, ReconcileError};

/// Column titles, in write order.
pub const AUDIT_HEADER: [&str; 7] = [
    "AO URI",
    "Result",
    "Original Barcode",
    "Updated Barcode",
    "Original Child Ind 2",
    "Updated Child Ind 2",
    "Error Msg",
];

/// Path label for I/O errors raised while writing to the sink.
const AUDIT_SINK: &str = "<audit log>";

/// Append-only outcome log.
pub struct AuditLog<W: io::Write> {
    writer: csv::Writer<W>,
    lines: usize,
}

impl AuditLog<File> {
    /// Create (or truncate) the log file at `path` and write the header.
    pub fn create(path: &Path) -> Result<Self, ReconcileError> {
        let file = File::create(path).map_err(|e| io_err(path, e))?;
        Self::new(file)
    }
}

impl<W: io::Write> AuditLog<W> {
    /// Wrap any writer and write the header.
    pub fn new(inner: W) -> Result<Self, ReconcileError> {
        let writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .has_headers(false)
            .from_writer(inner);
        let mut log = Self { writer, lines: 0 };
        log.write_line(&AUDIT_HEADER)?;
        Ok(log)
    }

    /// Write one outcome and flush.
    pub fn append(&mut self, outcome: &OutcomeRecord) -> Result<(), ReconcileError> {
        let status = outcome.status.to_string();
        self.write_line(&[
            outcome.object_uri.as_str(),
            status.as_str(),
            outcome.barcode_before.as_str(),
            outcome.barcode_after.as_str(),
            outcome.indicator_before.as_str(),
            outcome.indicator_after.as_str(),
            outcome.error_message.as_str(),
        ])?;
        self.lines += 1;
        Ok(())
    }

    /// Number of outcome lines written (the header is not counted).
    pub fn len(&self) -> usize {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, ReconcileError> {
        self.writer
            .into_inner()
            .map_err(|e| io_err(AUDIT_SINK, e.into_error()))
    }

    fn write_line(&mut self, fields: &[&str]) -> Result<(), ReconcileError> {
        self.writer
            .write_record(fields.iter().map(|f| sanitize(f)))?;
        self.writer.flush().map_err(|e| io_err(AUDIT_SINK, e))?;
        Ok(())
    }
}

/// Tabs and line breaks would shift or split columns.
fn sanitize(field: &str) -> String {
    field.replace(['\t', '\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiu_core::RowStatus;
    use tempfile::TempDir;

    fn outcome(status: RowStatus, msg: &str) -> OutcomeRecord {
        OutcomeRecord {
            object_uri: "/repositories/2/archival_objects/101".into(),
            status,
            barcode_before: "B1".into(),
            barcode_after: "B2".into(),
            indicator_before: String::new(),
            indicator_after: String::new(),
            error_message: msg.into(),
        }
    }

    fn render(outcomes: &[OutcomeRecord]) -> String {
        let mut log = AuditLog::new(Vec::new()).unwrap();
        for o in outcomes {
            log.append(o).unwrap();
        }
        String::from_utf8(log.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn header_is_written_once() {
        let text = render(&[]);
        assert_eq!(
            text,
            "AO URI\tResult\tOriginal Barcode\tUpdated Barcode\tOriginal Child Ind 2\tUpdated Child Ind 2\tError Msg\n"
        );
    }

    #[test]
    fn lines_follow_fixed_column_order() {
        let text = render(&[outcome(RowStatus::Success, "")]);
        let line = text.lines().nth(1).unwrap();
        assert_eq!(line, "/repositories/2/archival_objects/101\tSUCCESS\tB1\tB2\t\t\t");
        assert_eq!(line.split('\t').count(), 7);
    }

    #[test]
    fn embedded_tabs_and_newlines_cannot_break_columns() {
        let text = render(&[outcome(RowStatus::Error, "bad\trequest\nline two")]);
        assert_eq!(text.lines().count(), 2);
        let line = text.lines().nth(1).unwrap();
        assert_eq!(line.split('\t').count(), 7);
        assert!(line.ends_with("bad request line two"));
    }

    #[test]
    fn quotes_are_not_escaped() {
        let text = render(&[outcome(RowStatus::Error, "\"status\":\"Updated\"")]);
        assert!(text.contains("\t\"status\":\"Updated\"\n"));
    }

    #[test]
    fn file_log_is_readable_after_each_append() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("AIU-order.tsv");
        let mut log = AuditLog::create(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);

        log.append(&outcome(RowStatus::Skipped, "malformed")).unwrap();
        // Not dropped yet: the line must already be on disk.
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk.lines().count(), 2);
        assert!(on_disk.contains("SKIPPED"));
        assert_eq!(log.len(), 1);
    }
}
