//! Work order parsing.
//!
//! A work order is a tab-separated file whose first line is a header. Every
//! other line must carry exactly [`WORK_ORDER_COLUMNS`] fields; lines that do
//! not are rejected individually and parsing continues. Bytes that are not
//! valid UTF-8 are replaced, never fatal.

use std::borrow::Cow;
use std::io;
use std::path::Path;

use aiu_core::{OutcomeRecord, RowStatus, WorkOrderRow, WORK_ORDER_COLUMNS};

use crate::error::{io_err, ReconcileError};

/// A line excluded from processing because of its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number in the file (the header is line 1).
    pub line: u64,
    pub field_count: usize,
    /// Third column when present, otherwise empty.
    pub object_uri: String,
}

impl RejectedLine {
    pub fn message(&self) -> String {
        format!(
            "malformed line {}: expected {WORK_ORDER_COLUMNS} columns, found {}",
            self.line, self.field_count
        )
    }

    /// The SKIPPED audit record for this line.
    pub fn to_outcome(&self) -> OutcomeRecord {
        OutcomeRecord::bare(self.object_uri.clone(), RowStatus::Skipped, self.message())
    }
}

/// Parsed work order: accepted rows in file order, plus rejected lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkOrder {
    pub rows: Vec<WorkOrderRow>,
    pub rejected: Vec<RejectedLine>,
}

/// Parse a work order from any reader.
pub fn parse_reader<R: io::Read>(reader: R) -> Result<WorkOrder, ReconcileError> {
    let mut tsv = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut order = WorkOrder::default();
    for record in tsv.byte_records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let fields: Vec<Cow<'_, str>> = record.iter().map(String::from_utf8_lossy).collect();
        if fields.iter().any(|f| matches!(f, Cow::Owned(_))) {
            tracing::warn!("line {line}: invalid UTF-8 replaced with U+FFFD");
        }
        match WorkOrderRow::from_fields(&fields) {
            Some(row) => order.rows.push(row),
            None => {
                let rejected = RejectedLine {
                    line,
                    field_count: fields.len(),
                    object_uri: fields.get(2).map(|s| s.to_string()).unwrap_or_default(),
                };
                tracing::warn!("{}, skipping", rejected.message());
                order.rejected.push(rejected);
            }
        }
    }
    Ok(order)
}

/// Parse the work order at `path`.
pub fn parse_file(path: &Path) -> Result<WorkOrder, ReconcileError> {
    if !path.exists() {
        return Err(ReconcileError::WorkOrderNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path).map_err(|e| io_err(path, e))?;
    parse_reader(file)
}
