//! Domain types for a work order run.
//!
//! Rows are immutable once parsed; outcomes are append-only records written
//! to the audit log.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Work order row
// ---------------------------------------------------------------------------

/// Number of tab-separated columns in a well-formed work order line.
pub const WORK_ORDER_COLUMNS: usize = 11;

/// One change request from the work order, in file column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderRow {
    pub resource_ref: String,
    pub ref_id: String,
    pub object_uri: String,
    pub indicator_1: String,
    pub indicator_2_before: String,
    pub indicator_3: String,
    pub title: String,
    pub component_id: String,
    pub barcode_before: String,
    pub indicator_2_after: String,
    pub barcode_after: String,
}

/// The current and target values of a row for one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowValues<'a> {
    pub barcode_current: &'a str,
    pub barcode_target: &'a str,
    pub indicator_current: &'a str,
    pub indicator_target: &'a str,
}

impl WorkOrderRow {
    /// Build a row from exactly [`WORK_ORDER_COLUMNS`] fields.
    ///
    /// Returns `None` for any other field count.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Option<Self> {
        if fields.len() != WORK_ORDER_COLUMNS {
            return None;
        }
        let f = |i: usize| fields[i].as_ref().to_owned();
        Some(Self {
            resource_ref: f(0),
            ref_id: f(1),
            object_uri: f(2),
            indicator_1: f(3),
            indicator_2_before: f(4),
            indicator_3: f(5),
            title: f(6),
            component_id: f(7),
            barcode_before: f(8),
            indicator_2_after: f(9),
            barcode_after: f(10),
        })
    }

    pub fn barcode_changes(&self) -> bool {
        self.barcode_before != self.barcode_after
    }

    pub fn indicator_changes(&self) -> bool {
        self.indicator_2_before != self.indicator_2_after
    }

    /// True when neither value pair changes anything.
    pub fn is_noop(&self) -> bool {
        !self.barcode_changes() && !self.indicator_changes()
    }

    /// Select which value of each pair is "current" and which is "target".
    pub fn values(&self, direction: Direction) -> RowValues<'_> {
        match direction {
            Direction::Forward => RowValues {
                barcode_current: &self.barcode_before,
                barcode_target: &self.barcode_after,
                indicator_current: &self.indicator_2_before,
                indicator_target: &self.indicator_2_after,
            },
            Direction::Undo => RowValues {
                barcode_current: &self.barcode_after,
                barcode_target: &self.barcode_before,
                indicator_current: &self.indicator_2_after,
                indicator_target: &self.indicator_2_before,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which way a work order is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Undo,
}

impl Direction {
    pub fn from_undo_flag(undo: bool) -> Self {
        if undo {
            Direction::Undo
        } else {
            Direction::Forward
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Undo => write!(f, "undo"),
        }
    }
}

/// What to do with an instance whose current container matches but whose
/// target barcode has no top container in the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingTargetPolicy {
    /// Rewrite the container ref to the empty identity.
    #[default]
    Unlink,
    /// Leave the container ref as it is.
    Keep,
    /// Reject the row with an error; nothing is persisted.
    Fail,
}

impl fmt::Display for MissingTargetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingTargetPolicy::Unlink => write!(f, "unlink"),
            MissingTargetPolicy::Keep => write!(f, "keep"),
            MissingTargetPolicy::Fail => write!(f, "fail"),
        }
    }
}

impl FromStr for MissingTargetPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unlink" => Ok(Self::Unlink),
            "keep" => Ok(Self::Keep),
            "fail" => Ok(Self::Fail),
            other => Err(format!(
                "unknown missing-target policy '{other}'; expected: unlink, keep, fail"
            )),
        }
    }
}

/// Result column of an audit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RowStatus {
    Success,
    Error,
    Skipped,
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowStatus::Success => write!(f, "SUCCESS"),
            RowStatus::Error => write!(f, "ERROR"),
            RowStatus::Skipped => write!(f, "SKIPPED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome record
// ---------------------------------------------------------------------------

/// One audit line. Created once per processed (or rejected) row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub object_uri: String,
    pub status: RowStatus,
    pub barcode_before: String,
    pub barcode_after: String,
    pub indicator_before: String,
    pub indicator_after: String,
    pub error_message: String,
}

impl OutcomeRecord {
    /// An outcome that carries no before/after values, only a message.
    pub fn bare(object_uri: impl Into<String>, status: RowStatus, message: impl Into<String>) -> Self {
        Self {
            object_uri: object_uri.into(),
            status,
            barcode_before: String::new(),
            barcode_after: String::new(),
            indicator_before: String::new(),
            indicator_after: String::new(),
            error_message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Run mode
// ---------------------------------------------------------------------------

/// Flags selected for one run. `test` and `undo` are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunMode {
    /// Compute and log, but never persist.
    pub test: bool,
    pub direction: Direction,
}

impl RunMode {
    pub fn new(test: bool, undo: bool) -> Self {
        Self {
            test,
            direction: Direction::from_undo_flag(undo),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
