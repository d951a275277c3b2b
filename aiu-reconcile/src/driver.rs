//! Per-row reconciliation.
//!
//! ## Row lifecycle
//!
//! 1. No-op rows (both value pairs equal) are filtered out: no fetch, no
//!    persist, no audit line.
//! 2. Split the object URI.
//! 3. Fetch the archival object fresh from the backend.
//! 4. Match and mutate its instances.
//! 5. Test mode: report what would be written, persist nothing.
//! 6. Otherwise persist the mutated object.
//!
//! Failures in steps 2, 3, 4 and 6 are recorded as ERROR outcomes and the
//! next row is processed. Only a failing audit log aborts the run.

use std::io;

use chrono::{DateTime, Utc};
use serde::Serialize;

use aiu_aspace::{split_uri, ArchivalObject, AspaceApi};
use aiu_core::{Direction, MissingTargetPolicy, OutcomeRecord, RowStatus, RunMode, WorkOrderRow};

use crate::audit::AuditLog;
use crate::container_index::ContainerIndex;
use crate::error::ReconcileError;
use crate::matcher::{self, Mutation};

/// Result message of a row processed in test mode.
pub const TEST_MODE_MESSAGE: &str = "would update, not persisted";

/// Options for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriverOptions {
    pub mode: RunMode,
    pub missing_target: MissingTargetPolicy,
}

impl DriverOptions {
    pub fn direction(&self) -> Direction {
        self.mode.direction
    }
}

/// Where a failed row stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Uri,
    Fetch,
    Match,
    Persist,
}

/// Terminal state of a processed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    /// The mutated object was sent back to the backend.
    Persisted,
    /// Test mode: the mutation was computed but not sent.
    SkippedTest,
    Failed(FailureStage),
}

/// Everything known about one processed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReport {
    pub state: RowState,
    /// The line written to the audit log.
    pub outcome: OutcomeRecord,
    /// Present once matching succeeded.
    pub mutation: Option<Mutation>,
    /// Human-readable result for the console.
    pub message: String,
}

/// Counts for a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub succeeded: usize,
    pub failed: usize,
    /// Lines rejected while parsing the work order.
    pub skipped: usize,
    /// Rows filtered out because they change nothing.
    pub noop: usize,
    /// Rows actually written to the backend.
    pub persisted: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            succeeded: 0,
            failed: 0,
            skipped: 0,
            noop: 0,
            persisted: 0,
        }
    }

    /// Rows that went through the state machine.
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    fn record(&mut self, report: &RowReport) {
        match report.state {
            RowState::Persisted => {
                self.succeeded += 1;
                self.persisted += 1;
            }
            RowState::SkippedTest => self.succeeded += 1,
            RowState::Failed(_) => self.failed += 1,
        }
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives rows against the backend.
///
/// Holds its collaborators explicitly; rows are processed strictly one at a
/// time, in the order given.
pub struct Driver<'a, W: io::Write> {
    api: &'a dyn AspaceApi,
    index: &'a ContainerIndex,
    audit: &'a mut AuditLog<W>,
    options: DriverOptions,
}

impl<'a, W: io::Write> Driver<'a, W> {
    pub fn new(
        api: &'a dyn AspaceApi,
        index: &'a ContainerIndex,
        audit: &'a mut AuditLog<W>,
        options: DriverOptions,
    ) -> Self {
        Self {
            api,
            index,
            audit,
            options,
        }
    }

    /// Process every row in order, calling `on_row` after each audited row.
    pub fn run<'r, I, F>(&mut self, rows: I, mut on_row: F) -> Result<RunSummary, ReconcileError>
    where
        I: IntoIterator<Item = &'r WorkOrderRow>,
        F: FnMut(&RowReport),
    {
        let mut summary = RunSummary::new();
        for row in rows {
            match self.process(row)? {
                Some(report) => {
                    summary.record(&report);
                    on_row(&report);
                }
                None => summary.noop += 1,
            }
        }
        summary.finished_at = Utc::now();
        Ok(summary)
    }

    /// Process one row and append its outcome to the audit log.
    ///
    /// Returns `Ok(None)` for a no-op row.
    pub fn process(&mut self, row: &WorkOrderRow) -> Result<Option<RowReport>, ReconcileError> {
        if row.is_noop() {
            tracing::debug!("{}: nothing to change, skipping", row.object_uri);
            return Ok(None);
        }

        let report = self.reconcile(row);
        self.audit.append(&report.outcome)?;
        match report.state {
            RowState::Failed(stage) => {
                tracing::warn!("{} failed at {stage:?}: {}", row.object_uri, report.message)
            }
            _ => tracing::info!("{}: {}", row.object_uri, report.message),
        }
        Ok(Some(report))
    }

    fn reconcile(&self, row: &WorkOrderRow) -> RowReport {
        let uri = row.object_uri.as_str();

        let (repository_id, object_id) = match split_uri(uri) {
            Ok(ids) => ids,
            Err(err) => {
                return failed_bare(
                    uri,
                    FailureStage::Uri,
                    err.to_string(),
                    format!("could not parse URI {uri}, skipping"),
                )
            }
        };

        let mut snapshot = match self.api.get_archival_object(repository_id, object_id) {
            Ok(ao) => ao,
            Err(err) => {
                let message = if err.is_not_found() {
                    format!("{uri} does not exist, skipping")
                } else {
                    format!("could not fetch {uri}: {err}")
                };
                return failed_bare(uri, FailureStage::Fetch, err.to_string(), message);
            }
        };

        let direction = self.options.direction();
        let mutation = match matcher::apply(
            &mut snapshot,
            row,
            direction,
            self.index,
            self.options.missing_target,
        ) {
            Ok(m) => m,
            Err(err) => {
                let values = row.values(direction);
                let unchanged = Mutation {
                    barcode_before: values.barcode_current.to_owned(),
                    barcode_after: values.barcode_current.to_owned(),
                    indicator_before: values.indicator_current.to_owned(),
                    indicator_after: values.indicator_current.to_owned(),
                    ..Mutation::default()
                };
                return RowReport {
                    state: RowState::Failed(FailureStage::Match),
                    outcome: outcome_for(&snapshot, uri, RowStatus::Error, &unchanged, err.to_string()),
                    mutation: None,
                    message: err.to_string(),
                };
            }
        };

        if !mutation.changed() {
            tracing::debug!("{uri}: no instance matched, record is written back unchanged");
        }

        if self.options.mode.test {
            return RowReport {
                state: RowState::SkippedTest,
                outcome: outcome_for(&snapshot, uri, RowStatus::Success, &mutation, TEST_MODE_MESSAGE.to_owned()),
                mutation: Some(mutation),
                message: TEST_MODE_MESSAGE.to_owned(),
            };
        }

        match self
            .api
            .update_archival_object(repository_id, object_id, &snapshot)
        {
            Ok(confirmation) => RowReport {
                state: RowState::Persisted,
                outcome: outcome_for(&snapshot, uri, RowStatus::Success, &mutation, String::new()),
                mutation: Some(mutation),
                message: one_line(&confirmation),
            },
            Err(err) => {
                let text = one_line(&err.to_string());
                RowReport {
                    state: RowState::Failed(FailureStage::Persist),
                    outcome: outcome_for(&snapshot, uri, RowStatus::Error, &mutation, text.clone()),
                    mutation: Some(mutation),
                    message: text,
                }
            }
        }
    }
}

fn failed_bare(uri: &str, stage: FailureStage, error: String, message: String) -> RowReport {
    RowReport {
        state: RowState::Failed(stage),
        outcome: OutcomeRecord::bare(uri, RowStatus::Error, one_line(&error)),
        mutation: None,
        message,
    }
}

fn outcome_for(
    snapshot: &ArchivalObject,
    row_uri: &str,
    status: RowStatus,
    m: &Mutation,
    error_message: String,
) -> OutcomeRecord {
    let object_uri = if snapshot.uri.is_empty() {
        row_uri
    } else {
        snapshot.uri.as_str()
    };
    OutcomeRecord {
        object_uri: object_uri.to_owned(),
        status,
        barcode_before: m.barcode_before.clone(),
        barcode_after: m.barcode_after.clone(),
        indicator_before: m.indicator_before.clone(),
        indicator_after: m.indicator_after.clone(),
        error_message,
    }
}

fn one_line(s: &str) -> String {
    s.replace(['\r', '\n'], "")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
