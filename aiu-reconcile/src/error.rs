//! Error types for aiu-reconcile.
//!
//! Everything here is fatal for a run. Row-scoped failures never become a
//! [`ReconcileError`]; the driver records them as ERROR outcomes instead.

use std::path::PathBuf;

use thiserror::Error;

use aiu_aspace::ClientError;

/// All errors that terminate a run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The work order path does not exist.
    #[error("work order location is not valid: {path}")]
    WorkOrderNotFound { path: PathBuf },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the work order or writing the audit log failed.
    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Repository/resource ids could not be derived from the first row.
    #[error("cannot resolve resource from {uri}: {reason}")]
    ResourceResolution { uri: String, reason: String },

    /// Fetching the resource's top containers failed.
    #[error("cannot build container index for resource {resource_id}: {source}")]
    ContainerIndex {
        resource_id: u32,
        #[source]
        source: ClientError,
    },
}

/// Convenience constructor for [`ReconcileError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ReconcileError {
    ReconcileError::Io {
        path: path.into(),
        source,
    }
}
