//! # aiu-reconcile
//!
//! Reconciles work order rows against live ArchivesSpace records.
//!
//! Call [`pipeline::run`] to process a whole work order, or assemble a
//! [`Driver`] yourself from an [`aiu_aspace::AspaceApi`], a
//! [`ContainerIndex`] and an [`AuditLog`].

pub mod audit;
pub mod container_index;
pub mod driver;
pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod workorder;

#[cfg(test)]
pub(crate) mod testing;

pub use audit::AuditLog;
pub use container_index::ContainerIndex;
pub use driver::{Driver, DriverOptions, FailureStage, RowReport, RowState, RunSummary};
pub use error::ReconcileError;
pub use matcher::{MatchError, Mutation};
pub use workorder::{RejectedLine, WorkOrder};
