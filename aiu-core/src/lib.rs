//! aiu-core — domain types and environment configuration shared by the
//! ArchivesSpace instance updater.
//!
//! - [`types`] — work order rows, directions, outcomes
//! - [`config`] — environment file loading
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, Environment};
pub use error::ConfigError;
pub use types::{
    Direction, MissingTargetPolicy, OutcomeRecord, RowStatus, RowValues, RunMode, WorkOrderRow,
    WORK_ORDER_COLUMNS,
};
