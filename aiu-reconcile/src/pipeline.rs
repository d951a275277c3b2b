//! Shared run entrypoint: work order in, audit log out.
//!
//! Fatal steps (missing work order, audit log creation, resource resolution,
//! container index) return `Err`. Everything after the index is built is
//! row-scoped.

use std::path::{Path, PathBuf};

use chrono::Utc;

use aiu_aspace::{split_uri, AspaceApi, EntityId, RepositoryId};
use aiu_core::WorkOrderRow;

use crate::audit::AuditLog;
use crate::container_index::ContainerIndex;
use crate::driver::{Driver, DriverOptions, RowReport, RunSummary};
use crate::error::ReconcileError;
use crate::workorder::{self, RejectedLine};

/// Prefix of the audit log file name.
pub const AUDIT_PREFIX: &str = "AIU-";

/// Fatal-phase steps, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    CreatingLog(PathBuf),
    ParsingWorkOrder,
    ResolvingResource,
    FetchingContainers,
    Updating,
}

/// Progress notifications emitted while a run advances.
#[derive(Debug)]
pub enum Progress<'a> {
    Step(Step),
    Rejected(&'a RejectedLine),
    IndexBuilt { containers: usize },
    Row(&'a RowReport),
}

/// `AIU-<work order file name>`, next to the work order.
pub fn default_audit_path(work_order: &Path) -> PathBuf {
    let name = work_order
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workorder.tsv".to_owned());
    work_order.with_file_name(format!("{AUDIT_PREFIX}{name}"))
}

/// Repository and resource ids for the run, taken from the first row's
/// archival object.
pub fn resolve_resource(
    api: &dyn AspaceApi,
    first: &WorkOrderRow,
) -> Result<(RepositoryId, EntityId), ReconcileError> {
    let uri = first.object_uri.as_str();
    let fail = |reason: String| ReconcileError::ResourceResolution {
        uri: uri.to_owned(),
        reason,
    };

    let (repository_id, object_id) = split_uri(uri).map_err(|e| fail(e.to_string()))?;
    let ao = api
        .get_archival_object(repository_id, object_id)
        .map_err(|e| fail(e.to_string()))?;
    let resource_uri = ao
        .resource_uri()
        .ok_or_else(|| fail("archival object has no resource".to_owned()))?;
    let (_, resource_id) = split_uri(resource_uri).map_err(|e| fail(e.to_string()))?;
    Ok((repository_id, resource_id))
}

/// Fetch the resource's top containers and index them by barcode.
pub fn build_index(
    api: &dyn AspaceApi,
    repository_id: RepositoryId,
    resource_id: EntityId,
) -> Result<ContainerIndex, ReconcileError> {
    let containers = api
        .get_top_containers_for_resource(repository_id, resource_id)
        .map_err(|source| ReconcileError::ContainerIndex {
            resource_id,
            source,
        })?;
    Ok(ContainerIndex::build(containers))
}

/// Run a work order end to end.
pub fn run<F>(
    api: &dyn AspaceApi,
    work_order: &Path,
    audit_path: &Path,
    options: DriverOptions,
    mut on_progress: F,
) -> Result<RunSummary, ReconcileError>
where
    F: FnMut(Progress<'_>),
{
    let started_at = Utc::now();
    if !work_order.exists() {
        return Err(ReconcileError::WorkOrderNotFound {
            path: work_order.to_path_buf(),
        });
    }

    on_progress(Progress::Step(Step::CreatingLog(audit_path.to_path_buf())));
    let mut audit = AuditLog::create(audit_path)?;

    on_progress(Progress::Step(Step::ParsingWorkOrder));
    let order = workorder::parse_file(work_order)?;
    for rejected in &order.rejected {
        audit.append(&rejected.to_outcome())?;
        on_progress(Progress::Rejected(rejected));
    }

    let mut summary = match order.rows.first() {
        None => {
            tracing::info!("{}: no rows to process", work_order.display());
            RunSummary::new()
        }
        Some(first) => {
            on_progress(Progress::Step(Step::ResolvingResource));
            let (repository_id, resource_id) = resolve_resource(api, first)?;

            on_progress(Progress::Step(Step::FetchingContainers));
            let index = build_index(api, repository_id, resource_id)?;
            on_progress(Progress::IndexBuilt {
                containers: index.len(),
            });

            on_progress(Progress::Step(Step::Updating));
            let mut driver = Driver::new(api, &index, &mut audit, options);
            driver.run(&order.rows, |report| on_progress(Progress::Row(report)))?
        }
    };

    summary.skipped = order.rejected.len();
    summary.started_at = started_at;
    summary.finished_at = Utc::now();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{row, FakeAspace};

    #[test]
    fn audit_path_sits_next_to_work_order() {
        let path = default_audit_path(Path::new("/data/orders/batch-7.tsv"));
        assert_eq!(path, PathBuf::from("/data/orders/AIU-batch-7.tsv"));
        assert_eq!(
            default_audit_path(Path::new("order.tsv")),
            PathBuf::from("AIU-order.tsv")
        );
    }

    #[test]
    fn resolves_resource_from_first_row() {
        let api = FakeAspace::with_object(101, &[(1, None)]);
        let ids = resolve_resource(&api, &row(101, ("B1", "B2"), ("", ""))).unwrap();
        assert_eq!(ids, (2, 7));
    }

    #[test]
    fn unresolvable_first_row_is_fatal() {
        let api = FakeAspace::with_object(101, &[(1, None)]);
        let err = resolve_resource(&api, &row(55, ("B1", "B2"), ("", ""))).unwrap_err();
        assert!(matches!(err, ReconcileError::ResourceResolution { .. }));
    }

    #[test]
    fn container_fetch_failure_is_fatal() {
        let api = FakeAspace::with_object(101, &[(1, None)]);
        let err = build_index(&api, 2, 99).unwrap_err();
        assert!(matches!(err, ReconcileError::ContainerIndex { resource_id: 99, .. }));
    }
}
