//! The capability set the reconciliation engine needs from ArchivesSpace.

use crate::error::ClientError;
use crate::model::{ArchivalObject, TopContainer};
use crate::uri::{EntityId, RepositoryId};

/// Remote operations used by a run.
///
/// Implemented over HTTP by [`crate::AspaceClient`]; tests substitute an
/// in-memory store.
pub trait AspaceApi {
    /// Fetch the current state of one archival object.
    fn get_archival_object(
        &self,
        repository_id: RepositoryId,
        object_id: EntityId,
    ) -> Result<ArchivalObject, ClientError>;

    /// Persist an archival object; returns the backend's confirmation text.
    fn update_archival_object(
        &self,
        repository_id: RepositoryId,
        object_id: EntityId,
        object: &ArchivalObject,
    ) -> Result<String, ClientError>;

    /// Every top container linked to a resource's tree.
    fn get_top_containers_for_resource(
        &self,
        repository_id: RepositoryId,
        resource_id: EntityId,
    ) -> Result<Vec<TopContainer>, ClientError>;
}
