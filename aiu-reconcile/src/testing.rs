//! In-memory ArchivesSpace used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

use aiu_aspace::{
    ArchivalObject, AspaceApi, ClientError, EntityId, Instance, Ref, RepositoryId, SubContainer,
    TopContainer,
};
use aiu_core::WorkOrderRow;

use crate::container_index::ContainerIndex;

pub(crate) const REPO: RepositoryId = 2;
pub(crate) const RESOURCE: EntityId = 7;

pub(crate) fn row(id: u32, barcode: (&str, &str), indicator: (&str, &str)) -> WorkOrderRow {
    WorkOrderRow {
        resource_ref: format!("/repositories/{REPO}/resources/{RESOURCE}"),
        ref_id: format!("ref{id}"),
        object_uri: format!("/repositories/{REPO}/archival_objects/{id}"),
        indicator_1: "1".into(),
        indicator_2_before: indicator.0.into(),
        indicator_3: String::new(),
        title: format!("Folder {id}"),
        component_id: format!("c-{id}"),
        barcode_before: barcode.0.into(),
        indicator_2_after: indicator.1.into(),
        barcode_after: barcode.1.into(),
    }
}

/// Objects keyed by id in repository 2; top containers 1..=3 carry
/// barcodes B1..B3.
pub(crate) struct FakeAspace {
    objects: RefCell<BTreeMap<EntityId, ArchivalObject>>,
    rejected: RefCell<HashMap<EntityId, String>>,
    containers: Vec<TopContainer>,
    fetches: Cell<usize>,
    updates: Cell<usize>,
}

impl FakeAspace {
    pub(crate) fn tc_uri(n: u32) -> String {
        format!("/repositories/{REPO}/top_containers/{n}")
    }

    pub(crate) fn with_object(id: EntityId, instances: &[(u32, Option<&str>)]) -> Self {
        let fake = Self {
            objects: RefCell::new(BTreeMap::new()),
            rejected: RefCell::new(HashMap::new()),
            containers: (1..=3)
                .map(|n| TopContainer {
                    uri: Self::tc_uri(n),
                    barcode: Some(format!("B{n}")),
                    indicator: n.to_string(),
                })
                .collect(),
            fetches: Cell::new(0),
            updates: Cell::new(0),
        };
        fake.add_object(id, instances);
        fake
    }

    pub(crate) fn add_object(&self, id: EntityId, instances: &[(u32, Option<&str>)]) {
        let ao = ArchivalObject {
            uri: format!("/repositories/{REPO}/archival_objects/{id}"),
            resource: Some(Ref::new(format!("/repositories/{REPO}/resources/{RESOURCE}"))),
            instances: instances
                .iter()
                .map(|(tc, ind)| Instance {
                    instance_type: Some("mixed_materials".into()),
                    sub_container: Some(SubContainer {
                        top_container: Some(Ref::new(Self::tc_uri(*tc))),
                        indicator_2: ind.map(str::to_owned),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };
        self.objects.borrow_mut().insert(id, ao);
    }

    pub(crate) fn reject_updates_for(&self, id: EntityId, message: &str) {
        self.rejected.borrow_mut().insert(id, message.to_owned());
    }

    pub(crate) fn index(&self) -> ContainerIndex {
        ContainerIndex::build(self.containers.clone())
    }

    pub(crate) fn object(&self, id: EntityId) -> ArchivalObject {
        self.objects.borrow()[&id].clone()
    }

    pub(crate) fn container_refs(&self, id: EntityId) -> Vec<String> {
        self.object(id)
            .instances
            .iter()
            .filter_map(|i| i.sub_container.as_ref()?.top_container_uri().map(str::to_owned))
            .collect()
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.get()
    }

    pub(crate) fn updates(&self) -> usize {
        self.updates.get()
    }
}

impl AspaceApi for FakeAspace {
    fn get_archival_object(
        &self,
        repository_id: RepositoryId,
        object_id: EntityId,
    ) -> Result<ArchivalObject, ClientError> {
        self.fetches.set(self.fetches.get() + 1);
        self.objects
            .borrow()
            .get(&object_id)
            .filter(|_| repository_id == REPO)
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                url: format!("/repositories/{repository_id}/archival_objects/{object_id}"),
            })
    }

    fn update_archival_object(
        &self,
        repository_id: RepositoryId,
        object_id: EntityId,
        object: &ArchivalObject,
    ) -> Result<String, ClientError> {
        if let Some(body) = self.rejected.borrow().get(&object_id) {
            return Err(ClientError::Status {
                status: 400,
                url: format!("/repositories/{repository_id}/archival_objects/{object_id}"),
                body: body.clone(),
            });
        }
        self.updates.set(self.updates.get() + 1);
        self.objects.borrow_mut().insert(object_id, object.clone());
        Ok(format!("{{\"status\":\"Updated\",\n\"id\":{object_id}}}\n"))
    }

    fn get_top_containers_for_resource(
        &self,
        repository_id: RepositoryId,
        resource_id: EntityId,
    ) -> Result<Vec<TopContainer>, ClientError> {
        if (repository_id, resource_id) != (REPO, RESOURCE) {
            return Err(ClientError::NotFound {
                url: format!("/repositories/{repository_id}/resources/{resource_id}/top_containers"),
            });
        }
        Ok(self.containers.clone())
    }
}
