//! Shared fixtures for aiu-reconcile integration tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use aiu_aspace::{
    ArchivalObject, AspaceApi, ClientError, EntityId, Instance, Ref, RepositoryId, SubContainer,
    TopContainer,
};

pub const HEADER: &str = "Resource\tRef ID\tURI\tIndicator 1\tIndicator 2\tIndicator 3\tTitle\tComponent ID\tBarcode\tNew Indicator 2\tNew Barcode";

/// One work order line for archival object `id` in repository 2.
pub fn line(id: u32, barcode: (&str, &str), indicator: (&str, &str)) -> String {
    format!(
        "/repositories/2/resources/7\tref{id}\t/repositories/2/archival_objects/{id}\tBox 1\t{}\t\tFolder {id}\tc-{id}\t{}\t{}\t{}",
        indicator.0, barcode.0, indicator.1, barcode.1
    )
}

pub fn write_work_order(dir: &Path, lines: &[String]) -> PathBuf {
    let path = dir.join("order.tsv");
    let mut text = String::from(HEADER);
    for l in lines {
        text.push('\n');
        text.push_str(l);
    }
    text.push('\n');
    std::fs::write(&path, text).unwrap();
    path
}

pub fn tc_uri(n: u32) -> String {
    format!("/repositories/2/top_containers/{n}")
}

/// Repository 2, resource 7, top containers 1..=3 with barcodes B1..B3.
#[derive(Default)]
pub struct MemoryAspace {
    pub objects: RefCell<BTreeMap<EntityId, ArchivalObject>>,
    pub updates: Cell<usize>,
}

impl MemoryAspace {
    pub fn with_objects(objects: &[(EntityId, u32, &str)]) -> Self {
        let store = Self::default();
        for (id, tc, ind) in objects {
            store.objects.borrow_mut().insert(
                *id,
                ArchivalObject {
                    uri: format!("/repositories/2/archival_objects/{id}"),
                    resource: Some(Ref::new("/repositories/2/resources/7")),
                    instances: vec![Instance {
                        instance_type: Some("mixed_materials".into()),
                        sub_container: Some(SubContainer {
                            top_container: Some(Ref::new(tc_uri(*tc))),
                            indicator_2: Some(ind.to_string()),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
            );
        }
        store
    }

    pub fn container_of(&self, id: EntityId) -> String {
        self.objects.borrow()[&id].instances[0]
            .sub_container
            .as_ref()
            .and_then(|sc| sc.top_container_uri())
            .unwrap_or_default()
            .to_owned()
    }
}

impl AspaceApi for MemoryAspace {
    fn get_archival_object(
        &self,
        repository_id: RepositoryId,
        object_id: EntityId,
    ) -> Result<ArchivalObject, ClientError> {
        self.objects
            .borrow()
            .get(&object_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                url: format!("/repositories/{repository_id}/archival_objects/{object_id}"),
            })
    }

    fn update_archival_object(
        &self,
        _repository_id: RepositoryId,
        object_id: EntityId,
        object: &ArchivalObject,
    ) -> Result<String, ClientError> {
        self.updates.set(self.updates.get() + 1);
        self.objects.borrow_mut().insert(object_id, object.clone());
        Ok("{\"status\":\"Updated\"}".to_owned())
    }

    fn get_top_containers_for_resource(
        &self,
        _repository_id: RepositoryId,
        _resource_id: EntityId,
    ) -> Result<Vec<TopContainer>, ClientError> {
        Ok((1..=3)
            .map(|n| TopContainer {
                uri: tc_uri(n),
                barcode: Some(format!("B{n}")),
                indicator: n.to_string(),
            })
            .collect())
    }
}
