//! ArchivesSpace JSON models, restricted to the fields the updater reads or
//! rewrites.
//!
//! Every struct that is sent back to the backend keeps all unknown fields in
//! `extra`, so a fetch → mutate → update cycle never drops data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A `{"ref": "/repositories/…"}` link.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ref {
    #[serde(rename = "ref")]
    pub uri: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Ref {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            extra: Map::new(),
        }
    }
}

/// The `sub_container` of an instance: which top container, and the child
/// indicators inside it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubContainer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_container: Option<Ref>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator_2: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubContainer {
    /// URI of the linked top container, if any.
    pub fn top_container_uri(&self) -> Option<&str> {
        self.top_container.as_ref().map(|r| r.uri.as_str())
    }

    /// `indicator_2`, with a missing value read as empty.
    pub fn indicator_2(&self) -> &str {
        self.indicator_2.as_deref().unwrap_or("")
    }
}

/// A join record between an archival object and a container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Instance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_container: Option<SubContainer>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An archival object as returned by
/// `GET /repositories/:repo/archival_objects/:id`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArchivalObject {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Ref>,
    #[serde(default)]
    pub instances: Vec<Instance>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArchivalObject {
    pub fn resource_uri(&self) -> Option<&str> {
        self.resource.as_ref().map(|r| r.uri.as_str())
    }
}

/// A top container. Only read, never written back.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TopContainer {
    pub uri: String,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub indicator: String,
}

impl TopContainer {
    /// Barcode, with a missing value read as empty.
    pub fn barcode(&self) -> &str {
        self.barcode.as_deref().unwrap_or("")
    }
}

/// Response body of `POST /users/:username/login`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginResponse {
    pub session: String,
}
