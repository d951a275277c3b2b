//! # aiu-aspace
//!
//! ArchivesSpace access for the instance updater: JSON models, record URI
//! parsing, the [`AspaceApi`] capability trait and its blocking HTTP
//! implementation [`AspaceClient`].

pub mod api;
pub mod client;
pub mod error;
pub mod model;
pub mod uri;

pub use api::AspaceApi;
pub use client::AspaceClient;
pub use error::ClientError;
pub use model::{ArchivalObject, Instance, Ref, SubContainer, TopContainer};
pub use uri::{split_uri, EntityId, RepositoryId};
