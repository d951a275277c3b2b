//! Blocking HTTP client for the ArchivesSpace backend API.
//!
//! One `ureq::Agent` per run; the session token from login is sent as
//! `X-ArchivesSpace-Session` on every request. No retries: a failed call is
//! reported to the caller as-is.

use std::time::Duration;

use serde::de::DeserializeOwned;

use aiu_core::Environment;

use crate::api::AspaceApi;
use crate::error::ClientError;
use crate::model::{ArchivalObject, LoginResponse, Ref, TopContainer};
use crate::uri::{EntityId, RepositoryId};

/// Header carrying the session token.
pub const SESSION_HEADER: &str = "X-ArchivesSpace-Session";

/// An authenticated ArchivesSpace session.
pub struct AspaceClient {
    agent: ureq::Agent,
    base_url: String,
    session: String,
}

impl std::fmt::Debug for AspaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AspaceClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AspaceClient {
    /// Log in to the environment and return a ready client.
    pub fn connect(env: &Environment) -> Result<Self, ClientError> {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(env.timeout_secs))
            .build();
        let base_url = normalize_base_url(&env.url);
        let session = login(&agent, &base_url, &env.username, &env.password)?;
        tracing::info!("logged in to {base_url} as {}", env.username);
        Ok(Self {
            agent,
            base_url,
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        tracing::debug!("GET {url}");
        let response = self
            .agent
            .get(&url)
            .set(SESSION_HEADER, &self.session)
            .call()
            .map_err(|e| map_ureq_error(e, &url))?;
        response
            .into_json::<T>()
            .map_err(|source| ClientError::Decode { url, source })
    }
}

impl AspaceApi for AspaceClient {
    fn get_archival_object(
        &self,
        repository_id: RepositoryId,
        object_id: EntityId,
    ) -> Result<ArchivalObject, ClientError> {
        self.get_json(&archival_object_path(repository_id, object_id))
    }

    fn update_archival_object(
        &self,
        repository_id: RepositoryId,
        object_id: EntityId,
        object: &ArchivalObject,
    ) -> Result<String, ClientError> {
        let url = self.url(&archival_object_path(repository_id, object_id));
        tracing::debug!("POST {url}");
        let response = self
            .agent
            .post(&url)
            .set(SESSION_HEADER, &self.session)
            .send_json(object)
            .map_err(|e| map_ureq_error(e, &url))?;
        let body = response
            .into_string()
            .map_err(|source| ClientError::Decode { url, source })?;
        Ok(strip_newlines(&body))
    }

    fn get_top_containers_for_resource(
        &self,
        repository_id: RepositoryId,
        resource_id: EntityId,
    ) -> Result<Vec<TopContainer>, ClientError> {
        let refs: Vec<Ref> = self.get_json(&format!(
            "/repositories/{repository_id}/resources/{resource_id}/top_containers"
        ))?;
        tracing::debug!(
            "resource {resource_id} links {} top containers",
            refs.len()
        );
        refs.iter().map(|r| self.get_json(&r.uri)).collect()
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn login(
    agent: &ureq::Agent,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<String, ClientError> {
    let url = format!("{base_url}/users/{username}/login");
    let response = agent
        .post(&url)
        .query("password", password)
        .call()
        .map_err(|e| match map_ureq_error(e, &url) {
            ClientError::Status { status, body, .. } => ClientError::Login {
                username: username.to_owned(),
                reason: format!("{status}: {body}"),
            },
            other => other,
        })?;
    let login: LoginResponse = response
        .into_json()
        .map_err(|source| ClientError::Decode { url, source })?;
    if login.session.is_empty() {
        return Err(ClientError::Login {
            username: username.to_owned(),
            reason: "empty session token".to_owned(),
        });
    }
    Ok(login.session)
}

fn archival_object_path(repository_id: RepositoryId, object_id: EntityId) -> String {
    format!("/repositories/{repository_id}/archival_objects/{object_id}")
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

/// Backend messages are logged on one line.
pub(crate) fn strip_newlines(s: &str) -> String {
    s.replace(['\r', '\n'], "")
}

fn map_ureq_error(err: ureq::Error, url: &str) -> ClientError {
    match err {
        ureq::Error::Status(404, _) => ClientError::NotFound {
            url: url.to_owned(),
        },
        ureq::Error::Status(status, response) => ClientError::Status {
            status,
            url: url.to_owned(),
            body: strip_newlines(&response.into_string().unwrap_or_default()),
        },
        ureq::Error::Transport(t) => ClientError::Transport(t.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slashes() {
        assert_eq!(
            normalize_base_url(" https://aspace.example.edu/api// "),
            "https://aspace.example.edu/api"
        );
    }

    #[test]
    fn archival_object_path_format() {
        assert_eq!(
            archival_object_path(2, 1234),
            "/repositories/2/archival_objects/1234"
        );
    }

    #[test]
    fn newlines_are_stripped_from_messages() {
        assert_eq!(
            strip_newlines("{\"status\":\"Updated\",\r\n\"id\":5}\n"),
            "{\"status\":\"Updated\",\"id\":5}"
        );
    }
}
