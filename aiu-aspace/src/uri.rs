//! Splitting ArchivesSpace record URIs into numeric ids.

use crate::error::ClientError;

/// Repository id of a record URI.
pub type RepositoryId = u32;
/// Record id within a repository.
pub type EntityId = u32;

/// Split `/repositories/<repo>/<kind>/<id>` into `(repo, id)`.
///
/// Surrounding whitespace is ignored; anything else malformed is an
/// [`ClientError::InvalidUri`].
pub fn split_uri(uri: &str) -> Result<(RepositoryId, EntityId), ClientError> {
    let invalid = || ClientError::InvalidUri {
        uri: uri.to_owned(),
    };
    let parts: Vec<&str> = uri.trim().split('/').collect();
    match parts.as_slice() {
        ["", "repositories", repo, kind, id] if !kind.is_empty() => {
            let repo = repo.parse().map_err(|_| invalid())?;
            let id = id.parse().map_err(|_| invalid())?;
            Ok((repo, id))
        }
        _ => Err(invalid()),
    }
}
