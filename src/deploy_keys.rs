//! Repository deploy keys
//!
//! See the [Github documentation](https://developer.github.com/v3/repos/keys/).

use client::{self, PagedRequest, Request, RestClient};
use error::*;
use types::{DeployKey, KeyId, RepositoryIdProvider};

const SEGMENT_REPOS: &str = "/repos";
const SEGMENT_KEYS: &str = "/keys";

/// Access to the deploy keys of repositories.
///
/// Holds nothing but the client; every call is a fresh request.
#[derive(Debug)]
pub struct DeployKeyService<'a, C>
    where C: 'a + RestClient + ?Sized,
{
    client: &'a C,
}

impl<'a, C> DeployKeyService<'a, C>
    where C: 'a + RestClient + ?Sized,
{
    /// Create a service which talks through `client`.
    pub fn new(client: &'a C) -> Self {
        DeployKeyService {
            client: client,
        }
    }

    /// The paged request listing the deploy keys of a repository.
    ///
    /// Use `pages` on the result to walk the keys lazily.
    pub fn keys_request<R>(&self, repository: &R) -> Result<PagedRequest<DeployKey>>
        where R: RepositoryIdProvider + ?Sized,
    {
        let uri = keys_uri(repository)?;
        debug!(target: "github", "uri is {}", uri);
        Ok(PagedRequest::new(uri))
    }

    /// Get all deploy keys of a repository.
    pub fn list_keys<R>(&self, repository: &R) -> Result<Vec<DeployKey>>
        where R: RepositoryIdProvider + ?Sized,
    {
        let request = self.keys_request(repository)?;
        client::get_all(self.client, &request)
    }

    /// Get a deploy key of a repository.
    pub fn get_key<R>(&self, repository: &R, id: KeyId) -> Result<DeployKey>
        where R: RepositoryIdProvider + ?Sized,
    {
        let uri = key_uri(repository, id)?;
        debug!(target: "github", "uri is {}", uri);
        self.client
            .get(&Request::new(uri))?
            .decode()
    }

    /// Add a deploy key to a repository.
    ///
    /// Any `id` set on `key` is sent as-is; Github assigns the new key's id.
    pub fn create_key<R>(&self, repository: &R, key: &DeployKey) -> Result<DeployKey>
        where R: RepositoryIdProvider + ?Sized,
    {
        let uri = keys_uri(repository)?;
        debug!(target: "github", "uri is {}", uri);
        self.post(&uri, key)
    }

    /// Update a deploy key of a repository.
    ///
    /// The key is addressed by its `id`, which must be set.
    pub fn edit_key<R>(&self, repository: &R, key: &DeployKey) -> Result<DeployKey>
        where R: RepositoryIdProvider + ?Sized,
    {
        let id = key.id
            .ok_or_else(|| ErrorKind::InvalidArgument("key id cannot be empty".to_string()))?;
        let uri = key_uri(repository, id)?;
        debug!(target: "github", "uri is {}", uri);
        self.post(&uri, key)
    }

    /// Remove a deploy key from a repository.
    pub fn delete_key<R>(&self, repository: &R, id: KeyId) -> Result<()>
        where R: RepositoryIdProvider + ?Sized,
    {
        let uri = key_uri(repository, id)?;
        debug!(target: "github", "uri is {}", uri);
        self.client.delete(&uri)
    }

    fn post(&self, uri: &str, key: &DeployKey) -> Result<DeployKey> {
        let body = client::encode(key)?;
        client::decode(self.client.post(uri, body)?)
    }
}

fn repository_id<R>(repository: &R) -> Result<String>
    where R: RepositoryIdProvider + ?Sized,
{
    let id = repository.repository_id();
    if id.is_empty() {
        bail!(ErrorKind::InvalidArgument("repository id cannot be empty".to_string()));
    }
    Ok(id)
}

fn keys_uri<R>(repository: &R) -> Result<String>
    where R: RepositoryIdProvider + ?Sized,
{
    let mut uri = SEGMENT_REPOS.to_string();
    uri.push('/');
    uri.push_str(&repository_id(repository)?);
    uri.push_str(SEGMENT_KEYS);
    Ok(uri)
}

fn key_uri<R>(repository: &R, id: KeyId) -> Result<String>
    where R: RepositoryIdProvider + ?Sized,
{
    keys_uri(repository).map(|uri| format!("{}/{}", uri, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::RepositoryId;

    #[test]
    fn test_keys_uri() {
        assert_eq!(keys_uri("octocat/Hello-World").unwrap(), "/repos/octocat/Hello-World/keys");
    }

    #[test]
    fn test_key_uri() {
        let repo = RepositoryId::new("octocat", "Hello-World");

        assert_eq!(key_uri(&repo, KeyId::new(7)).unwrap(), "/repos/octocat/Hello-World/keys/7");
    }

    #[test]
    fn test_empty_repository_id() {
        let err = keys_uri("").unwrap_err();

        match *err.kind() {
            ErrorKind::InvalidArgument(ref msg) => assert_eq!(msg, "repository id cannot be empty"),
            ref kind => panic!("unexpected error kind: {:?}", kind),
        }
    }
}
