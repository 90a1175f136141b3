//! API entities
//!
//! These types represent the repository addressing and deploy key objects
//! exchanged with Github.

use chrono::{DateTime, Utc};
use reqwest::Url;

use error::*;

use std::fmt::{self, Display};
use std::str::FromStr;

/// Type-safe deploy key ID.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyId(u64);

impl KeyId {
    /// Create a deploy key ID.
    pub fn new(id: u64) -> Self {
        KeyId(id)
    }

    /// The value of the id.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for KeyId {
    fn from(id: u64) -> Self {
        KeyId(id)
    }
}

/// An SSH key with access to a single repository.
///
/// Fields other than `title`, `key` and `read_only` are assigned by Github and
/// are not sent when absent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "strict", serde(deny_unknown_fields))]
pub struct DeployKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// The ID of the key.
    pub id: Option<KeyId>,
    /// The title of the key.
    pub title: String,
    /// The public key in OpenSSH format.
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// The API URL of the key.
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Whether Github has verified the key.
    pub verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Whether the key is limited to read access.
    pub read_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// When the key was created.
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// The login of the user who added the key.
    pub added_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// When the key was last used.
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Whether the key is enabled.
    pub enabled: Option<bool>,
}

impl DeployKey {
    /// A new key to be created on a repository.
    pub fn new<T, K>(title: T, key: K) -> Self
        where T: ToString,
              K: ToString,
    {
        DeployKey {
            id: None,
            title: title.to_string(),
            key: key.to_string(),
            url: None,
            verified: None,
            read_only: None,
            created_at: None,
            added_by: None,
            last_used: None,
            enabled: None,
        }
    }

    /// Restrict (or grant) write access for the key.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }
}

/// Something which can name a repository on Github.
pub trait RepositoryIdProvider {
    /// The `owner/name` identifier of the repository.
    fn repository_id(&self) -> String;
}

impl RepositoryIdProvider for str {
    fn repository_id(&self) -> String {
        self.to_string()
    }
}

impl RepositoryIdProvider for String {
    fn repository_id(&self) -> String {
        self.clone()
    }
}

impl<'a, T> RepositoryIdProvider for &'a T
    where T: RepositoryIdProvider + ?Sized,
{
    fn repository_id(&self) -> String {
        (**self).repository_id()
    }
}

/// The owner and name of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryId {
    /// The user or organization owning the repository.
    pub owner: String,
    /// The name of the repository.
    pub name: String,
}

impl RepositoryId {
    /// Create a repository id from its parts.
    pub fn new<O, N>(owner: O, name: N) -> Self
        where O: ToString,
              N: ToString,
    {
        RepositoryId {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    /// Extract the repository from a clone or web URL.
    ///
    /// Accepts `https://github.com/owner/name`, with or without a trailing
    /// `.git`, as well as the `git@github.com:owner/name.git` form.
    pub fn from_url(url: &str) -> Result<Self> {
        let path = if url.contains("://") {
            let url = Url::parse(url)
                .chain_err(|| ErrorKind::InvalidArgument(format!("invalid repository url: {}", url)))?;
            url.path().to_string()
        } else if let Some(idx) = url.find(':') {
            url[idx + 1..].to_string()
        } else {
            bail!(ErrorKind::InvalidArgument(format!("invalid repository url: {}", url)));
        };

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        match (segments.next(), segments.next()) {
            (Some(owner), Some(name)) => {
                let name = name.trim_end_matches(".git");
                Self::from_parts(owner, name)
                    .ok_or_else(|| ErrorKind::InvalidArgument(format!("invalid repository url: {}", url)).into())
            },
            _ => Err(ErrorKind::InvalidArgument(format!("invalid repository url: {}", url)).into()),
        }
    }

    fn from_parts(owner: &str, name: &str) -> Option<Self> {
        if owner.is_empty() || name.is_empty() {
            None
        } else {
            Some(Self::new(owner, name))
        }
    }
}

impl FromStr for RepositoryId {
    type Err = Error;

    fn from_str(id: &str) -> Result<Self> {
        let mut parts = id.split('/');
        let parsed = match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) => Self::from_parts(owner, name),
            _ => None,
        };

        parsed.ok_or_else(|| {
            ErrorKind::InvalidArgument(format!("repository id must be `owner/name`: {}", id)).into()
        })
    }
}

impl Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl RepositoryIdProvider for RepositoryId {
    fn repository_id(&self) -> String {
        self.to_string()
    }
}
