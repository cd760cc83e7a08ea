use std::fmt;

use tracing::debug;

use crate::error::Error;

const HOST_DEFAULT: &str = "github.com";
const SUFFIX_GIT: &str = ".git";

/// Canonical owner/name pair identifying one GitHub repository.
/// Immutable once built; lives for the duration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryId {
    owner: String,
    name: String,
}

impl RepositoryId {
    /// Resolve an explicit owner/name pair. Both parts must be non-empty.
    pub fn new(owner: &str, name: &str) -> Result<Self, Error> {
        if owner.is_empty() || name.is_empty() {
            return Err(Error::Configuration(
                "No GitHub repository (owner and name) configured".to_string(),
            ));
        }
        let repo = RepositoryId {
            owner: owner.to_string(),
            name: name.to_string(),
        };
        debug!(repository = %repo, "Using GitHub repository");
        Ok(repo)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Best-effort extraction of an owner/name pair from a source-control URL.
///
/// Recognises URLs containing the `github.com` host and ending in `.git`;
/// the text between the host (plus one separator character) and the suffix
/// is parsed as `owner/name`. Anything else yields `None`, never an error.
pub fn extract_from_scm_url(url: &str) -> Option<RepositoryId> {
    if url.is_empty() {
        return None;
    }
    let host_index = url.find(HOST_DEFAULT)?;
    let rest = url[host_index + HOST_DEFAULT.len()..].strip_suffix(SUFFIX_GIT)?;

    // Skip the single separator after the host (':' for scp-style URLs,
    // '/' for https ones).
    let mut chars = rest.chars();
    chars.next()?;
    let id = chars.as_str();

    let (owner, name) = id.split_once('/')?;
    RepositoryId::new(owner, name).ok()
}
