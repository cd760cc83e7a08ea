use thiserror::Error;

use crate::contract::ClientError;

/// Fatal failure kinds for one upload run. Each aborts the remainder of the
/// run; files already processed are not rolled back. Soft CI outcomes are
/// expressed as [`crate::publisher::BuildStatus`] values, not errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing owner/name or no usable credentials. Raised before any
    /// network call.
    #[error("{0}")]
    Configuration(String),

    /// The listing call failed; no file was processed.
    #[error("Listing downloads for {repo} failed: {source}")]
    Listing { repo: String, source: ClientError },

    /// Deleting a colliding existing download failed.
    #[error("Deleting existing download {name} failed: {source}")]
    Delete { name: String, source: ClientError },

    /// Reading or uploading one local file failed.
    #[error("Resource {name} upload failed: {source}")]
    Upload { name: String, source: ClientError },
}
