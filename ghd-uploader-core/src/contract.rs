//! # DownloadsClient: interface to the remote downloads service
//!
//! This module defines the single trait (`DownloadsClient`) and the plain
//! data types the reconciliation driver needs from a remote client. The
//! real HTTP implementation lives in the binary crate; tests use the
//! generated mock.
//!
//! - All methods are async, returning results with boxed error types.
//! - Retries, timeouts and transport concerns belong to the implementor,
//!   never to callers of this trait.
//! - The trait is annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::repository::RepositoryId;

/// Error type surfaced by client implementations (boxed transport or
/// protocol error).
pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

/// One artifact currently published in a repository's downloads section.
#[derive(Debug, Clone)]
pub struct Download {
    pub name: String,
    pub id: i64,
}

/// Metadata for a download about to be created. Built per file immediately
/// before upload; never persisted.
#[derive(Debug, Clone)]
pub struct NewDownload<'a> {
    /// Name the artifact will carry remotely, after any suffix is applied.
    pub name: &'a str,
    /// Byte size of the local file at upload time.
    pub size: i64,
    /// Optional human-readable description shown by the service.
    pub description: Option<&'a str>,
}

/// Trait for listing, deleting and creating downloads in one repository.
/// Implemented by the real API client and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DownloadsClient: Send + Sync {
    /// List the downloads currently published for the repository.
    async fn list_downloads(&self, repo: &RepositoryId) -> Result<Vec<Download>, ClientError>;

    /// Delete one download by its service-assigned id.
    async fn delete_download(&self, repo: &RepositoryId, id: i64) -> Result<(), ClientError>;

    /// Create a new download from metadata and raw file contents.
    async fn create_download<'a>(
        &self,
        repo: &RepositoryId,
        new: NewDownload<'a>,
        content: Vec<u8>,
    ) -> Result<(), ClientError>;
}
