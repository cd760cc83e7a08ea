//! Reconciliation and upload driver.
//!
//! Orchestrates one run against a repository's downloads section: build the
//! index of existing entries once (only when overwriting), then per local
//! file compute the target name, delete any colliding entry and upload the
//! file, strictly in input order.
//!
//! - The index is consumed with `remove`, so a name is never deleted twice
//!   even when two files map to the same target name.
//! - Dry-run still lists and logs everything but suppresses the mutating
//!   delete/create calls.
//! - Failures abort the remainder of the run; files already processed are
//!   not rolled back (at-least-once, not atomic, across the batch).

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::contract::{DownloadsClient, NewDownload};
use crate::error::Error;
use crate::repository::RepositoryId;

/// Per-run upload behaviour.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Delete existing downloads whose name collides with an uploaded one.
    pub overwrite: bool,
    /// List and log only; no downloads are deleted or uploaded.
    pub dry_run: bool,
    /// Inserted before the final extension separator of every uploaded name.
    pub suffix: Option<String>,
    /// Description attached to every created download.
    pub description: Option<String>,
}

/// What one run deleted and uploaded, in input order.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub uploaded: Vec<String>,
    pub deleted: Vec<(String, i64)>,
}

/// Fetch the current downloads of `repo` as a name -> id index.
/// Entries the service reports without a name are dropped.
pub async fn existing_downloads<C>(
    client: &C,
    repo: &RepositoryId,
) -> Result<HashMap<String, i64>, Error>
where
    C: DownloadsClient + ?Sized,
{
    let downloads = client
        .list_downloads(repo)
        .await
        .map_err(|e| Error::Listing {
            repo: repo.to_string(),
            source: e,
        })?;

    let mut existing = HashMap::new();
    for download in downloads {
        if !download.name.is_empty() {
            existing.insert(download.name, download.id);
        }
    }

    let count = existing.len();
    if count == 1 {
        debug!("Listed 1 existing download");
    } else {
        debug!("Listed {count} existing downloads");
    }
    Ok(existing)
}

/// Compute the name a file will carry remotely: a non-empty suffix goes
/// before the last `.` of the base name, or at the end when there is none.
pub fn target_name(file_name: &str, suffix: Option<&str>) -> String {
    match suffix.filter(|s| !s.is_empty()) {
        Some(suffix) => match file_name.rfind('.') {
            Some(last_dot) => format!(
                "{}{}{}",
                &file_name[..last_dot],
                suffix,
                &file_name[last_dot..]
            ),
            None => format!("{file_name}{suffix}"),
        },
        None => file_name.to_string(),
    }
}

fn size_label(size: i64) -> String {
    if size == 1 {
        "1 byte".to_string()
    } else {
        format!("{size} bytes")
    }
}

/// Upload `files` to the repository's downloads section, deleting colliding
/// existing entries first when `overwrite` is set.
pub async fn upload_files<C>(
    client: &C,
    repo: &RepositoryId,
    files: &[PathBuf],
    options: &UploadOptions,
) -> Result<UploadReport, Error>
where
    C: DownloadsClient + ?Sized,
{
    // Overwrite disabled means the index stays empty and the listing call
    // is skipped entirely.
    let mut existing = if options.overwrite {
        let existing = existing_downloads(client, repo).await?;
        info!("Got existing downloads: {existing:?}");
        existing
    } else {
        HashMap::new()
    };

    if options.dry_run {
        info!("Dry run mode, downloads will not be deleted or uploaded");
    }

    let file_count = files.len();
    if file_count == 1 {
        info!("Adding 1 download to repository {repo}");
    } else {
        info!("Adding {file_count} downloads to repository {repo}");
    }

    let mut report = UploadReport::default();
    for file in files {
        let base_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = target_name(&base_name, options.suffix.as_deref());

        if let Some(id) = existing.remove(&name) {
            info!("Deleting existing download: {name} (id={id})");
            if !options.dry_run {
                client
                    .delete_download(repo, id)
                    .await
                    .map_err(|e| Error::Delete {
                        name: name.clone(),
                        source: e,
                    })?;
            }
            report.deleted.push((name.clone(), id));
        }

        // A missing file shows up as 0 bytes here; the content read below
        // reports it when an actual upload is attempted.
        let size = fs::metadata(file).map(|m| m.len() as i64).unwrap_or(0);
        info!("Adding download: {} ({})", name, size_label(size));

        if !options.dry_run {
            let content = fs::read(file).map_err(|e| Error::Upload {
                name: name.clone(),
                source: e.into(),
            })?;
            let new = NewDownload {
                name: &name,
                size,
                description: options.description.as_deref(),
            };
            client
                .create_download(repo, new, content)
                .await
                .map_err(|e| Error::Upload {
                    name: name.clone(),
                    source: e,
                })?;
        }
        report.uploaded.push(name);
    }

    Ok(report)
}
