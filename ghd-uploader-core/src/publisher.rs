//! CI publish step: uploads workspace files to the downloads section of one
//! or more repositories after a build.
//!
//! Each entry carries a source-file pattern that may contain `${VAR}` macros
//! (expanded against the build's environment) and glob wildcards (resolved
//! against the build workspace). Failures here are soft: they mark the step
//! as failed via [`BuildStatus`] instead of raising an error, so the host
//! build keeps control.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use regex::Regex;
use serde::Deserialize;
use tracing::{error, info};

use crate::contract::DownloadsClient;
use crate::reconcile::{upload_files, UploadOptions};
use crate::repository::RepositoryId;

/// Instruction of how to upload one file pattern.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadEntry {
    /// Destination owner.
    pub owner: String,
    /// Destination repository.
    pub repository: String,
    /// Download description.
    #[serde(default)]
    pub description: Option<String>,
    /// File pattern relative to the workspace root; may contain `${VAR}`
    /// macros and glob wildcards.
    pub source_file: String,
}

/// Outcome of the publish step; the host marks the build accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    Success,
    Failure,
}

/// The publish step itself: a list of entries, uploaded with overwrite on
/// and dry-run off, the way a post-build publisher behaves.
#[derive(Debug, Clone)]
pub struct Publisher {
    pub entries: Vec<UploadEntry>,
}

impl Publisher {
    pub fn new(entries: Vec<UploadEntry>) -> Self {
        Self { entries }
    }

    /// Run every entry against the workspace. `build_failed` skips the step
    /// altogether: nothing is posted for a failed build.
    pub async fn perform<C>(
        &self,
        client: &C,
        workspace: &Path,
        env: &HashMap<String, String>,
        build_failed: bool,
    ) -> BuildStatus
    where
        C: DownloadsClient + ?Sized,
    {
        if build_failed {
            return BuildStatus::Success;
        }

        for entry in &self.entries {
            if entry.source_file.trim().is_empty() {
                error!("Configuration error: no file is specified for upload");
                return BuildStatus::Failure;
            }

            info!(
                "Uploading {} to https://github.com/{}/{}/downloads",
                entry.source_file, entry.owner, entry.repository
            );

            let expanded = expand_macros(&entry.source_file, env);
            let files = match matching_files(workspace, &expanded) {
                Ok(files) => files,
                Err(e) => {
                    error!(error = %e, "Failed to upload files");
                    return BuildStatus::Failure;
                }
            };
            if files.is_empty() {
                error!("No such file exists: {expanded}");
                return BuildStatus::Failure;
            }

            let repo = match RepositoryId::new(&entry.owner, &entry.repository) {
                Ok(repo) => repo,
                Err(e) => {
                    error!(error = %e, "Failed to upload files");
                    return BuildStatus::Failure;
                }
            };
            let options = UploadOptions {
                overwrite: true,
                dry_run: false,
                suffix: None,
                description: entry.description.clone(),
            };
            if let Err(e) = upload_files(client, &repo, &files, &options).await {
                error!(error = %e, "Failed to upload files");
                return BuildStatus::Failure;
            }
        }

        BuildStatus::Success
    }
}

/// Expand `${VAR}` macros against the given environment. Unknown variables
/// expand to the empty string, matching the host's macro behaviour.
pub fn expand_macros(pattern: &str, env: &HashMap<String, String>) -> String {
    let macros = Regex::new(r"\$\{([A-Za-z0-9_]+)\}").expect("macro pattern is valid");
    macros
        .replace_all(pattern, |captures: &regex::Captures<'_>| {
            env.get(&captures[1]).map(String::as_str).unwrap_or("")
        })
        .into_owned()
}

/// Resolve a glob pattern against the workspace, returning the matching
/// files in sorted order. Matching is done on workspace-relative paths.
pub fn matching_files(workspace: &Path, pattern: &str) -> io::Result<Vec<PathBuf>> {
    let matcher = Glob::new(pattern)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
        .compile_matcher();

    let mut matches = Vec::new();
    collect_files(workspace, workspace, &matcher, &mut matches)?;
    matches.sort();
    Ok(matches)
}

fn collect_files(
    root: &Path,
    dir: &Path,
    matcher: &GlobMatcher,
    matches: &mut Vec<PathBuf>,
) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(root, &path, matcher, matches)?;
        } else if let Ok(relative) = path.strip_prefix(root) {
            if matcher.is_match(relative) {
                matches.push(path);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_macros_and_blanks_unknown_ones() {
        let mut env = HashMap::new();
        env.insert("VERSION".to_string(), "1.2.3".to_string());
        assert_eq!(
            expand_macros("dist/app-${VERSION}.zip", &env),
            "dist/app-1.2.3.zip"
        );
        assert_eq!(expand_macros("dist/app-${MISSING}.zip", &env), "dist/app-.zip");
        assert_eq!(expand_macros("dist/app.zip", &env), "dist/app.zip");
    }

    #[test]
    fn matches_files_relative_to_the_workspace() {
        let workspace = tempfile::tempdir().unwrap();
        let dist = workspace.path().join("dist");
        fs::create_dir(&dist).unwrap();
        fs::write(dist.join("app.zip"), b"zip").unwrap();
        fs::write(dist.join("app.txt"), b"txt").unwrap();
        fs::write(workspace.path().join("top.zip"), b"zip").unwrap();

        let matches = matching_files(workspace.path(), "dist/*.zip").unwrap();
        assert_eq!(matches, vec![dist.join("app.zip")]);

        let all_zips = matching_files(workspace.path(), "**/*.zip").unwrap();
        assert_eq!(all_zips.len(), 2);
    }
}
