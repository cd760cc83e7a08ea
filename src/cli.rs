//! CLI glue: argument parsing and wiring of resolver -> client -> driver.
//! All non-trivial logic lives in `ghd-uploader-core`.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use ghd_uploader_core::credentials::AuthConfig;
use ghd_uploader_core::publisher::{matching_files, BuildStatus, Publisher};
use ghd_uploader_core::reconcile::{upload_files, UploadOptions};
use ghd_uploader_core::repository::{self, RepositoryId};

use crate::github::{GitHubDownloads, DEFAULT_HOST};
use crate::load_config::load_config;
use crate::store::EnvCredentialStore;

/// CLI for ghd-uploader: publish build artifacts as repository downloads.
#[derive(Parser)]
#[clap(
    name = "ghd-uploader",
    version,
    about = "Upload build artifacts to a GitHub repository's downloads section"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload files as downloads, optionally replacing existing entries
    Upload {
        /// Owner of the repository to upload to
        #[clap(long)]
        owner: Option<String>,
        /// Name of the repository to upload to
        #[clap(long)]
        repository: Option<String>,
        /// User name for authentication
        #[clap(long)]
        username: Option<String>,
        /// Password for authentication
        #[clap(long)]
        password: Option<String>,
        /// OAuth2 access token, used when no username/password is given
        #[clap(long)]
        token: Option<String>,
        /// Description attached to every uploaded download
        #[clap(long)]
        description: Option<String>,
        /// Delete existing downloads whose name collides with an upload
        #[clap(long)]
        overwrite: bool,
        /// Show what would be deleted and uploaded without altering the
        /// repository's downloads
        #[clap(long)]
        dry_run: bool,
        /// Host for API calls
        #[clap(long, default_value = DEFAULT_HOST)]
        host: String,
        /// Suffix inserted before the file extension of every uploaded name
        #[clap(long)]
        suffix: Option<String>,
        /// Id of a named credential entry resolved from the environment
        #[clap(long)]
        server: Option<String>,
        /// Source-control URL to derive owner/repository from when the
        /// explicit flags are absent
        #[clap(long)]
        scm_url: Option<String>,
        /// Glob pattern(s) selecting files relative to the current
        /// directory; takes precedence over explicit FILES
        #[clap(long = "fileset")]
        filesets: Vec<String>,
        /// Files to upload
        files: Vec<PathBuf>,
    },
    /// Run the post-build publish step from a YAML config of upload entries
    Publish {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Upload {
            owner,
            repository,
            username,
            password,
            token,
            description,
            overwrite,
            dry_run,
            host,
            suffix,
            server,
            scm_url,
            filesets,
            files,
        } => {
            let repo = resolve_repository(
                owner.as_deref(),
                repository.as_deref(),
                scm_url.as_deref(),
            )?;

            let auth = AuthConfig {
                username,
                password,
                oauth2_token: token,
                server,
            };
            let credentials = auth.resolve(&EnvCredentialStore)?;
            let client = GitHubDownloads::new(&host, credentials);

            let files = select_files(&filesets, files)?;
            let options = UploadOptions {
                overwrite,
                dry_run,
                suffix,
                description,
            };
            let report = upload_files(&client, &repo, &files, &options).await?;
            tracing::info!(
                uploaded = report.uploaded.len(),
                deleted = report.deleted.len(),
                "Upload run complete"
            );
            Ok(())
        }
        Commands::Publish { config } => {
            let config = load_config(config)?;
            let auth = AuthConfig {
                username: config.username,
                password: config.password,
                ..AuthConfig::default()
            };
            let credentials = auth.resolve(&EnvCredentialStore)?;
            let client = GitHubDownloads::new(DEFAULT_HOST, credentials);

            let workspace = std::env::current_dir().context("No usable working directory")?;
            let env: HashMap<String, String> = std::env::vars().collect();

            let publisher = Publisher::new(config.entries);
            match publisher.perform(&client, &workspace, &env, false).await {
                BuildStatus::Success => {
                    tracing::info!("Publish step complete");
                    Ok(())
                }
                BuildStatus::Failure => bail!("Publish step failed"),
            }
        }
    }
}

/// Owner/name flags win; an SCM URL is the advisory fallback.
fn resolve_repository(
    owner: Option<&str>,
    repository: Option<&str>,
    scm_url: Option<&str>,
) -> Result<RepositoryId> {
    match RepositoryId::new(owner.unwrap_or(""), repository.unwrap_or("")) {
        Ok(repo) => Ok(repo),
        Err(e) => {
            if let Some(url) = scm_url {
                if let Some(repo) = repository::extract_from_scm_url(url) {
                    return Ok(repo);
                }
            }
            Err(e.into())
        }
    }
}

/// Mirror the build-task selection rules: filesets when any are given,
/// explicit files otherwise.
fn select_files(filesets: &[String], files: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    if filesets.is_empty() {
        return Ok(files);
    }
    let cwd = std::env::current_dir().context("No usable working directory")?;
    let mut selected = Vec::new();
    for pattern in filesets {
        let mut matches = matching_files(&cwd, pattern)
            .with_context(|| format!("Resolving fileset {pattern} failed"))?;
        selected.append(&mut matches);
    }
    Ok(selected)
}
