//! Loads the YAML config for the `publish` subcommand and injects secret
//! fields from the environment.
//!
//! This is the only place where untrusted YAML is parsed; everything past
//! this boundary works with typed structs. The password may be left out of
//! the file and supplied as `GHD_PASSWORD` instead (`GHD_USERNAME` likewise
//! overrides an absent username).

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use tracing::{error, info};

use ghd_uploader_core::publisher::UploadEntry;

/// One publish run: shared credentials plus the entries to upload.
#[derive(Debug, Deserialize)]
pub struct PublishConfig {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub entries: Vec<UploadEntry>,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PublishConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let mut config: PublishConfig = match serde_yaml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if config.username.is_none() {
        config.username = std::env::var("GHD_USERNAME").ok();
    }
    if config.password.is_none() {
        config.password = std::env::var("GHD_PASSWORD").ok();
    }

    info!(entries = config.entries.len(), "Parsed publish configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    #[serial]
    fn parses_entries_and_credentials() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"username: user
password: secret
entries:
  - owner: owner
    repository: repo
    description: nightly
    source_file: dist/*.zip
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.username.as_deref(), Some("user"));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.entries.len(), 1);
        assert_eq!(config.entries[0].source_file, "dist/*.zip");
        assert_eq!(config.entries[0].description.as_deref(), Some("nightly"));
    }

    #[test]
    #[serial]
    fn missing_password_comes_from_the_environment() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"username: user
entries:
  - owner: owner
    repository: repo
    source_file: app.zip
"#
        )
        .unwrap();

        std::env::set_var("GHD_PASSWORD", "from-env");
        let config = load_config(file.path()).unwrap();
        std::env::remove_var("GHD_PASSWORD");

        assert_eq!(config.password.as_deref(), Some("from-env"));
    }

    #[test]
    fn unreadable_files_are_an_error() {
        assert!(load_config("/definitely/not/here.yml").is_err());
    }
}
