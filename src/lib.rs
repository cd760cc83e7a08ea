#![doc = "ghd-uploader: CLI and HTTP client for publishing repository downloads."]

//! Business logic (reconciliation, credential resolution, the publish step)
//! lives in the [`ghd_uploader_core`] crate; this crate adds the clap CLI,
//! the concrete reqwest-backed client and config loading.

pub mod cli;
pub mod github;
pub mod load_config;
pub mod store;
