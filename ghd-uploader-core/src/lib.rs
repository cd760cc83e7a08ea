#![doc = "ghd-uploader-core: core logic library for ghd-uploader."]

//! This crate contains the client contract, credential and repository
//! resolution, and the reconciliation/upload orchestration for publishing
//! build artifacts to a GitHub repository's downloads section.
//! Transport (the concrete HTTP client) lives in the binary crate.

pub mod contract;
pub mod credentials;
pub mod error;
pub mod publisher;
pub mod reconcile;
pub mod repository;
