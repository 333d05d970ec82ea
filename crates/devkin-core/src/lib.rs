//! Core types, configuration, and error handling for devkin.
//!
//! This crate provides the shared foundation used by all other devkin crates:
//! - [`DevkinError`] — unified error type using `thiserror`
//! - [`DevkinConfig`] — configuration loaded from `.devkin.toml`
//! - Shared types: [`CommitRecord`], [`CommitWindow`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{AnalysisConfig, DevkinConfig, GithubConfig};
pub use error::DevkinError;
pub use types::{CommitRecord, CommitWindow, OutputFormat};

/// A convenience `Result` type for devkin operations.
pub type Result<T> = std::result::Result<T, DevkinError>;
