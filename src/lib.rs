//! Flagdeck - session-scoped feature flag overrides for development builds.
//!
//! This library provides the flag resolution and override engine used by the
//! `flagdeck` CLI, including the flag catalog, session storage, and the
//! transports used to carry overrides between page loads or processes.

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod commands;
pub mod config;
pub mod flags;
pub mod models;
pub mod persist;
#[cfg(not(target_arch = "wasm32"))]
pub mod storage;
#[cfg(feature = "wasm")]
pub mod wasm;


/// Library-level error type for Flagdeck operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("KDL error: {0}")]
    Kdl(#[from] kdl::KdlError),

    #[error("Invalid flag ID: {0:?}")]
    InvalidFlagId(String),

    #[error("Flag defined more than once: {0}")]
    DuplicateFlag(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Flagdeck operations.
pub type Result<T> = std::result::Result<T, Error>;
