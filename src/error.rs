// src/error.rs

//! Error types for platform resolution and installation

use thiserror::Error;

/// Errors produced while resolving or applying a Docker installation
#[derive(Debug, Error)]
pub enum Error {
    /// A Debian-family rule needed a codename the platform table does not know
    #[error("No release codename known for {distro} {version}")]
    UnresolvedCodename { distro: String, version: String },

    #[error("Inconsistent platform facts: {0}")]
    InconsistentPlatform(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Invalid repository channel: {0}")]
    InvalidChannel(String),

    /// Returned by `RepositoryRegistrar` implementations
    #[error("Repository registration failed: {0}")]
    RegistrarError(String),

    /// Returned by `PackageManager` implementations
    #[error("Package manager error: {0}")]
    PackageManagerError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
