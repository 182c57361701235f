// src/lib.rs

//! Docker package installation planner
//!
//! Maps a requested upstream Docker release onto the exact repository and
//! package version a machine's package manager needs, across RPM-based
//! (RHEL, CentOS, Fedora) and Debian-based (Debian, Ubuntu) distributions.
//!
//! # Architecture
//!
//! - Platform: raw OS facts are validated once into an immutable profile
//! - Repository: yum/apt repository descriptors, or an explicit `Unsupported`
//! - Version: an ordered, first-match rule table for vendor version strings
//! - Install: a thin orchestrator over external registrar/package manager traits
//!
//! The resolvers are pure functions of their inputs and can be called
//! concurrently without synchronisation.

pub mod config;
mod error;
pub mod install;
pub mod platform;
pub mod repository;
pub mod version;

pub use config::{InstallConfig, load_config};
pub use error::{Error, Result};
pub use install::{
    Applied, DryRun, InstallReport, InstallRequest, InstallationOrchestrator, PackageManager,
    RepositoryRegistrar, RepositoryStep,
};
pub use platform::{Codename, OsFacts, PlatformFamily, PlatformProfile, map_architecture};
pub use repository::{
    Channel, RepositoryDescriptor, RepositoryKind, RepositoryPlan, resolve_repository,
};
pub use version::{VendorVersion, VersionSpec, resolve_version_string};
