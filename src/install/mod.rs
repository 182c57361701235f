// src/install/mod.rs

//! Installation orchestration
//!
//! Ties the resolvers to the two external collaborators:
//! 1. optionally resolve the Docker repository and hand it to a
//!    [`RepositoryRegistrar`]
//! 2. resolve the vendor version string (skipped on Amazon, which installs
//!    whatever its default repository serves)
//! 3. ask the [`PackageManager`] to ensure the package is installed
//!
//! Both collaborators are expected to be idempotent: re-applying a state
//! the machine already has reports [`Applied::Unchanged`].

mod dry_run;

pub use dry_run::{DryRun, PlannedAction};

use crate::error::Result;
use crate::platform::PlatformProfile;
use crate::repository::{Channel, RepositoryDescriptor, RepositoryPlan, resolve_repository};
use crate::version::{VendorVersion, VersionSpec, resolve_version_string};
use serde::Serialize;
use tracing::{info, warn};

/// Package name on platforms served by the Docker feed
pub const DOCKER_CE_PACKAGE: &str = "docker-ce";

/// Package name in Amazon's default repository
pub const AMAZON_PACKAGE: &str = "docker";

/// Whether a collaborator call changed the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Applied {
    Changed,
    Unchanged,
}

impl Applied {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Durably installs repository definitions for the package manager
pub trait RepositoryRegistrar {
    /// Make the repository visible to the package manager
    fn register(&mut self, descriptor: &RepositoryDescriptor) -> Result<Applied>;
}

/// Installs and removes packages through the OS package manager
pub trait PackageManager {
    /// Ensure `name` is installed, at `version` when one is given
    fn ensure_installed(
        &mut self,
        name: &str,
        version: Option<&VendorVersion>,
        options: Option<&str>,
    ) -> Result<Applied>;

    /// Ensure `name` is not installed
    fn ensure_removed(&mut self, name: &str) -> Result<Applied>;
}

/// Default package name for a platform
pub fn default_package_name(profile: &PlatformProfile) -> &'static str {
    if profile.is_amazon() {
        AMAZON_PACKAGE
    } else {
        DOCKER_CE_PACKAGE
    }
}

/// Whether the Docker repository is set up when the caller does not say
pub fn default_setup_repo(profile: &PlatformProfile) -> bool {
    !profile.is_amazon()
}

/// Desired Docker installation
#[derive(Debug, Clone, Default)]
pub struct InstallRequest {
    /// Upstream Docker release
    pub version: VersionSpec,
    pub channel: Channel,
    /// `None` uses [`default_setup_repo`]
    pub setup_repo: Option<bool>,
    /// `None` uses [`default_package_name`]
    pub package_name: Option<String>,
    /// Exact package-manager version; bypasses version resolution
    pub package_version: Option<String>,
    /// Extra options passed through to the package manager
    pub package_options: Option<String>,
}

impl InstallRequest {
    pub fn package_name<'a>(&'a self, profile: &PlatformProfile) -> &'a str {
        self.package_name
            .as_deref()
            .unwrap_or_else(|| default_package_name(profile))
    }

    pub fn setup_repo(&self, profile: &PlatformProfile) -> bool {
        self.setup_repo.unwrap_or_else(|| default_setup_repo(profile))
    }

    /// Version string to install, `None` on Amazon
    pub fn vendor_version(&self, profile: &PlatformProfile) -> Result<Option<VendorVersion>> {
        if profile.is_amazon() {
            return Ok(None);
        }
        match &self.package_version {
            Some(explicit) => Ok(Some(VendorVersion::new(explicit.clone()))),
            None => resolve_version_string(profile, &self.version).map(Some),
        }
    }
}

/// What happened to the repository during an install
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RepositoryStep {
    /// Repository setup was not requested
    Disabled,
    /// The repository was handed to the registrar
    Registered { applied: Applied },
    /// No repository is defined for the platform
    Skipped { reason: String },
}

/// Outcome of [`InstallationOrchestrator::create_or_ensure`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub repository: RepositoryStep,
    pub package_name: String,
    pub package_version: Option<VendorVersion>,
    pub package: Applied,
}

impl InstallReport {
    /// True if any step changed the machine
    pub fn changed(&self) -> bool {
        self.package.is_changed()
            || matches!(
                self.repository,
                RepositoryStep::Registered {
                    applied: Applied::Changed
                }
            )
    }
}

/// Applies a Docker installation through the external collaborators
pub struct InstallationOrchestrator<R, P> {
    registrar: R,
    packages: P,
}

impl<R: RepositoryRegistrar, P: PackageManager> InstallationOrchestrator<R, P> {
    pub fn new(registrar: R, packages: P) -> Self {
        Self {
            registrar,
            packages,
        }
    }

    pub fn registrar(&self) -> &R {
        &self.registrar
    }

    pub fn package_manager(&self) -> &P {
        &self.packages
    }

    pub fn into_parts(self) -> (R, P) {
        (self.registrar, self.packages)
    }

    /// Ensure Docker is installed as `request` describes
    ///
    /// Resolution errors are raised before either collaborator is called
    /// for the package step, so a failed resolution never installs an
    /// unversioned package.
    pub fn create_or_ensure(
        &mut self,
        profile: &PlatformProfile,
        request: &InstallRequest,
    ) -> Result<InstallReport> {
        let package_name = request.package_name(profile).to_string();
        let package_version = request.vendor_version(profile)?;

        let repository = if request.setup_repo(profile) {
            match resolve_repository(profile, &request.channel) {
                RepositoryPlan::Configured(descriptor) => {
                    info!("Registering repository: {}", descriptor);
                    let applied = self.registrar.register(&descriptor)?;
                    RepositoryStep::Registered { applied }
                }
                RepositoryPlan::Unsupported { reason } => {
                    warn!(
                        "Cannot setup the Docker repo for platform {}. Skipping.",
                        profile.distro()
                    );
                    RepositoryStep::Skipped { reason }
                }
            }
        } else {
            RepositoryStep::Disabled
        };

        info!(
            "Ensuring package {} {} is installed",
            package_name,
            package_version
                .as_ref()
                .map(|v| v.as_str())
                .unwrap_or("(repository default)")
        );
        let package = self.packages.ensure_installed(
            &package_name,
            package_version.as_ref(),
            request.package_options.as_deref(),
        )?;

        Ok(InstallReport {
            repository,
            package_name,
            package_version,
            package,
        })
    }

    /// Ensure the named package is removed
    pub fn remove(&mut self, package_name: &str) -> Result<Applied> {
        info!("Ensuring package {} is removed", package_name);
        self.packages.ensure_removed(package_name)
    }
}
