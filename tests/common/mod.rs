// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use dockerpkg::{
    Applied, OsFacts, PackageManager, PlatformProfile, RepositoryDescriptor, RepositoryRegistrar,
    Result, VendorVersion,
};
use std::collections::HashMap;

/// Build a validated profile, panicking on bad fixture data.
pub fn profile(platform: &str, family: &str, version: &str, arch: &str) -> PlatformProfile {
    PlatformProfile::from_facts(&OsFacts::new(platform, family, version, arch))
        .expect("fixture facts should be valid")
}

pub fn bionic_arm() -> PlatformProfile {
    profile("ubuntu", "debian", "18.04", "aarch64")
}

pub fn centos7() -> PlatformProfile {
    profile("centos", "rhel", "7.6.1810", "x86_64")
}

pub fn amazon2() -> PlatformProfile {
    profile("amazon", "amazon", "2", "x86_64")
}

/// Registrar that remembers registered repositories and counts changes.
#[derive(Debug, Default)]
pub struct StatefulRegistrar {
    pub registered: Vec<RepositoryDescriptor>,
    pub calls: usize,
    pub mutations: usize,
}

impl RepositoryRegistrar for StatefulRegistrar {
    fn register(&mut self, descriptor: &RepositoryDescriptor) -> Result<Applied> {
        self.calls += 1;
        if self.registered.contains(descriptor) {
            return Ok(Applied::Unchanged);
        }
        self.registered
            .retain(|existing| existing.name != descriptor.name);
        self.registered.push(descriptor.clone());
        self.mutations += 1;
        Ok(Applied::Changed)
    }
}

/// Package manager backed by an in-memory installed set.
#[derive(Debug, Default)]
pub struct StatefulPackages {
    /// name -> installed version
    pub installed: HashMap<String, String>,
    pub calls: usize,
    pub mutations: usize,
}

impl StatefulPackages {
    pub fn with_installed(name: &str, version: &str) -> Self {
        let mut packages = Self::default();
        packages
            .installed
            .insert(name.to_string(), version.to_string());
        packages
    }
}

impl PackageManager for StatefulPackages {
    fn ensure_installed(
        &mut self,
        name: &str,
        version: Option<&VendorVersion>,
        _options: Option<&str>,
    ) -> Result<Applied> {
        self.calls += 1;
        let current = self.installed.get(name);
        let satisfied = match (current, version) {
            (Some(_), None) => true,
            (Some(installed), Some(wanted)) => installed == wanted.as_str(),
            (None, _) => false,
        };
        if satisfied {
            return Ok(Applied::Unchanged);
        }

        let version = version
            .map(|v| v.to_string())
            .unwrap_or_else(|| "repository-default".to_string());
        self.installed.insert(name.to_string(), version);
        self.mutations += 1;
        Ok(Applied::Changed)
    }

    fn ensure_removed(&mut self, name: &str) -> Result<Applied> {
        self.calls += 1;
        if self.installed.remove(name).is_some() {
            self.mutations += 1;
            Ok(Applied::Changed)
        } else {
            Ok(Applied::Unchanged)
        }
    }
}
