// src/install/dry_run.rs

//! Collaborator that records actions instead of performing them

use super::{Applied, PackageManager, RepositoryRegistrar};
use crate::error::Result;
use crate::repository::RepositoryDescriptor;
use crate::version::VendorVersion;
use serde::Serialize;
use tracing::info;

/// An action that would have been applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum PlannedAction {
    RegisterRepository(RepositoryDescriptor),
    Install {
        name: String,
        version: Option<VendorVersion>,
        options: Option<String>,
    },
    Remove {
        name: String,
    },
}

/// Registrar and package manager that only logs and records
///
/// Every call reports [`Applied::Changed`] since nothing is known about the
/// machine's current state.
#[derive(Debug, Default)]
pub struct DryRun {
    actions: Vec<PlannedAction>,
}

impl DryRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[PlannedAction] {
        &self.actions
    }
}

impl RepositoryRegistrar for DryRun {
    fn register(&mut self, descriptor: &RepositoryDescriptor) -> Result<Applied> {
        info!("[dry run] would register repository {}", descriptor);
        self.actions
            .push(PlannedAction::RegisterRepository(descriptor.clone()));
        Ok(Applied::Changed)
    }
}

impl PackageManager for DryRun {
    fn ensure_installed(
        &mut self,
        name: &str,
        version: Option<&VendorVersion>,
        options: Option<&str>,
    ) -> Result<Applied> {
        info!(
            "[dry run] would install {}{}",
            name,
            version.map(|v| format!(" at {}", v)).unwrap_or_default()
        );
        self.actions.push(PlannedAction::Install {
            name: name.to_string(),
            version: version.cloned(),
            options: options.map(str::to_string),
        });
        Ok(Applied::Changed)
    }

    fn ensure_removed(&mut self, name: &str) -> Result<Applied> {
        info!("[dry run] would remove {}", name);
        self.actions.push(PlannedAction::Remove {
            name: name.to_string(),
        });
        Ok(Applied::Changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut dry = DryRun::new();
        let version = VendorVersion::new("19.03.5-3.el7");
        dry.ensure_installed("docker-ce", Some(&version), None).unwrap();
        dry.ensure_removed("docker-ce").unwrap();

        assert_eq!(
            dry.actions(),
            [
                PlannedAction::Install {
                    name: "docker-ce".to_string(),
                    version: Some(version),
                    options: None,
                },
                PlannedAction::Remove {
                    name: "docker-ce".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_serializes_with_action_tag() {
        let mut dry = DryRun::new();
        dry.ensure_removed("docker").unwrap();
        let json = serde_json::to_value(dry.actions()).unwrap();
        assert_eq!(json[0]["action"], "remove");
        assert_eq!(json[0]["name"], "docker");
    }
}
