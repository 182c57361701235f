// src/commands.rs
//! Command handlers for the dockerpkg CLI

use crate::cli::{InstallArgs, OutputFormat, PlatformArgs};
use anyhow::{Context, Result};
use dockerpkg::config::{ChannelSetting, InstallSettings, PlatformSettings};
use dockerpkg::install::{PlannedAction, default_package_name};
use dockerpkg::version::matching_rule;
use dockerpkg::{
    DryRun, InstallConfig, InstallRequest, InstallationOrchestrator, PlatformProfile,
    RepositoryPlan, VendorVersion, map_architecture, resolve_repository,
};
use serde::Serialize;
use std::path::Path;
use tracing::info;

impl PlatformArgs {
    fn merge_into(&self, settings: &mut PlatformSettings) {
        override_with(&mut settings.platform, &self.platform);
        override_with(&mut settings.platform_family, &self.family);
        override_with(&mut settings.platform_version, &self.platform_version);
        override_with(&mut settings.kernel_machine, &self.arch);
    }
}

impl InstallArgs {
    fn merge_into(&self, settings: &mut InstallSettings) {
        override_with(&mut settings.version, &self.docker_version);
        match self.channel.as_slice() {
            [] => {}
            [one] => settings.channel = Some(ChannelSetting::One(one.clone())),
            many => settings.channel = Some(ChannelSetting::Many(many.to_vec())),
        }
        if self.setup_repo.is_some() {
            settings.setup_repo = self.setup_repo;
        }
        override_with(&mut settings.package_name, &self.package_name);
        override_with(&mut settings.package_version, &self.package_version);
        override_with(&mut settings.package_options, &self.package_options);
    }
}

fn override_with(target: &mut Option<String>, value: &Option<String>) {
    if value.is_some() {
        target.clone_from(value);
    }
}

fn load(
    config_path: Option<&Path>,
    platform: &PlatformArgs,
) -> Result<(InstallConfig, PlatformProfile)> {
    let mut config = dockerpkg::load_config(config_path).context("Failed to load configuration")?;
    platform.merge_into(&mut config.platform);

    let facts = config.platform.to_facts()?;
    let profile = PlatformProfile::from_facts(&facts)?;
    info!("Target platform: {}", profile);
    Ok((config, profile))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct Resolution<'a> {
    platform: &'a PlatformProfile,
    repository: RepositoryPlan,
    /// Version rule that produced the string; absent when none was consulted
    rule: Option<&'static str>,
    /// `None` installs whatever the repository offers
    version: Option<VendorVersion>,
}

/// Resolve what an install would use, honouring overrides and Amazon
fn plan_resolution<'a>(
    profile: &'a PlatformProfile,
    request: &InstallRequest,
) -> dockerpkg::Result<Resolution<'a>> {
    let version = request.vendor_version(profile)?;
    let rule = if profile.is_amazon() || request.package_version.is_some() {
        None
    } else {
        Some(matching_rule(profile, &request.version))
    };

    Ok(Resolution {
        platform: profile,
        repository: resolve_repository(profile, &request.channel),
        rule,
        version,
    })
}

/// Show the repository plan and vendor version string
pub fn cmd_resolve(
    config_path: Option<&Path>,
    platform: &PlatformArgs,
    install: &InstallArgs,
    format: OutputFormat,
) -> Result<()> {
    let (mut config, profile) = load(config_path, platform)?;
    install.merge_into(&mut config.install);
    let request = config.install.to_request()?;
    let resolution = plan_resolution(&profile, &request)?;

    match format {
        OutputFormat::Json => print_json(&resolution),
        OutputFormat::Text => {
            println!("Platform:   {}", profile);
            println!("Docker:     {}", request.version);
            match (&resolution.version, resolution.rule) {
                (Some(version), Some(rule)) => {
                    println!("Package:    {} (rule {})", version, rule)
                }
                (Some(version), None) => println!("Package:    {}", version),
                (None, _) => println!("Package:    (repository default)"),
            }
            match &resolution.repository {
                RepositoryPlan::Configured(descriptor) => {
                    println!("Repository: {}", descriptor);
                    if let Some(text) = descriptor.render() {
                        println!();
                        print!("{}", text);
                    }
                }
                RepositoryPlan::Unsupported { reason } => {
                    println!("Repository: none ({})", reason);
                }
            }
            Ok(())
        }
    }
}

fn print_actions(actions: &[PlannedAction]) {
    for action in actions {
        match action {
            PlannedAction::RegisterRepository(descriptor) => {
                println!("register repository {}", descriptor);
            }
            PlannedAction::Install {
                name,
                version,
                options,
            } => {
                print!("install {}", name);
                if let Some(version) = version {
                    print!(" = {}", version);
                }
                if let Some(options) = options {
                    print!(" (options: {})", options);
                }
                println!();
            }
            PlannedAction::Remove { name } => println!("remove {}", name),
        }
    }
}

/// Run the install orchestration against the dry-run collaborator
pub fn cmd_install(
    config_path: Option<&Path>,
    platform: &PlatformArgs,
    install: &InstallArgs,
    format: OutputFormat,
) -> Result<()> {
    let (mut config, profile) = load(config_path, platform)?;
    install.merge_into(&mut config.install);
    let request = config.install.to_request()?;

    let mut orchestrator = InstallationOrchestrator::new(DryRun::new(), DryRun::new());
    let report = orchestrator.create_or_ensure(&profile, &request)?;

    let (registrar, packages) = orchestrator.into_parts();
    let actions: Vec<PlannedAction> = registrar
        .actions()
        .iter()
        .chain(packages.actions())
        .cloned()
        .collect();

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "report": report,
            "actions": actions,
        })),
        OutputFormat::Text => {
            print_actions(&actions);
            Ok(())
        }
    }
}

/// Package to remove when none is named on the command line
fn removal_name(install: &InstallSettings, profile: &PlatformProfile) -> String {
    install
        .package_name
        .clone()
        .unwrap_or_else(|| default_package_name(profile).to_string())
}

/// Run the remove operation against the dry-run collaborator
pub fn cmd_remove(
    config_path: Option<&Path>,
    platform: &PlatformArgs,
    package_name: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let name = match package_name {
        Some(name) => name.to_string(),
        None => {
            let (config, profile) = load(config_path, platform)?;
            removal_name(&config.install, &profile)
        }
    };

    let mut orchestrator = InstallationOrchestrator::new(DryRun::new(), DryRun::new());
    let applied = orchestrator.remove(&name)?;
    let (_, packages) = orchestrator.into_parts();

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "applied": applied,
            "actions": packages.actions(),
        })),
        OutputFormat::Text => {
            print_actions(packages.actions());
            Ok(())
        }
    }
}

/// Print the apt architecture for a kernel architecture
pub fn cmd_arch(kernel_arch: &str) -> Result<()> {
    println!("{}", map_architecture(kernel_arch));
    Ok(())
}
