// tests/orchestration.rs

//! Install and remove flows against stateful collaborators.

mod common;

use common::{StatefulPackages, StatefulRegistrar, amazon2, bionic_arm, centos7, profile};
use dockerpkg::{
    Applied, InstallRequest, InstallationOrchestrator, RepositoryStep, VersionSpec,
};

fn orchestrator() -> InstallationOrchestrator<StatefulRegistrar, StatefulPackages> {
    InstallationOrchestrator::new(StatefulRegistrar::default(), StatefulPackages::default())
}

#[test]
fn test_second_apply_is_a_no_op() {
    let p = bionic_arm();
    let request = InstallRequest {
        version: VersionSpec::parse("18.09.5").unwrap(),
        ..Default::default()
    };
    let mut orch = orchestrator();

    let first = orch.create_or_ensure(&p, &request).unwrap();
    assert!(first.changed());
    assert_eq!(orch.registrar().mutations, 1);
    assert_eq!(orch.package_manager().mutations, 1);

    let second = orch.create_or_ensure(&p, &request).unwrap();
    assert!(!second.changed());
    assert_eq!(
        second.repository,
        RepositoryStep::Registered {
            applied: Applied::Unchanged
        }
    );
    assert_eq!(second.package, Applied::Unchanged);
    assert_eq!(orch.registrar().mutations, 1);
    assert_eq!(orch.package_manager().mutations, 1);
    assert_eq!(
        orch.package_manager().installed.get("docker-ce").map(String::as_str),
        Some("5:18.09.5~3-0~ubuntu-bionic")
    );
}

#[test]
fn test_already_converged_machine() {
    let p = centos7();
    let mut orch = InstallationOrchestrator::new(
        StatefulRegistrar::default(),
        StatefulPackages::with_installed("docker-ce", "19.03.5-3.el7"),
    );

    let report = orch.create_or_ensure(&p, &InstallRequest::default()).unwrap();
    assert_eq!(report.package, Applied::Unchanged);
    assert_eq!(orch.package_manager().mutations, 0);
}

#[test]
fn test_version_change_reinstalls() {
    let p = centos7();
    let mut orch = InstallationOrchestrator::new(
        StatefulRegistrar::default(),
        StatefulPackages::with_installed("docker-ce", "18.09.1-3.el7"),
    );

    let report = orch.create_or_ensure(&p, &InstallRequest::default()).unwrap();
    assert_eq!(report.package, Applied::Changed);
    assert_eq!(
        orch.package_manager().installed["docker-ce"],
        "19.03.5-3.el7"
    );
}

#[test]
fn test_channel_switch_reregisters() {
    let p = profile("fedora", "fedora", "31", "x86_64");
    let mut orch = orchestrator();

    orch.create_or_ensure(&p, &InstallRequest::default()).unwrap();
    let request = InstallRequest {
        channel: dockerpkg::Channel::new("test").unwrap(),
        ..Default::default()
    };
    let report = orch.create_or_ensure(&p, &request).unwrap();

    assert_eq!(
        report.repository,
        RepositoryStep::Registered {
            applied: Applied::Changed
        }
    );
    assert_eq!(orch.registrar().registered.len(), 1);
    assert!(orch.registrar().registered[0].base_url.ends_with("/test"));
}

#[test]
fn test_amazon_installs_default_package() {
    let p = amazon2();
    let mut orch = orchestrator();

    let report = orch.create_or_ensure(&p, &InstallRequest::default()).unwrap();
    assert_eq!(report.repository, RepositoryStep::Disabled);
    assert_eq!(report.package_name, "docker");
    assert!(report.package_version.is_none());
    assert_eq!(orch.registrar().calls, 0);

    // Any installed version satisfies an unversioned request
    let again = orch.create_or_ensure(&p, &InstallRequest::default()).unwrap();
    assert_eq!(again.package, Applied::Unchanged);
}

#[test]
fn test_unsupported_platform_continues_with_install() {
    let p = profile("opensuseleap", "suse", "15.1", "x86_64");
    let mut orch = orchestrator();

    let report = orch.create_or_ensure(&p, &InstallRequest::default()).unwrap();
    assert!(matches!(report.repository, RepositoryStep::Skipped { .. }));
    assert_eq!(orch.registrar().calls, 0);
    assert_eq!(
        orch.package_manager().installed.get("docker-ce").map(String::as_str),
        Some("19.03.5")
    );
}

#[test]
fn test_remove_is_idempotent() {
    let mut orch = InstallationOrchestrator::new(
        StatefulRegistrar::default(),
        StatefulPackages::with_installed("docker-ce", "19.03.5-3.el7"),
    );

    assert_eq!(orch.remove("docker-ce").unwrap(), Applied::Changed);
    assert_eq!(orch.remove("docker-ce").unwrap(), Applied::Unchanged);
    assert_eq!(orch.package_manager().mutations, 1);
    assert_eq!(orch.package_manager().calls, 2);
}
