// src/version/mod.rs

//! Docker release to package-manager version string mapping
//!
//! Upstream Docker releases are requested by their semantic version
//! (`19.03.5`), but yum and apt expect the exact version string the feed
//! published, and that naming changed several times:
//! - before 17.06, Debian-family packages carried a codename suffix
//! - 17.03.3 on EL7 was repackaged with a one-off release tag
//! - up to 18.06, `~ce-0~` / `.ce-1.el7.centos` decorations were used
//! - from 18.09 on, Debian-family packages gained epoch `5:` and the
//!   feed generation marker, and Fedora tracks upstream directly
//!
//! The rules live in an ordered table and the first matching rule wins.
//! Several ranges overlap, so the order is significant.

use crate::error::{Error, Result};
use crate::platform::PlatformProfile;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Docker release installed when none is requested
pub const DEFAULT_DOCKER_VERSION: &str = "19.03.5";

/// Feed generation marker embedded in post-18.06 package versions
pub const FEED_GENERATION: &str = "3";

/// Epoch prefix Debian-family packages gained with 18.09
pub const DEB_EPOCH: &str = "5";

/// Decimal magnitude of the first two version components
///
/// `18.09.2` has magnitude `18.09`; the patch level is dropped, so
/// `18.09.10` and `18.09.2` compare equal. The minor component is read as
/// a decimal fraction, making `18.9` greater than `18.09`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Magnitude {
    whole: u64,
    /// Fraction digits with trailing zeros removed
    fraction: String,
}

impl Magnitude {
    fn new(whole: u64, fraction: &str) -> Self {
        Self {
            whole,
            fraction: fraction.trim_end_matches('0').to_string(),
        }
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fraction.is_empty() {
            write!(f, "{}", self.whole)
        } else {
            write!(f, "{}.{}", self.whole, self.fraction)
        }
    }
}

/// A requested Docker release such as `18.09.2`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionSpec {
    raw: String,
    magnitude: Magnitude,
}

impl VersionSpec {
    /// Parse a dotted numeric version
    ///
    /// Only the leading `major[.minor]` digits take part in comparisons;
    /// anything after them is kept verbatim in the raw string.
    pub fn parse(s: &str) -> Result<Self> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(Error::InvalidVersion("version is empty".to_string()));
        }
        if raw.contains(char::is_whitespace) {
            return Err(Error::InvalidVersion(format!(
                "'{}' contains whitespace",
                raw
            )));
        }

        let whole_len = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
        if whole_len == 0 {
            return Err(Error::InvalidVersion(format!(
                "'{}' does not start with a number",
                raw
            )));
        }
        let whole = raw[..whole_len]
            .parse::<u64>()
            .map_err(|e| Error::InvalidVersion(format!("'{}': {}", raw, e)))?;

        let fraction = raw[whole_len..]
            .strip_prefix('.')
            .map(|rest| {
                let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
                &rest[..end]
            })
            .unwrap_or("");

        Ok(Self {
            raw: raw.to_string(),
            magnitude: Magnitude::new(whole, fraction),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn magnitude(&self) -> &Magnitude {
        &self.magnitude
    }

    fn below(&self, whole: u64, fraction: &str) -> bool {
        self.magnitude < Magnitude::new(whole, fraction)
    }

    fn at_least(&self, whole: u64, fraction: &str) -> bool {
        !self.below(whole, fraction)
    }
}

impl Default for VersionSpec {
    fn default() -> Self {
        Self {
            raw: DEFAULT_DOCKER_VERSION.to_string(),
            magnitude: Magnitude::new(19, "03"),
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl std::str::FromStr for VersionSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Version string in the target package manager's syntax
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VendorVersion(String);

impl VendorVersion {
    /// Wrap an already-formatted version string
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for VendorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One guarded entry of the version table
struct Rule {
    name: &'static str,
    applies: fn(&PlatformProfile, &VersionSpec) -> bool,
    render: fn(&PlatformProfile, &VersionSpec) -> Result<String>,
}

/// `debian` or `ubuntu` for the two Debian-family distros with a Docker feed
fn deb_distro(profile: &PlatformProfile) -> Option<&'static str> {
    if profile.is_debian() {
        Some("debian")
    } else if profile.is_ubuntu() {
        Some("ubuntu")
    } else {
        None
    }
}

fn deb_distro_or_err(profile: &PlatformProfile) -> Result<&'static str> {
    deb_distro(profile).ok_or_else(|| {
        Error::InconsistentPlatform(format!(
            "{} has no Debian-family package naming",
            profile.distro()
        ))
    })
}

const RULES: &[Rule] = &[
    // Codename-suffixed Debian packages from the 17.03 era
    Rule {
        name: "deb-pre-17.06",
        applies: |p, v| v.below(17, "06") && p.is_debian_family() && deb_distro(p).is_some(),
        render: |p, v| {
            let distro = deb_distro_or_err(p)?;
            let codename = p.require_codename()?;
            Ok(format!("{}~ce-0~{}-{}", v, distro, codename))
        },
    },
    // Repackaged 17.03.3 on EL7; exact match only
    Rule {
        name: "el7-17.03.3",
        applies: |p, v| v.as_str() == "17.03.3" && p.is_el7(),
        render: |_, v| Ok(format!("{}.ce-1.el7", v)),
    },
    // Pre-18.06 CE packages; Ubuntu 18.04 only has the newer naming
    Rule {
        name: "pre-18.06",
        applies: |p, v| {
            v.below(18, "06") && !p.is_bionic() && (p.is_el7() || deb_distro(p).is_some())
        },
        render: |p, v| {
            if p.is_el7() {
                Ok(format!("{}.ce-1.el7.centos", v))
            } else {
                Ok(format!("{}~ce-0~{}", v, deb_distro_or_err(p)?))
            }
        },
    },
    Rule {
        name: "deb-epoch",
        applies: |p, v| v.at_least(18, "09") && p.is_debian_family() && deb_distro(p).is_some(),
        render: |p, v| {
            let distro = deb_distro_or_err(p)?;
            let codename = p.require_codename()?;
            Ok(format!(
                "{}:{}~{}-0~{}-{}",
                DEB_EPOCH, v, FEED_GENERATION, distro, codename
            ))
        },
    },
    Rule {
        name: "el7-18.09",
        applies: |p, v| v.at_least(18, "09") && p.is_el7(),
        render: |_, v| Ok(format!("{}-{}.el7", v, FEED_GENERATION)),
    },
    // Fedora's feed tracks upstream versions verbatim
    Rule {
        name: "fedora-18.09",
        applies: |p, v| v.at_least(18, "09") && p.is_fedora(),
        render: |_, v| Ok(v.to_string()),
    },
    Rule {
        name: "fallback",
        applies: |_, _| true,
        render: |p, v| {
            Ok(if p.is_fedora() {
                format!("{}.ce", v)
            } else if p.is_el7() {
                format!("{}.ce-{}.el7", v, FEED_GENERATION)
            } else if let Some(distro) = deb_distro(p) {
                format!("{}~ce~{}-0~{}", v, FEED_GENERATION, distro)
            } else {
                v.to_string()
            })
        },
    },
];

fn select_rule(profile: &PlatformProfile, version: &VersionSpec) -> &'static Rule {
    RULES
        .iter()
        .find(|rule| (rule.applies)(profile, version))
        // The fallback rule always applies
        .unwrap_or(&RULES[RULES.len() - 1])
}

/// Name of the table rule that decides this platform and version
pub fn matching_rule(profile: &PlatformProfile, version: &VersionSpec) -> &'static str {
    select_rule(profile, version).name
}

/// Resolve the package-manager version string for a Docker release
///
/// Fails with [`Error::UnresolvedCodename`] when a Debian-family rule
/// needs a release codename the platform table does not know.
pub fn resolve_version_string(
    profile: &PlatformProfile,
    version: &VersionSpec,
) -> Result<VendorVersion> {
    let rule = select_rule(profile, version);
    let resolved = (rule.render)(profile, version)?;

    debug!(
        "Resolved Docker {} on {} to '{}' (rule {})",
        version, profile, resolved, rule.name
    );
    Ok(VendorVersion(resolved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::OsFacts;

    fn profile(platform: &str, family: &str, version: &str) -> PlatformProfile {
        PlatformProfile::from_facts(&OsFacts::new(platform, family, version, "x86_64")).unwrap()
    }

    fn resolve(p: &PlatformProfile, v: &str) -> String {
        resolve_version_string(p, &VersionSpec::parse(v).unwrap())
            .unwrap()
            .into_inner()
    }

    #[test]
    fn test_parse_magnitude() {
        let v = VersionSpec::parse("18.09.2").unwrap();
        assert_eq!(v.as_str(), "18.09.2");
        assert_eq!(v.magnitude().to_string(), "18.09");

        assert_eq!(VersionSpec::parse("17").unwrap().magnitude().to_string(), "17");
        assert_eq!(VersionSpec::parse("17.10").unwrap().magnitude().to_string(), "17.1");
        assert_eq!(
            VersionSpec::parse("18.09.0~rc1").unwrap().magnitude().to_string(),
            "18.09"
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(VersionSpec::parse("").is_err());
        assert!(VersionSpec::parse("latest").is_err());
        assert!(VersionSpec::parse("v19.03.5").is_err());
        assert!(VersionSpec::parse("19.03 .5").is_err());
    }

    #[test]
    fn test_patch_level_ignored_in_comparisons() {
        let a = VersionSpec::parse("18.09.10").unwrap();
        let b = VersionSpec::parse("18.09.2").unwrap();
        assert_eq!(a.magnitude(), b.magnitude());
    }

    #[test]
    fn test_minor_compared_as_decimal_fraction() {
        let short = VersionSpec::parse("18.9").unwrap();
        let padded = VersionSpec::parse("18.09").unwrap();
        assert!(short.magnitude() > padded.magnitude());

        let a = VersionSpec::parse("17.1").unwrap();
        let b = VersionSpec::parse("17.10").unwrap();
        assert_eq!(a.magnitude(), b.magnitude());
    }

    #[test]
    fn test_default_version() {
        let v = VersionSpec::default();
        assert_eq!(v, VersionSpec::parse(DEFAULT_DOCKER_VERSION).unwrap());
    }

    #[test]
    fn test_el7_17_03_3_exception_wins() {
        let p = profile("centos", "rhel", "7.6.1810");
        let v = VersionSpec::parse("17.03.3").unwrap();
        assert_eq!(matching_rule(&p, &v), "el7-17.03.3");
        assert_eq!(resolve(&p, "17.03.3"), "17.03.3.ce-1.el7");
    }

    #[test]
    fn test_el7_pre_18_06() {
        let p = profile("centos", "rhel", "7");
        assert_eq!(resolve(&p, "17.03.2"), "17.03.2.ce-1.el7.centos");
        assert_eq!(resolve(&p, "18.03.1"), "18.03.1.ce-1.el7.centos");
    }

    #[test]
    fn test_debian_pre_17_06_uses_codename() {
        let stretch = profile("debian", "debian", "9.11");
        assert_eq!(resolve(&stretch, "17.03.1"), "17.03.1~ce-0~debian-stretch");

        let xenial = profile("ubuntu", "debian", "16.04");
        assert_eq!(resolve(&xenial, "17.03.2"), "17.03.2~ce-0~ubuntu-xenial");

        let bionic = profile("ubuntu", "debian", "18.04");
        assert_eq!(resolve(&bionic, "17.03.0"), "17.03.0~ce-0~ubuntu-bionic");
    }

    #[test]
    fn test_17_06_boundary_is_strict() {
        let stretch = profile("debian", "debian", "9");
        let v = VersionSpec::parse("17.06").unwrap();
        assert_eq!(matching_rule(&stretch, &v), "pre-18.06");
        assert_eq!(resolve(&stretch, "17.06"), "17.06~ce-0~debian");
    }

    #[test]
    fn test_ubuntu_pre_18_06() {
        let xenial = profile("ubuntu", "debian", "16.04");
        assert_eq!(resolve(&xenial, "17.12.1"), "17.12.1~ce-0~ubuntu");

        // Only 18.04 is carved out of the pre-18.06 rule
        let focal = profile("ubuntu", "debian", "20.04");
        assert_eq!(resolve(&focal, "18.03.1"), "18.03.1~ce-0~ubuntu");
    }

    #[test]
    fn test_bionic_pre_18_06_falls_through() {
        let bionic = profile("ubuntu", "debian", "18.04");
        let v = VersionSpec::parse("18.03.1").unwrap();
        assert_eq!(matching_rule(&bionic, &v), "fallback");
        assert_eq!(resolve(&bionic, "18.03.1"), "18.03.1~ce~3-0~ubuntu");
    }

    #[test]
    fn test_deb_epoch_from_18_09() {
        let bionic = profile("ubuntu", "debian", "18.04");
        assert_eq!(resolve(&bionic, "18.09.0"), "5:18.09.0~3-0~ubuntu-bionic");
        assert_eq!(resolve(&bionic, "18.09.5"), "5:18.09.5~3-0~ubuntu-bionic");

        let buster = profile("debian", "debian", "10.2");
        assert_eq!(resolve(&buster, "19.03.5"), "5:19.03.5~3-0~debian-buster");

        let focal = profile("ubuntu", "debian", "20.04");
        assert_eq!(resolve(&focal, "19.03.8"), "5:19.03.8~3-0~ubuntu-focal");
    }

    #[test]
    fn test_el7_from_18_09() {
        let p = profile("centos", "rhel", "7.7.1908");
        assert_eq!(resolve(&p, "18.09.1"), "18.09.1-3.el7");
        assert_eq!(resolve(&p, "19.03.5"), "19.03.5-3.el7");
    }

    #[test]
    fn test_fedora_passthrough_from_18_09() {
        let p = profile("fedora", "fedora", "31");
        assert_eq!(resolve(&p, "19.03.5"), "19.03.5");
    }

    #[test]
    fn test_18_06_gap_uses_fallback() {
        assert_eq!(resolve(&profile("fedora", "fedora", "28"), "18.06.1"), "18.06.1.ce");
        assert_eq!(resolve(&profile("centos", "rhel", "7"), "18.06.1"), "18.06.1.ce-3.el7");
        assert_eq!(
            resolve(&profile("debian", "debian", "9"), "18.06.1"),
            "18.06.1~ce~3-0~debian"
        );
        assert_eq!(
            resolve(&profile("ubuntu", "debian", "16.04"), "18.06.3"),
            "18.06.3~ce~3-0~ubuntu"
        );
    }

    #[test]
    fn test_fedora_before_18_09() {
        let p = profile("fedora", "fedora", "27");
        assert_eq!(resolve(&p, "17.12.0"), "17.12.0.ce");
    }

    #[test]
    fn test_other_platforms_pass_through() {
        assert_eq!(resolve(&profile("centos", "rhel", "8.1.1911"), "19.03.5"), "19.03.5");
        assert_eq!(resolve(&profile("centos", "rhel", "6.10"), "17.03.1"), "17.03.1");
        assert_eq!(resolve(&profile("amazon", "amazon", "2"), "18.09.1"), "18.09.1");
        assert_eq!(resolve(&profile("opensuseleap", "suse", "15"), "19.03.5"), "19.03.5");
    }

    #[test]
    fn test_unresolved_codename_is_an_error() {
        let eoan = profile("ubuntu", "debian", "19.10");
        let v = VersionSpec::parse("19.03.5").unwrap();
        assert!(matches!(
            resolve_version_string(&eoan, &v),
            Err(Error::UnresolvedCodename { .. })
        ));

        let jessie = profile("debian", "debian", "8.11");
        let v = VersionSpec::parse("17.03.1").unwrap();
        assert!(matches!(
            resolve_version_string(&jessie, &v),
            Err(Error::UnresolvedCodename { .. })
        ));
    }

    #[test]
    fn test_codename_only_needed_by_codename_rules() {
        let eoan = profile("ubuntu", "debian", "19.10");
        assert_eq!(resolve(&eoan, "18.06.1"), "18.06.1~ce~3-0~ubuntu");
    }

    #[test]
    fn test_architecture_does_not_affect_version() {
        let facts = |arch: &str| OsFacts::new("ubuntu", "debian", "18.04", arch);
        let amd = PlatformProfile::from_facts(&facts("x86_64")).unwrap();
        let arm = PlatformProfile::from_facts(&facts("aarch64")).unwrap();
        for v in ["17.03.1", "18.03.1", "18.06.1", "18.09.5", "19.03.5"] {
            assert_eq!(resolve(&amd, v), resolve(&arm, v));
        }
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let p = profile("centos", "rhel", "7");
        let v = VersionSpec::parse("18.09.2").unwrap();
        assert_eq!(
            resolve_version_string(&p, &v).unwrap(),
            resolve_version_string(&p, &v).unwrap()
        );
    }
}
