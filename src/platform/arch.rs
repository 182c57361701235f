// src/platform/arch.rs

//! Kernel architecture to Debian architecture mapping
//!
//! The kernel reports CPU architectures using its own naming (`uname -m`),
//! while dpkg and apt use Debian port names. RPM-based systems use the
//! kernel token directly and never go through this mapping.

use tracing::debug;

/// Kernel tokens that have a different name in Debian's port list
const DEB_ARCHITECTURES: &[(&str, &str)] = &[
    ("x86_64", "amd64"),
    ("aarch64", "arm64"),
    ("armv7l", "armhf"),
    ("ppc64le", "ppc64el"),
];

/// Map a kernel architecture token to the token apt expects
///
/// Unknown tokens are passed through unchanged.
pub fn map_architecture(kernel_arch: &str) -> String {
    match DEB_ARCHITECTURES
        .iter()
        .find(|(kernel, _)| *kernel == kernel_arch)
    {
        Some((_, deb)) => {
            debug!("Mapped kernel architecture {} to {}", kernel_arch, deb);
            (*deb).to_string()
        }
        None => kernel_arch.to_string(),
    }
}
