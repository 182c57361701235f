// src/cli.rs
//! CLI definitions for dockerpkg
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dockerpkg")]
#[command(author = "dockerpkg Contributors")]
#[command(version)]
#[command(about = "Resolve the Docker repository and package version for a platform")]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: /etc/dockerpkg/install.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the repository and package version for the platform
    Resolve {
        #[command(flatten)]
        platform: PlatformArgs,

        #[command(flatten)]
        install: InstallArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Plan a Docker installation without changing the system
    Install {
        #[command(flatten)]
        platform: PlatformArgs,

        #[command(flatten)]
        install: InstallArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Plan removal of the Docker package without changing the system
    Remove {
        #[command(flatten)]
        platform: PlatformArgs,

        /// Package to remove (default: docker-ce, or docker on Amazon)
        #[arg(long)]
        package_name: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the Debian architecture name for a kernel architecture
    Arch {
        /// Kernel architecture, as reported by `uname -m`
        kernel_arch: String,
    },
}

/// Platform fact overrides
#[derive(Args, Debug, Default)]
pub struct PlatformArgs {
    /// Distribution name, e.g. ubuntu, centos, fedora, amazon
    #[arg(long)]
    pub platform: Option<String>,

    /// Platform family, e.g. debian, rhel (inferred for known distributions)
    #[arg(long)]
    pub family: Option<String>,

    /// Distribution release, e.g. 18.04 or 7.6.1810
    #[arg(long)]
    pub platform_version: Option<String>,

    /// Kernel architecture, e.g. x86_64
    #[arg(long)]
    pub arch: Option<String>,
}

/// Install setting overrides
#[derive(Args, Debug, Default)]
pub struct InstallArgs {
    /// Docker release to install, e.g. 19.03.5
    #[arg(long)]
    pub docker_version: Option<String>,

    /// Repository channel; repeat for several apt components
    #[arg(long)]
    pub channel: Vec<String>,

    /// Set up (true) or skip (false) the Docker repository
    #[arg(long)]
    pub setup_repo: Option<bool>,

    /// Package name to install
    #[arg(long)]
    pub package_name: Option<String>,

    /// Exact package-manager version, bypassing resolution
    #[arg(long)]
    pub package_version: Option<String>,

    /// Extra options for the package manager
    #[arg(long, allow_hyphen_values = true)]
    pub package_options: Option<String>,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
