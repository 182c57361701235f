// src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Resolve {
            platform,
            install,
            format,
        } => commands::cmd_resolve(config, &platform, &install, format),
        Commands::Install {
            platform,
            install,
            format,
        } => commands::cmd_install(config, &platform, &install, format),
        Commands::Remove {
            platform,
            package_name,
            format,
        } => commands::cmd_remove(config, &platform, package_name.as_deref(), format),
        Commands::Arch { kernel_arch } => commands::cmd_arch(&kernel_arch),
    }
}
