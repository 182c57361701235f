// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: output format
fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .value_parser(["text", "json"])
        .default_value("text")
        .help("Output format")
}

/// Platform fact overrides shared by resolve, install and remove
fn platform_args() -> [Arg; 4] {
    [
        Arg::new("platform")
            .long("platform")
            .help("Distribution name, e.g. ubuntu, centos, fedora, amazon"),
        Arg::new("family")
            .long("family")
            .help("Platform family, e.g. debian, rhel (inferred for known distributions)"),
        Arg::new("platform_version")
            .long("platform-version")
            .help("Distribution release, e.g. 18.04 or 7.6.1810"),
        Arg::new("arch")
            .long("arch")
            .help("Kernel architecture, e.g. x86_64"),
    ]
}

fn install_args() -> [Arg; 6] {
    [
        Arg::new("docker_version")
            .long("docker-version")
            .help("Docker release to install, e.g. 19.03.5"),
        Arg::new("channel")
            .long("channel")
            .action(ArgAction::Append)
            .help("Repository channel; repeat for several apt components"),
        Arg::new("setup_repo")
            .long("setup-repo")
            .value_parser(["true", "false"])
            .help("Set up (true) or skip (false) the Docker repository"),
        Arg::new("package_name")
            .long("package-name")
            .help("Package name to install"),
        Arg::new("package_version")
            .long("package-version")
            .help("Exact package-manager version, bypassing resolution"),
        Arg::new("package_options")
            .long("package-options")
            .help("Extra options for the package manager"),
    ]
}

fn build_cli() -> Command {
    Command::new("dockerpkg")
        .version(env!("CARGO_PKG_VERSION"))
        .author("dockerpkg Contributors")
        .about("Resolve the Docker repository and package version for a platform")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Configuration file (default: /etc/dockerpkg/install.toml if present)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(
            Command::new("resolve")
                .about("Show the repository and package version for the platform")
                .args(platform_args())
                .args(install_args())
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("install")
                .about("Plan a Docker installation without changing the system")
                .args(platform_args())
                .args(install_args())
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("remove")
                .about("Plan removal of the Docker package without changing the system")
                .args(platform_args())
                .arg(
                    Arg::new("package_name")
                        .long("package-name")
                        .help("Package to remove (default: docker-ce, or docker on Amazon)"),
                )
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("arch")
                .about("Print the Debian architecture name for a kernel architecture")
                .arg(
                    Arg::new("kernel_arch")
                        .required(true)
                        .help("Kernel architecture, as reported by `uname -m`"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("dockerpkg.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
