use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mntfinder::{MountPoint, MountTable, Result};
use tracing_subscriber::{EnvFilter, fmt};

/// Inspect the current mount table.
///
/// Without arguments, lists every mount. With PATHs, tells whether each is a
/// mount point and exits with 1 if any is not (2 on errors).
#[derive(Parser, Debug)]
#[command(name = "mntfinder", version)]
struct Args {
    /// Paths to check
    #[arg(value_name = "PATH")]
    targets: Vec<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();
    let table = MountTable::current();

    let result = if args.targets.is_empty() {
        print_table(&table)
    } else {
        check_targets(&table, &args.targets)
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("mntfinder: {e}");
            ExitCode::from(2)
        }
    }
}

fn print_table(table: &MountTable) -> Result<ExitCode> {
    for mount in table.all()? {
        print_mount(&mount);
    }
    Ok(ExitCode::SUCCESS)
}

fn check_targets(table: &MountTable, targets: &[PathBuf]) -> Result<ExitCode> {
    let mut all_mounted = true;

    for target in targets {
        match table.find(target)? {
            Some(mount) => print_mount(&mount),
            None => {
                println!("⛉ {}", target.display());
                println!("  • Not a mount point");
                all_mounted = false;
            }
        }
    }

    Ok(if all_mounted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_mount(mount: &MountPoint) {
    let indent = "  "; // 2 spaces for indentation
    println!("⛊ {}", mount.target().display());
    println!("{indent}• Source: {}", mount.source().to_string_lossy());
    println!("{indent}• Filesystem: {}", mount.fstype());
    println!("{indent}• Options: {}", mount.options().join(","));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn flags_are_not_taken_as_paths() {
        let err = Args::try_parse_from(["mntfinder", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let err = Args::try_parse_from(["mntfinder", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);

        let err = Args::try_parse_from(["mntfinder", "--bogus"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn paths_are_collected_in_order() {
        let args = Args::try_parse_from(["mntfinder", "/proc", "/media/USB DISK"]).unwrap();
        assert_eq!(
            args.targets,
            [PathBuf::from("/proc"), PathBuf::from("/media/USB DISK")]
        );

        let args = Args::try_parse_from(["mntfinder"]).unwrap();
        assert!(args.targets.is_empty());
    }

    #[test]
    fn double_dash_allows_dash_paths() {
        let args = Args::try_parse_from(["mntfinder", "--", "--help"]).unwrap();
        assert_eq!(args.targets, [PathBuf::from("--help")]);
    }
}
