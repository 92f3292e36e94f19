//! CLI entry point for the repo-local architecture lint.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

/// Check a layered crate against the architecture rules
#[derive(Parser, Debug)]
#[command(name = "architecture-lint")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Crate directory to lint (defaults to the user service)
    crate_dir: Option<PathBuf>,

    /// Name other code uses for the crate, e.g. its `[lib] name`
    #[arg(long, default_value = "user_service_lib")]
    crate_name: String,
}

const DEFAULT_CRATE: &str = "crates/services/user-service";

fn main() -> ExitCode {
    let cli = Cli::parse();

    let crate_dir = match cli.crate_dir {
        Some(dir) => dir,
        None => match repo_root() {
            Some(root) => root.join(DEFAULT_CRATE),
            None => {
                eprintln!(
                    "unable to locate workspace root (directory containing a workspace Cargo.toml)"
                );
                return ExitCode::FAILURE;
            }
        },
    };

    let rules = architecture_lint::layered_service_rules();
    match architecture_lint::lint_crate(&crate_dir, Some(&cli.crate_name), &rules) {
        Ok(()) => {
            println!("{}: {} architecture rules satisfied", crate_dir.display(), rules.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn repo_root() -> Option<PathBuf> {
    let from_cwd = std::env::current_dir().ok();
    let from_manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    from_cwd
        .as_deref()
        .and_then(find_workspace_root)
        .or_else(|| find_workspace_root(&from_manifest))
}

fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let manifest = dir.join("Cargo.toml");
        if manifest.is_file() && cargo_toml_declares_workspace(&manifest) {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

fn cargo_toml_declares_workspace(path: &Path) -> bool {
    fs::read_to_string(path)
        .ok()
        .is_some_and(|contents| contents.contains("[workspace]"))
}
