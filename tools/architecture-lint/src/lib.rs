//! Repo-local architecture lint for layered crates.
//!
//! The user service is organised as top-level modules per layer
//! (`controller`, `service`, `repository`, `domain`). This crate parses a
//! crate's sources with `syn`, builds the dependency graph between those
//! modules and evaluates declarative rules over it:
//!
//! - layer access constraints (who may depend on whom)
//! - forbidden dependencies between specific modules
//! - type naming conventions per module
//! - absence of dependency cycles between top-level modules
//!
//! Run it with `cargo run -p architecture-lint`; the user service's test
//! suite evaluates the same rules against its own sources.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod graph;
pub mod rules;

pub use graph::{ModuleGraph, SourceFile};
pub use rules::{layered_service_rules, ArchRule, Layer, LayeredArchitecture, RuleKind};

/// A single rule violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Description of the violated rule.
    pub rule: String,
    /// File path relative to the crate's `src/`.
    pub file: PathBuf,
    /// What was found.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug, Error)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    #[error("I/O error while linting architecture: {0}")]
    Io(#[from] io::Error),

    /// Rust source parsing failed.
    #[error("Failed to parse Rust source while linting architecture ({}): {message}", .file.display())]
    Parse { file: PathBuf, message: String },

    /// One or more rules were violated.
    #[error("{}", render_violations(.0))]
    Violations(Vec<Violation>),
}

fn render_violations(violations: &[Violation]) -> String {
    let mut out = String::from("Architecture rule violations:\n");
    let mut current_rule: Option<&str> = None;
    for violation in violations {
        if current_rule != Some(violation.rule.as_str()) {
            out.push_str(&format!("Rule: {}\n", violation.rule));
            current_rule = Some(violation.rule.as_str());
        }
        out.push_str(&format!("- {violation}\n"));
    }
    out
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to the crate's `src/`.
    pub file: PathBuf,
    pub contents: String,
}

/// Outcome of evaluating a set of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationResult {
    pub violations: Vec<Violation>,
}

impl EvaluationResult {
    pub fn has_violation(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn into_result(self) -> Result<(), ArchitectureLintError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ArchitectureLintError::Violations(self.violations))
        }
    }
}

/// Evaluate every rule against the graph, collecting all violations.
pub fn evaluate(rules: &[ArchRule], graph: &ModuleGraph) -> EvaluationResult {
    EvaluationResult {
        violations: rules.iter().flat_map(|rule| rule.evaluate(graph)).collect(),
    }
}

/// Evaluate rules against in-memory sources. Intended for unit and behaviour tests.
pub fn lint_sources(
    sources: &[LintSource],
    crate_alias: Option<&str>,
    rules: &[ArchRule],
) -> Result<(), ArchitectureLintError> {
    let graph = ModuleGraph::from_sources(sources, crate_alias)?;
    evaluate(rules, &graph).into_result()
}

/// Load the module graph of the crate rooted at `crate_dir`.
pub fn load_crate(
    crate_dir: &Path,
    crate_alias: Option<&str>,
) -> Result<ModuleGraph, ArchitectureLintError> {
    let sources = collect_sources(&crate_dir.join("src"))?;
    ModuleGraph::from_sources(&sources, crate_alias)
}

/// Lint the crate sources on disk.
///
/// `crate_dir` is the directory holding the crate's `Cargo.toml`.
pub fn lint_crate(
    crate_dir: &Path,
    crate_alias: Option<&str>,
    rules: &[ArchRule],
) -> Result<(), ArchitectureLintError> {
    let graph = load_crate(crate_dir, crate_alias)?;
    evaluate(rules, &graph).into_result()
}

/// Read every `.rs` file under `src_dir`, sorted by path.
pub fn collect_sources(src_dir: &Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut sources = Vec::new();
    collect_sources_under(src_dir, src_dir, &mut sources)?;
    sources.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(sources)
}

fn collect_sources_under(
    src_root: &Path,
    current: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in fs::read_dir(current)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_sources_under(src_root, &path, sources)?;
            continue;
        }

        if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
            continue;
        }

        let relative = path
            .strip_prefix(src_root)
            .map_err(|err| ArchitectureLintError::Parse {
                file: path.clone(),
                message: err.to_string(),
            })?
            .to_path_buf();
        let contents = fs::read_to_string(&path)?;
        sources.push(LintSource {
            file: relative,
            contents,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests;
