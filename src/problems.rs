//! The run's diagnostic surface.
//!
//! Every recoverable condition a stage can hit — a nested project, a parse
//! failure, an unresolved coupling, a path/package mismatch, a cycle, an
//! emit failure — is recorded here rather than aborting the run. Each
//! [`Problem`] is both logged via `tracing::warn!` and accumulated for
//! persistence to `problems.log`.

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq)]
pub enum Problem {
    NestedProject { outer: PathBuf, inner: PathBuf },
    ParseFailure { file: PathBuf, cause: String },
    UnresolvedCoupling { referenced: String, file: PathBuf },
    PackageMismatch { file: PathBuf, declared: Option<String>, inferred: Option<String> },
    Cycle { project: PathBuf, involving: PathBuf },
    MissingDependencyNode { from: PathBuf, missing: PathBuf },
    InvalidManualDependency { project: PathBuf, dependency: PathBuf },
    EmitFailure { project: PathBuf, target: PathBuf, cause: String },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NestedProject { outer, inner } => write!(
                f,
                "Nested project rejected: {} contains a further project root at {}",
                outer.display(),
                inner.display()
            ),
            Self::ParseFailure { file, cause } => {
                write!(f, "Parse failure in {}: {cause}", file.display())
            }
            Self::UnresolvedCoupling { referenced, file } => write!(
                f,
                "Unresolved dependency: {referenced} referenced from {}",
                file.display()
            ),
            Self::PackageMismatch { file, declared, inferred } => write!(
                f,
                "Package/path mismatch in {}: declared {:?}, directory implies {:?}",
                file.display(),
                declared,
                inferred
            ),
            Self::Cycle { project, involving } => write!(
                f,
                "Cycle in dependency graph: {} reaches back to {}",
                involving.display(),
                project.display()
            ),
            Self::MissingDependencyNode { from, missing } => write!(
                f,
                "{} depends on {} which has no graph node",
                from.display(),
                missing.display()
            ),
            Self::InvalidManualDependency { project, dependency } => write!(
                f,
                "Manual dependency amendment skipped: {} -> {} does not resolve to known projects",
                project.display(),
                dependency.display()
            ),
            Self::EmitFailure { project, target, cause } => write!(
                f,
                "Failed to emit {} for project {}: {cause}",
                target.display(),
                project.display()
            ),
        }
    }
}

/// Accumulates [`Problem`]s for one pipeline run.
#[derive(Debug, Default)]
pub struct ProblemsLog {
    problems: Vec<Problem>,
}

impl ProblemsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, problem: Problem) {
        tracing::warn!("{problem}");
        self.problems.push(problem);
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter()
    }

    /// Renders every accumulated problem as blank-line-separated text, the
    /// format written to `problems.log`.
    pub fn render(&self) -> String {
        self.problems.iter().map(|p| p.to_string()).collect::<Vec<_>>().join("\n\n")
    }

    /// Appends the rendered problems to `path`. Callers wanting a fresh log
    /// per run must truncate `path` themselves beforehand.
    pub fn write_to(&self, path: &Path) -> crate::error::Result<()> {
        if self.problems.is_empty() {
            return Ok(());
        }
        crate::utils::append_text_entry(path, &self.render())
    }
}
