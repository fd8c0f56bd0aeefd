//! Cache-directory I/O.
//!
//! Reads and writes the four JSON cache artifacts (`projects.json`,
//! `classes.json`, `deps.json`, `tasks.json`) plus `problems.log`, wrapping
//! the generic [`crate::utils::read_json_file`]/[`crate::utils::write_json_file`]
//! helpers with cache-specific path and shape conventions.

use crate::{
    error::Result,
    model::{AnalyzedClass, BuildTask, Coupling, Project, ProjectDependencyNode},
    utils,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resolves the four cache-artifact paths and `problems.log` under one
/// cache directory.
#[derive(Clone, Debug)]
pub struct CachePaths {
    root: PathBuf,
}

impl CachePaths {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self { root: cache_dir.into() }
    }

    pub fn projects(&self) -> PathBuf {
        self.root.join("projects.json")
    }

    pub fn classes(&self) -> PathBuf {
        self.root.join("classes.json")
    }

    pub fn deps(&self) -> PathBuf {
        self.root.join("deps.json")
    }

    pub fn tasks(&self) -> PathBuf {
        self.root.join("tasks.json")
    }

    pub fn problems_log(&self) -> PathBuf {
        self.root.join("problems.log")
    }
}

pub fn write_projects(paths: &CachePaths, projects: &[Project]) -> Result<()> {
    utils::write_json_file(projects, &paths.projects())
}

pub fn read_projects(paths: &CachePaths) -> Result<Vec<Project>> {
    utils::read_json_file(&paths.projects())
}

/// `classes.json`'s wire shape splits [`AnalyzedClass::couplings`] out into
/// a sibling `class_couplings` key, rather than nesting it.
#[derive(Serialize, Deserialize)]
struct ClassRecord {
    analyzed_class: AnalyzedClassCore,
    class_couplings: Vec<Coupling>,
}

#[derive(Serialize, Deserialize)]
struct AnalyzedClassCore {
    file: PathBuf,
    class_name: String,
    package: Option<String>,
    expected_relative_path: String,
    path_matches_package: bool,
    owning_project: PathBuf,
}

impl From<&AnalyzedClass> for ClassRecord {
    fn from(c: &AnalyzedClass) -> Self {
        Self {
            analyzed_class: AnalyzedClassCore {
                file: c.file.clone(),
                class_name: c.class_name.clone(),
                package: c.package.clone(),
                expected_relative_path: c.expected_relative_path.clone(),
                path_matches_package: c.path_matches_package,
                owning_project: c.owning_project.clone(),
            },
            class_couplings: c.couplings.clone(),
        }
    }
}

impl From<ClassRecord> for AnalyzedClass {
    fn from(r: ClassRecord) -> Self {
        Self {
            file: r.analyzed_class.file,
            class_name: r.analyzed_class.class_name,
            package: r.analyzed_class.package,
            expected_relative_path: r.analyzed_class.expected_relative_path,
            path_matches_package: r.analyzed_class.path_matches_package,
            owning_project: r.analyzed_class.owning_project,
            couplings: r.class_couplings,
        }
    }
}

pub fn write_classes(paths: &CachePaths, classes: &[AnalyzedClass]) -> Result<()> {
    let records: Vec<ClassRecord> = classes.iter().map(ClassRecord::from).collect();
    utils::write_json_file(&records, &paths.classes())
}

pub fn read_classes(paths: &CachePaths) -> Result<Vec<AnalyzedClass>> {
    let records: Vec<ClassRecord> = utils::read_json_file(&paths.classes())?;
    Ok(records.into_iter().map(AnalyzedClass::from).collect())
}

pub fn write_deps(paths: &CachePaths, deps: &[ProjectDependencyNode]) -> Result<()> {
    utils::write_json_file(deps, &paths.deps())
}

pub fn read_deps(paths: &CachePaths) -> Result<Vec<ProjectDependencyNode>> {
    utils::read_json_file(&paths.deps())
}

pub fn write_tasks(paths: &CachePaths, tasks: &[BuildTask]) -> Result<()> {
    utils::write_json_file(tasks, &paths.tasks())
}

pub fn read_tasks(paths: &CachePaths) -> Result<Vec<BuildTask>> {
    utils::read_json_file(&paths.tasks())
}

/// Truncates `problems.log` so the run starts from a fresh diagnostic
/// surface.
pub fn truncate_problems_log(paths: &CachePaths) -> Result<()> {
    utils::create_parent_dir_all(&paths.problems_log())?;
    std::fs::write(paths.problems_log(), b"").map_err(|e| crate::error::Error::io(e, &paths.problems_log()))
}

pub fn problems_log_path(paths: &CachePaths) -> PathBuf {
    paths.problems_log()
}
