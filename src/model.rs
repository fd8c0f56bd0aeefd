//! The data model shared by every stage of the pipeline.
//!
//! All cache artifacts are plain `serde`-derived structs so each stage can be
//! tested in isolation by constructing or asserting on these types directly,
//! independent of any filesystem or compiler invocation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A discovered project, as produced by the Shallow Scanner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Absolute path to the project's root directory (parent of `src`).
    pub home: PathBuf,
    /// Sanitized base name of `home`, see [`crate::utils::sanitize_project_name`].
    pub name: String,
    /// Class-file paths, relative to `home/src`, forward-slash separated.
    pub class_files: Vec<String>,
    /// Asset-file paths (non class-like files under `src`), same convention.
    pub asset_files: Vec<String>,
    pub has_lib_dir: bool,
    pub has_binaries: bool,
    pub has_app_binary: bool,
    pub descriptors: Vec<Descriptor>,
    /// Max `mtime`/`ctime` in milliseconds across all class files, 0 if none.
    pub code_timestamp: u64,
    /// Max `mtime`/`ctime` in milliseconds across `bin/*.swf|*.swc`, 0 if none.
    pub binary_timestamp: u64,
    pub is_dirty: bool,
    /// `true` if this project is an application, `false` if a library.
    pub is_app_probability: bool,
}

impl Project {
    pub fn class_file_absolute(&self, relative: &str) -> PathBuf {
        self.home.join("src").join(relative)
    }
}

/// An application-descriptor file retained for a project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// `<name>` in `<name>-app.xml`.
    pub simple_name: String,
    /// `<name>-app.xml`.
    pub filename: String,
    pub path: PathBuf,
    /// Relative path (forward-slash, relative to `src`) of the related class.
    pub related_class_file: String,
    /// Dotted package of the related class, `None` for the default package.
    pub related_class_package: Option<String>,
}

impl Descriptor {
    /// Simple class name of the related class (basename, no extension).
    pub fn related_class_name(&self) -> &str {
        Path::new(&self.related_class_file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.related_class_file)
    }
}

/// One class file as analyzed by the Deep Scanner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedClass {
    pub file: PathBuf,
    pub class_name: String,
    pub package: Option<String>,
    /// `<package-as-path>/<class>.<ext>`, forward-slash separated.
    pub expected_relative_path: String,
    pub path_matches_package: bool,
    /// Home path of the owning [`Project`].
    pub owning_project: PathBuf,
    pub couplings: Vec<Coupling>,
}

impl AnalyzedClass {
    pub fn fully_qualified_name(&self) -> String {
        match &self.package {
            Some(pkg) if !pkg.is_empty() => format!("{pkg}.{}", self.class_name),
            _ => self.class_name.clone(),
        }
    }
}

/// A directed reference from one class to another.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coupling {
    pub referenced_class: String,
    pub referenced_package: Option<String>,
    /// `<package-as-path>/<class>.as`, forward-slash separated.
    pub expected_relative_path: String,
    pub kind: CouplingKind,
    pub matching_project: Option<PathBuf>,
    pub expected_class_file: Option<PathBuf>,
    pub class_exists: bool,
}

impl Coupling {
    pub fn unresolved(
        referenced_class: String,
        referenced_package: Option<String>,
        expected_relative_path: String,
        kind: CouplingKind,
    ) -> Self {
        Self {
            referenced_class,
            referenced_package,
            expected_relative_path,
            kind,
            matching_project: None,
            expected_class_file: None,
            class_exists: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouplingKind {
    Import,
    FqnInstantiation,
    Patch,
}

/// A project in the project dependency graph, post Dependency Builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectDependencyNode {
    pub project_path: PathBuf,
    /// Insertion-ordered, unique, excludes `project_path` itself.
    pub dependencies: Vec<PathBuf>,
    pub num_dependencies: usize,
    pub root_classes: Vec<String>,
}

impl ProjectDependencyNode {
    pub fn new(project_path: PathBuf) -> Self {
        Self { project_path, dependencies: Vec::new(), num_dependencies: 0, root_classes: Vec::new() }
    }

    /// Adds `dep` to the dependency set if not already present and not self.
    pub fn add_dependency(&mut self, dep: PathBuf) {
        if dep != self.project_path && !self.dependencies.contains(&dep) {
            self.dependencies.push(dep);
            self.num_dependencies = self.dependencies.len();
        }
    }
}

/// A project's transitive, topologically-ordered build list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildTask {
    pub project_path: PathBuf,
    /// Topological order over the reachable subgraph; `project_path` is last.
    pub project_build_tasks: Vec<PathBuf>,
    pub num_tasks: usize,
}

impl BuildTask {
    pub fn new(project_path: PathBuf, project_build_tasks: Vec<PathBuf>) -> Self {
        let num_tasks = project_build_tasks.len();
        Self { project_path, project_build_tasks, num_tasks }
    }
}
