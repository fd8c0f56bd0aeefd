//! The Manual-Dependency Patcher.
//!
//! Injects synthetic `patch`-kind couplings into the class catalog so the
//! Dependency Builder picks up caller-asserted dependencies the Deep Scanner
//! couldn't see (e.g. reflection-based instantiation). Invalid projects or
//! dependencies are skipped with a logged problem rather than aborting, the
//! same way [`crate::resolver::resolve_couplings`] handles unresolved
//! couplings.

use crate::{
    config::ManualDependency,
    model::{AnalyzedClass, Coupling, CouplingKind, Project},
    problems::{Problem, ProblemsLog},
};
use std::path::Path;

/// Applies `manual_dependencies` to `classes` in place.
pub fn apply(
    classes: &mut [AnalyzedClass],
    projects: &[Project],
    manual_dependencies: &[ManualDependency],
    problems: &mut ProblemsLog,
) {
    for record in manual_dependencies {
        let Some(_) = find_project(projects, &record.project) else {
            problems.push(Problem::InvalidManualDependency {
                project: record.project.clone(),
                dependency: record.project.clone(),
            });
            continue;
        };

        let Some(first_class_index) = first_class_index_for(classes, &record.project) else {
            problems.push(Problem::InvalidManualDependency {
                project: record.project.clone(),
                dependency: record.project.clone(),
            });
            continue;
        };

        for dependency in &record.dependencies {
            let Some(dep_project) = find_project(projects, dependency) else {
                problems.push(Problem::InvalidManualDependency {
                    project: record.project.clone(),
                    dependency: dependency.clone(),
                });
                continue;
            };

            let Some(dep_class_index) = first_class_index_for(classes, &dep_project.home) else {
                problems.push(Problem::InvalidManualDependency {
                    project: record.project.clone(),
                    dependency: dependency.clone(),
                });
                continue;
            };

            let dep_class_file = classes[dep_class_index].file.clone();
            let dep_class_name = classes[dep_class_index].class_name.clone();
            let dep_package = classes[dep_class_index].package.clone();

            let coupling = Coupling {
                referenced_class: dep_class_name,
                referenced_package: dep_package,
                expected_relative_path: classes[dep_class_index].expected_relative_path.clone(),
                kind: CouplingKind::Patch,
                matching_project: Some(dep_project.home.clone()),
                expected_class_file: Some(dep_class_file),
                class_exists: true,
            };

            let target = &mut classes[first_class_index];
            let already_present = target.couplings.iter().any(|c| {
                c.matching_project == coupling.matching_project
                    && c.expected_class_file == coupling.expected_class_file
                    && c.kind == coupling.kind
            });
            if !already_present {
                target.couplings.insert(0, coupling);
            }
        }
    }
}

fn find_project<'a>(projects: &'a [Project], home: &Path) -> Option<&'a Project> {
    if !home.is_dir() {
        return None;
    }
    projects.iter().find(|p| p.home == home)
}

fn first_class_index_for(classes: &[AnalyzedClass], project_home: &Path) -> Option<usize> {
    classes.iter().position(|c| c.owning_project == project_home)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{problems::ProblemsLog, resolver, scanner::scan_workspace};
    use std::fs;
    use tempfile::tempdir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn injects_synthetic_patch_coupling() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("app/src/M.as"), "package {\n  class M {\n  }\n}\n");
        write(&dir.path().join("libA/src/a/A.as"), "package a {\n  class A {\n  }\n}\n");

        let mut problems = ProblemsLog::new();
        let projects = scan_workspace(dir.path(), &mut problems);
        let mut classes = resolver::analyze(&projects, &mut problems);

        let app_home = dir.path().join("app");
        let lib_home = dir.path().join("libA");
        let manual =
            vec![ManualDependency { project: app_home.clone(), dependencies: vec![lib_home.clone()] }];
        apply(&mut classes, &projects, &manual, &mut problems);

        let m = classes.iter().find(|c| c.owning_project == app_home).unwrap();
        assert_eq!(m.couplings.len(), 1);
        assert_eq!(m.couplings[0].kind, CouplingKind::Patch);
        assert_eq!(m.couplings[0].matching_project, Some(lib_home));
    }

    #[test]
    fn is_idempotent_on_reapplication() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("app/src/M.as"), "package {\n  class M {\n  }\n}\n");
        write(&dir.path().join("libA/src/a/A.as"), "package a {\n  class A {\n  }\n}\n");

        let mut problems = ProblemsLog::new();
        let projects = scan_workspace(dir.path(), &mut problems);
        let mut classes = resolver::analyze(&projects, &mut problems);

        let manual = vec![ManualDependency {
            project: dir.path().join("app"),
            dependencies: vec![dir.path().join("libA")],
        }];
        apply(&mut classes, &projects, &manual, &mut problems);
        apply(&mut classes, &projects, &manual, &mut problems);

        let m = classes.iter().find(|c| c.owning_project == dir.path().join("app")).unwrap();
        assert_eq!(m.couplings.len(), 1);
    }
}
