//! The Deep Scanner.
//!
//! Extracts declared package/class and outgoing couplings from each class
//! file via static regexes, then resolves each coupling against the project
//! catalog one file at a time.

use crate::{
    model::{AnalyzedClass, Coupling, CouplingKind, Project},
    problems::{Problem, ProblemsLog},
    scanner,
    utils,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{fs, path::Path};

static RE_PACKAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"package\s+([A-Za-z_][\w.]*)?\s*\{").unwrap());
static RE_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bclass\s+([A-Za-z_]\w*)").unwrap());
static RE_IMPORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"import\s+([A-Za-z_][\w.]*)\s*;").unwrap());
static RE_FQN_NEW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"new\s+([A-Za-z_]\w*(?:\.[A-Za-z_]\w*)+)\s*\(").unwrap());

/// Analyzes every class file across `projects`, resolving couplings against
/// the full catalog. Output preserves project-catalog order, then
/// per-project class-file order.
pub fn analyze(projects: &[Project], problems: &mut ProblemsLog) -> Vec<AnalyzedClass> {
    let mut classes = Vec::new();
    for project in projects {
        for relative in &project.class_files {
            let absolute = project.class_file_absolute(relative);
            match analyze_class_file(project, relative, &absolute, problems) {
                Some(mut class) => {
                    resolve_couplings(&mut class, projects);
                    for coupling in &class.couplings {
                        if !coupling.class_exists {
                            problems.push(Problem::UnresolvedCoupling {
                                referenced: coupling.referenced_class.clone(),
                                file: class.file.clone(),
                            });
                        }
                    }
                    classes.push(class);
                }
                None => problems.push(Problem::ParseFailure {
                    file: absolute,
                    cause: "could not read source".to_string(),
                }),
            }
        }
    }
    classes
}

fn analyze_class_file(
    project: &Project,
    relative: &str,
    absolute: &Path,
    problems: &mut ProblemsLog,
) -> Option<AnalyzedClass> {
    let ext = Path::new(relative).extension().and_then(|e| e.to_str()).unwrap_or("");
    let inferred_package = scanner::infer_package_from_relative_path(relative);

    if ext == "mxml" || ext == "fxg" {
        let class_name = Path::new(relative).file_stem().and_then(|s| s.to_str())?.to_string();
        let expected_relative_path = expected_self_path(inferred_package.as_deref(), &class_name, ext);
        return Some(AnalyzedClass {
            file: absolute.to_path_buf(),
            class_name,
            package: inferred_package,
            expected_relative_path,
            path_matches_package: true,
            owning_project: project.home.clone(),
            couplings: Vec::new(),
        });
    }

    let content = fs::read_to_string(absolute).ok()?;

    let declared_package = RE_PACKAGE
        .captures(&content)
        .map(|c| c.get(1).map(|m| m.as_str().to_string()).unwrap_or_default())
        .filter(|p| !p.is_empty());
    let class_name = RE_CLASS.captures(&content)?.get(1)?.as_str().to_string();

    let path_matches_package = declared_package == inferred_package;
    if !path_matches_package {
        problems.push(Problem::PackageMismatch {
            file: absolute.to_path_buf(),
            declared: declared_package.clone(),
            inferred: inferred_package.clone(),
        });
    }

    let expected_relative_path = expected_path(declared_package.as_deref(), &class_name);

    let mut couplings = Vec::new();
    for m in RE_IMPORT.captures_iter(&content) {
        let dotted = m.get(1).unwrap().as_str();
        couplings.push(build_coupling(dotted, CouplingKind::Import));
    }
    for m in RE_FQN_NEW.captures_iter(&content) {
        let dotted = m.get(1).unwrap().as_str();
        couplings.push(build_coupling(dotted, CouplingKind::FqnInstantiation));
    }

    Some(AnalyzedClass {
        file: absolute.to_path_buf(),
        class_name,
        package: declared_package,
        expected_relative_path,
        path_matches_package,
        owning_project: project.home.clone(),
        couplings,
    })
}

fn build_coupling(dotted: &str, kind: CouplingKind) -> Coupling {
    let (package, class) = match dotted.rsplit_once('.') {
        Some((pkg, cls)) => (Some(pkg.to_string()), cls.to_string()),
        None => (None, dotted.to_string()),
    };
    let expected_relative_path = expected_path(package.as_deref(), &class);
    Coupling::unresolved(class, package, expected_relative_path, kind)
}

/// The path a class file is expected to live at given its package, always
/// `.as`-suffixed: imports and `new`-instantiations only ever target `.as`
/// classes.
fn expected_path(package: Option<&str>, class: &str) -> String {
    expected_self_path(package, class, "as")
}

/// Like [`expected_path`], but for a class's own self-referential path,
/// where the extension must match the file actually on disk (`.mxml`,
/// `.fxg`, or `.as`).
fn expected_self_path(package: Option<&str>, class: &str, ext: &str) -> String {
    match package {
        Some(pkg) if !pkg.is_empty() => format!("{}/{class}.{ext}", pkg.replace('.', "/")),
        _ => format!("{class}.{ext}"),
    }
}

/// Resolves each of `class`'s couplings against `projects`, first match
/// wins, iterating in catalog order.
fn resolve_couplings(class: &mut AnalyzedClass, projects: &[Project]) {
    for coupling in &mut class.couplings {
        for project in projects {
            let Some(relative) = project
                .class_files
                .iter()
                .find(|cf| cf.ends_with(coupling.expected_relative_path.as_str()))
            else {
                continue;
            };
            let absolute = project.class_file_absolute(relative);
            if absolute.is_file() {
                coupling.matching_project = Some(project.home.clone());
                coupling.expected_class_file = Some(absolute);
                coupling.class_exists = true;
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{problems::ProblemsLog, scanner::scan_workspace};
    use std::fs;
    use tempfile::tempdir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn resolves_import_to_matching_project() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("libA/src/a/A.as"), "package a {\n  class A {\n  }\n}\n");
        write(
            &dir.path().join("app/src/M.as"),
            "package {\n  class M {\n    import a.A;\n    function f():void { new a.A(); }\n  }\n}\n",
        );

        let mut problems = ProblemsLog::new();
        let projects = scan_workspace(dir.path(), &mut problems);
        let classes = analyze(&projects, &mut problems);

        let m = classes.iter().find(|c| c.class_name == "M").unwrap();
        assert_eq!(m.couplings.len(), 2);
        assert!(m.couplings.iter().all(|c| c.class_exists));
    }

    #[test]
    fn records_unresolved_coupling() {
        let dir = tempdir().unwrap();
        write(
            &dir.path().join("app/src/M.as"),
            "package {\n  class M {\n    import missing.Thing;\n  }\n}\n",
        );

        let mut problems = ProblemsLog::new();
        let projects = scan_workspace(dir.path(), &mut problems);
        let classes = analyze(&projects, &mut problems);

        let m = &classes[0];
        assert!(!m.couplings[0].class_exists);
    }

    #[test]
    fn mxml_class_keeps_its_own_extension_in_expected_path() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("app/src/ui/Panel.mxml"), "<s:Group/>");

        let mut problems = ProblemsLog::new();
        let projects = scan_workspace(dir.path(), &mut problems);
        let classes = analyze(&projects, &mut problems);

        let panel = &classes[0];
        assert_eq!(panel.expected_relative_path, "ui/Panel.mxml");
    }

    #[test]
    fn path_matching_declared_package_has_no_mismatch() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("libA/src/a/A.as"), "package a {\n  class A {\n  }\n}\n");

        let mut problems = ProblemsLog::new();
        let projects = scan_workspace(dir.path(), &mut problems);
        let classes = analyze(&projects, &mut problems);

        let a = &classes[0];
        assert_eq!(a.package, Some("a".to_string()));
        assert!(a.path_matches_package);
        assert!(problems.is_empty());
    }

    #[test]
    fn detects_package_mismatch() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("libA/src/a/A.as"), "package wrong {\n  class A {\n  }\n}\n");

        let mut problems = ProblemsLog::new();
        let projects = scan_workspace(dir.path(), &mut problems);
        let _ = analyze(&projects, &mut problems);

        assert!(problems.iter().any(|p| matches!(p, Problem::PackageMismatch { .. })));
    }
}
