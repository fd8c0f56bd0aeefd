//! The Shallow Scanner.
//!
//! Walks the workspace, classifies every directory containing a `src` child
//! as a project, and rejects nested projects.

use crate::{
    model::{Descriptor, Project},
    problems::{Problem, ProblemsLog},
    utils,
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

const CLASS_EXTENSIONS: &[&str] = &["as", "mxml", "fxg"];

/// Walks `workspace_root` and returns the catalog of discovered projects, in
/// depth-first discovery order.
pub fn scan_workspace(workspace_root: &Path, problems: &mut ProblemsLog) -> Vec<Project> {
    let mut projects = Vec::new();
    let mut walker = WalkDir::new(workspace_root).sort_by_file_name().into_iter();

    while let Some(entry) = walker.next() {
        let Ok(entry) = entry else { continue };
        if !entry.file_type().is_dir() {
            continue;
        }
        let dir = entry.path();
        let src = dir.join("src");
        if !src.is_dir() {
            continue;
        }

        match first_nested_src(&src) {
            Some(inner) => {
                problems.push(Problem::NestedProject { outer: dir.to_path_buf(), inner });
                // Candidate rejected: do not descend further into it.
                walker.skip_current_dir();
            }
            None => {
                projects.push(build_project(dir, &src));
                // A directory being a project does not prevent recursion
                // into its children.
            }
        }
    }

    projects
}

/// Returns the path of the first directory under `src` that itself contains
/// a `src` child, if any.
fn first_nested_src(src: &Path) -> Option<PathBuf> {
    WalkDir::new(src)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir() && e.path() != src)
        .find(|e| e.path().join("src").is_dir())
        .map(|e| e.path().to_path_buf())
}

fn build_project(home: &Path, src: &Path) -> Project {
    let mut class_files = Vec::new();
    let mut asset_files = Vec::new();
    let mut xml_files: Vec<(String, PathBuf)> = Vec::new();
    walk_src(src, &mut class_files, &mut asset_files, &mut xml_files);
    class_files.sort();
    asset_files.sort();

    let code_timestamp = class_files
        .iter()
        .map(|rel| utils::max_mtime_ctime_millis(&src.join(rel)))
        .max()
        .unwrap_or(0);

    let bin_dir = home.join("bin");
    let (binary_timestamp, has_app_binary, has_binaries) = scan_bin_dir(&bin_dir);

    let lib_dir = home.join("lib");
    let has_lib_dir = dir_contains_extension(&lib_dir, "swc");

    let descriptors = build_descriptors(&class_files, &xml_files);

    let is_dirty = code_timestamp > binary_timestamp;
    let is_app_probability = !descriptors.is_empty() || has_app_binary;

    let name = home
        .file_name()
        .map(|n| utils::sanitize_project_name(&n.to_string_lossy()))
        .unwrap_or_default();

    Project {
        home: home.to_path_buf(),
        name,
        class_files,
        asset_files,
        has_lib_dir,
        has_binaries,
        has_app_binary,
        descriptors,
        code_timestamp,
        binary_timestamp,
        is_dirty,
        is_app_probability,
    }
}

fn walk_src(
    src_root: &Path,
    class_files: &mut Vec<String>,
    asset_files: &mut Vec<String>,
    xml_files: &mut Vec<(String, PathBuf)>,
) {
    for entry in WalkDir::new(src_root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let rel = utils::relative_forward_slash(path, src_root);
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
        if CLASS_EXTENSIONS.contains(&ext.as_str()) {
            class_files.push(rel);
        } else {
            if ext == "xml" {
                xml_files.push((rel.clone(), path.to_path_buf()));
            }
            asset_files.push(rel);
        }
    }
}

/// Scans `bin` non-recursively for `.swf`/`.swc` files, returning
/// `(binary_timestamp, has_app_binary, has_any_binary)`.
fn scan_bin_dir(bin_dir: &Path) -> (u64, bool, bool) {
    let mut max_ts = 0u64;
    let mut has_app = false;
    let mut has_any = false;
    for entry in WalkDir::new(bin_dir).min_depth(1).max_depth(1).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
        if ext == "swf" || ext == "swc" {
            has_any = true;
            has_app |= ext == "swf";
            max_ts = max_ts.max(utils::max_mtime_ctime_millis(path));
        }
    }
    (max_ts, has_app, has_any)
}

fn dir_contains_extension(dir: &Path, ext: &str) -> bool {
    WalkDir::new(dir).min_depth(1).max_depth(1).into_iter().filter_map(Result::ok).any(|e| {
        e.file_type().is_file()
            && e.path().extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case(ext)).unwrap_or(false)
    })
}

/// Retains descriptors whose `<name>` matches some class file's basename.
fn build_descriptors(class_files: &[String], xml_files: &[(String, PathBuf)]) -> Vec<Descriptor> {
    let mut descriptors = Vec::new();
    for (rel, abs) in xml_files {
        let filename = Path::new(rel).file_name().and_then(|f| f.to_str()).unwrap_or(rel);
        let Some(name) = filename.strip_suffix("-app.xml") else { continue };

        let matches_some_class = class_files.iter().any(|cf| {
            Path::new(cf).file_stem().and_then(|s| s.to_str()) == Some(name)
        });
        if !matches_some_class {
            continue;
        }

        let Some(related) = class_files.iter().find(|cf| cf.starts_with(name)) else { continue };
        let related_class_package = infer_package_from_relative_path(related);

        descriptors.push(Descriptor {
            simple_name: name.to_string(),
            filename: filename.to_string(),
            path: abs.clone(),
            related_class_file: related.clone(),
            related_class_package,
        });
    }
    descriptors
}

/// Infers a dotted package from a forward-slash relative class path,
/// e.g. `a/b/MyApp.as` -> `Some("a.b")`, `MyApp.as` -> `None`.
pub fn infer_package_from_relative_path(relative: &str) -> Option<String> {
    let dir = Path::new(relative).parent()?;
    let dotted = utils::to_forward_slash(dir).replace('/', ".");
    if dotted.is_empty() {
        None
    } else {
        Some(dotted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn discovers_single_library() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("libA/src/a/A.as"));

        let mut problems = ProblemsLog::new();
        let projects = scan_workspace(dir.path(), &mut problems);

        assert_eq!(projects.len(), 1);
        assert!(problems.is_empty());
        let p = &projects[0];
        assert_eq!(p.name, "libA");
        assert_eq!(p.class_files, vec!["a/A.as".to_string()]);
        assert!(!p.is_app_probability);
    }

    #[test]
    fn rejects_nested_project() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("outer/src/Main.as"));
        touch(&dir.path().join("outer/src/nested/src/Nested.as"));

        let mut problems = ProblemsLog::new();
        let projects = scan_workspace(dir.path(), &mut problems);

        assert!(projects.is_empty());
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn detects_descriptor_and_app_probability() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("app/src/m/M.as"));
        touch(&dir.path().join("app/src/m-app.xml"));

        let mut problems = ProblemsLog::new();
        let projects = scan_workspace(dir.path(), &mut problems);

        let p = &projects[0];
        assert!(p.is_app_probability);
        assert_eq!(p.descriptors.len(), 1);
        assert_eq!(p.descriptors[0].related_class_file, "m/M.as");
        assert_eq!(p.descriptors[0].related_class_package, Some("m".to_string()));
    }
}
