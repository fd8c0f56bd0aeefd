//! The Dirtiness Filter.
//!
//! Prunes each build-task list to transitively-dirty projects only, via a
//! memoized depth-first reachability probe that breaks cycles the same way
//! [`crate::planner`] does.

use crate::model::{BuildTask, Project, ProjectDependencyNode};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

/// Rewrites each task's `project_build_tasks` to retain only transitively
/// dirty entries, updating `num_tasks` accordingly.
pub fn filter(
    projects: &[Project],
    graph: &[ProjectDependencyNode],
    tasks: &[BuildTask],
) -> Vec<BuildTask> {
    let direct_dirty: HashMap<PathBuf, bool> =
        projects.iter().map(|p| (p.home.clone(), p.is_dirty)).collect();
    let index: HashMap<PathBuf, &ProjectDependencyNode> =
        graph.iter().map(|n| (n.project_path.clone(), n)).collect();

    let mut memo = HashMap::new();
    tasks
        .iter()
        .map(|task| {
            let retained: Vec<PathBuf> = task
                .project_build_tasks
                .iter()
                .filter(|p| is_transitively_dirty(p, &index, &direct_dirty, &mut memo).unwrap_or(false))
                .cloned()
                .collect();
            BuildTask::new(task.project_path.clone(), retained)
        })
        .collect()
}

/// Returns `None` for a project absent from the dependency graph.
fn is_transitively_dirty(
    path: &Path,
    index: &HashMap<PathBuf, &ProjectDependencyNode>,
    direct_dirty: &HashMap<PathBuf, bool>,
    memo: &mut HashMap<PathBuf, bool>,
) -> Option<bool> {
    let node = index.get(path)?;
    if let Some(&cached) = memo.get(path) {
        return Some(cached);
    }
    // Placeholder breaks cycles: a back-edge into an in-progress node reads
    // as "not yet known dirty" rather than recursing forever.
    memo.insert(path.to_path_buf(), false);

    let mut dirty = direct_dirty.get(path).copied().unwrap_or(false);
    if !dirty {
        for dep in &node.dependencies {
            if is_transitively_dirty(dep, index, direct_dirty, memo) == Some(true) {
                dirty = true;
                break;
            }
        }
    }
    memo.insert(path.to_path_buf(), dirty);
    Some(dirty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BuildTask, Project};

    fn project(path: &str, dirty: bool) -> Project {
        Project {
            home: PathBuf::from(path),
            name: path.trim_start_matches('/').to_string(),
            class_files: vec![],
            asset_files: vec![],
            has_lib_dir: false,
            has_binaries: false,
            has_app_binary: false,
            descriptors: vec![],
            code_timestamp: if dirty { 2 } else { 0 },
            binary_timestamp: if dirty { 1 } else { 1 },
            is_dirty: dirty,
            is_app_probability: false,
        }
    }

    fn node(path: &str, deps: &[&str]) -> ProjectDependencyNode {
        let mut n = ProjectDependencyNode::new(PathBuf::from(path));
        for d in deps {
            n.add_dependency(PathBuf::from(*d));
        }
        n
    }

    #[test]
    fn prunes_clean_dependency() {
        let projects = vec![project("/app", false), project("/libA", false)];
        let graph = vec![node("/app", &["/libA"]), node("/libA", &[])];
        let tasks = vec![BuildTask::new(
            PathBuf::from("/app"),
            vec![PathBuf::from("/libA"), PathBuf::from("/app")],
        )];

        let filtered = filter(&projects, &graph, &tasks);
        assert!(filtered[0].project_build_tasks.is_empty());
    }

    #[test]
    fn retains_transitively_dirty_dependency() {
        let projects = vec![project("/app", false), project("/libA", true)];
        let graph = vec![node("/app", &["/libA"]), node("/libA", &[])];
        let tasks = vec![BuildTask::new(
            PathBuf::from("/app"),
            vec![PathBuf::from("/libA"), PathBuf::from("/app")],
        )];

        let filtered = filter(&projects, &graph, &tasks);
        assert_eq!(filtered[0].project_build_tasks, vec![PathBuf::from("/libA")]);
    }
}
