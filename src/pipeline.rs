//! Pipeline orchestration.
//!
//! Runs the eight stages in order, persisting cache artifacts after each so
//! a run can be resumed or inspected between stages, and returns a summary
//! report.

use crate::{
    cache::{self, CachePaths},
    config::WorkspaceConfig,
    depgraph, dirty,
    emit::{asconfig, editor},
    error::Result,
    patcher, planner,
    problems::ProblemsLog,
    resolver, scanner, utils,
};
use std::collections::HashMap;

/// Summary of one [`crate::Workspace::generate`] run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerateReport {
    pub project_count: usize,
    pub class_count: usize,
    pub dependency_edge_count: usize,
    pub problem_count: usize,
    pub emitted_asconfig_count: usize,
    pub emitted_editor_file_count: usize,
}

#[tracing::instrument(skip_all, fields(workspace = %config.workspace_dir.display()))]
pub fn generate(config: &WorkspaceConfig) -> Result<GenerateReport> {
    let paths = CachePaths::new(&config.cache_dir);
    cache::truncate_problems_log(&paths)?;
    let mut problems = ProblemsLog::new();

    let workspace_dir = utils::canonicalize(&config.workspace_dir)?;

    tracing::info!("scanning workspace");
    let projects = scanner::scan_workspace(&workspace_dir, &mut problems);
    cache::write_projects(&paths, &projects)?;
    tracing::info!(count = projects.len(), "discovered projects");

    tracing::info!("analyzing class couplings");
    let mut classes = resolver::analyze(&projects, &mut problems);
    patcher::apply(&mut classes, &projects, &config.manual_dependencies, &mut problems);
    cache::write_classes(&paths, &classes)?;

    tracing::info!("building dependency graph");
    let graph = depgraph::build(&projects, &classes);
    cache::write_deps(&paths, &graph)?;

    tracing::info!("planning build tasks");
    let raw_tasks = planner::plan(&graph, &mut problems);
    let tasks = if config.rebuild_all {
        raw_tasks.clone()
    } else {
        dirty::filter(&projects, &graph, &raw_tasks)
    };
    cache::write_tasks(&paths, &tasks)?;

    let node_by_path: HashMap<_, _> =
        graph.iter().map(|n| (n.project_path.clone(), n)).collect();
    let raw_task_by_path: HashMap<_, _> =
        raw_tasks.iter().map(|t| (t.project_path.clone(), t)).collect();
    let task_by_path: HashMap<_, _> = tasks.iter().map(|t| (t.project_path.clone(), t)).collect();

    tracing::info!("emitting asconfig.json per project");
    let mut emitted_asconfig_count = 0;
    for project in &projects {
        asconfig::emit(project, node_by_path.get(&project.home).copied(), config, &mut problems)?;
        emitted_asconfig_count += 1;
    }

    // Editor configs require an SDK path; a caller that omits it has opted
    // out of emitting them entirely.
    let mut emitted_editor_file_count = 0;
    if config.sdk_dir.is_some() {
        tracing::info!("emitting .vscode configuration per project");
        for project in &projects {
            editor::emit_settings(project, config)?;
            emitted_editor_file_count += 1;
            if let (Some(raw), Some(filtered)) =
                (raw_task_by_path.get(&project.home), task_by_path.get(&project.home))
            {
                editor::emit_tasks(project, raw, filtered, config)?;
                emitted_editor_file_count += 1;
            }
        }
    }

    problems.write_to(&cache::problems_log_path(&paths))?;

    Ok(GenerateReport {
        project_count: projects.len(),
        class_count: classes.len(),
        dependency_edge_count: graph.iter().map(|n| n.num_dependencies).sum(),
        problem_count: problems.len(),
        emitted_asconfig_count,
        emitted_editor_file_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkspaceConfig;
    use std::fs;
    use tempfile::tempdir;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    #[test]
    fn empty_workspace_yields_empty_report() {
        init_tracing();
        let dir = tempdir().unwrap();
        let config = WorkspaceConfig::builder(dir.path(), dir.path().join("cache")).build();

        let report = generate(&config).unwrap();

        assert_eq!(report.project_count, 0);
        assert_eq!(report, GenerateReport::default());
    }

    #[test]
    fn single_project_produces_one_asconfig() {
        init_tracing();
        let dir = tempdir().unwrap();
        let class = dir.path().join("libA/src/a/A.as");
        fs::create_dir_all(class.parent().unwrap()).unwrap();
        fs::write(&class, "package a {\n  class A {\n  }\n}\n").unwrap();
        let config = WorkspaceConfig::builder(dir.path(), dir.path().join("cache")).build();

        let report = generate(&config).unwrap();

        assert_eq!(report.project_count, 1);
        assert_eq!(report.emitted_asconfig_count, 1);
        assert_eq!(report.emitted_editor_file_count, 0);
        assert!(dir.path().join("libA/asconfig.json").is_file());
    }
}
