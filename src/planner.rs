//! The Task Planner.
//!
//! Depth-first post-order topological sort per project, memoizing
//! in-progress nodes so cycles degrade to a logged problem instead of
//! infinite recursion.

use crate::{
    model::{BuildTask, ProjectDependencyNode},
    problems::{Problem, ProblemsLog},
};
use std::{
    collections::HashMap,
    path::PathBuf,
};

enum VisitState {
    InProgress,
    Done,
}

/// Builds one [`BuildTask`] per node in `nodes`, preserving `nodes`' order.
pub fn plan(nodes: &[ProjectDependencyNode], problems: &mut ProblemsLog) -> Vec<BuildTask> {
    let index: HashMap<PathBuf, &ProjectDependencyNode> =
        nodes.iter().map(|n| (n.project_path.clone(), n)).collect();

    nodes
        .iter()
        .map(|root| {
            let mut order = Vec::new();
            let mut state = HashMap::new();
            visit(&root.project_path, &root.project_path, &index, &mut state, &mut order, problems);
            BuildTask::new(root.project_path.clone(), order)
        })
        .collect()
}

fn visit(
    root: &PathBuf,
    current: &PathBuf,
    index: &HashMap<PathBuf, &ProjectDependencyNode>,
    state: &mut HashMap<PathBuf, VisitState>,
    order: &mut Vec<PathBuf>,
    problems: &mut ProblemsLog,
) {
    state.insert(current.clone(), VisitState::InProgress);

    if let Some(node) = index.get(current) {
        for dep in &node.dependencies {
            match state.get(dep) {
                Some(VisitState::InProgress) => {
                    problems.push(Problem::Cycle { project: root.clone(), involving: dep.clone() });
                }
                Some(VisitState::Done) => {}
                None => {
                    if index.contains_key(dep) {
                        visit(root, dep, index, state, order, problems);
                    } else {
                        problems.push(Problem::MissingDependencyNode {
                            from: current.clone(),
                            missing: dep.clone(),
                        });
                    }
                }
            }
        }
    }

    state.insert(current.clone(), VisitState::Done);
    order.push(current.clone());
}
