//! The Dependency Builder.
//!
//! Folds per-class couplings into a project-level dependency graph, one
//! forward-adjacency node per project, sorted by dependency count.

use crate::model::{AnalyzedClass, Project, ProjectDependencyNode};
use std::path::PathBuf;

/// Builds the project dependency graph from `classes`, seeding each node's
/// `root_classes` from its project's retained descriptors.
pub fn build(projects: &[Project], classes: &[AnalyzedClass]) -> Vec<ProjectDependencyNode> {
    let mut nodes: Vec<ProjectDependencyNode> = projects
        .iter()
        .map(|p| {
            let mut node = ProjectDependencyNode::new(p.home.clone());
            node.root_classes = p.descriptors.iter().map(|d| d.related_class_name().to_string()).collect();
            node
        })
        .collect();

    let index_of = |path: &PathBuf| nodes.iter().position(|n| &n.project_path == path);

    for class in classes {
        let Some(node_index) = index_of(&class.owning_project) else { continue };
        for coupling in &class.couplings {
            if !coupling.class_exists {
                continue;
            }
            let Some(target) = &coupling.matching_project else { continue };
            if *target == class.owning_project {
                continue;
            }
            nodes[node_index].add_dependency(target.clone());
        }
    }

    // Output ordering: num_dependencies ascending, stable on ties.
    nodes.sort_by_key(|n| n.num_dependencies);
    nodes
}
