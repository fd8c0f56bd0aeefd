//! The Config Emitter.
//!
//! Writes one `asconfig.json` per project, deep-merging the computed
//! configuration over any caller-supplied base document (see
//! [`crate::emit::merge`]).

use crate::{
    config::WorkspaceConfig,
    emit,
    error::Result,
    model::{Project, ProjectDependencyNode},
    problems::{Problem, ProblemsLog},
    utils,
};
use serde_json::{json, Value};

/// Writes `<project.home>/asconfig.json`, skipping if the file already
/// exists and `config.overwrite_asconfig` is `false`.
pub fn emit(
    project: &Project,
    node: Option<&ProjectDependencyNode>,
    config: &WorkspaceConfig,
    problems: &mut ProblemsLog,
) -> Result<()> {
    let path = project.home.join("asconfig.json");
    if path.is_file() && !config.overwrite_asconfig {
        return Ok(());
    }

    let computed = match build_computed(project, node, config) {
        Ok(value) => value,
        Err(cause) => {
            problems.push(Problem::EmitFailure {
                project: project.home.clone(),
                target: path,
                cause,
            });
            return Ok(());
        }
    };

    let mut result = config.asconfig_base.clone().unwrap_or_else(|| json!({}));
    emit::merge(&mut result, computed);
    utils::write_json_file(&result, &path)
}

fn build_computed(
    project: &Project,
    node: Option<&ProjectDependencyNode>,
    config: &WorkspaceConfig,
) -> std::result::Result<Value, String> {
    let is_app = project.is_app_probability;
    let project_type = if is_app { "app" } else { "lib" };

    let root_class = node.and_then(|n| n.root_classes.first());
    let main_class = root_class.cloned().unwrap_or_else(|| "Main".to_string());

    let application = if is_app {
        root_class
            .and_then(|name| project.descriptors.iter().find(|d| d.related_class_name() == name))
            .map(|d| utils::relative_forward_slash(&d.path, &project.home))
    } else {
        None
    };

    let mut library_path = Vec::new();
    if project.has_lib_dir {
        library_path.push("lib".to_string());
    }
    if let Some(node) = node {
        for dep in &node.dependencies {
            library_path.push(utils::to_forward_slash(&dep.join(&config.bin_dir)));
        }
    }

    let output_name = utils::sanitize_output_name(&project.name);
    let output = if is_app {
        match config.external_workers.get(&project.home) {
            Some(worker_output) => worker_output.clone(),
            None => format!("{}/{main_class}.swf", config.bin_dir),
        }
    } else {
        format!("{}/{output_name}.swc", config.bin_dir)
    };

    let mut compiler_options = serde_json::Map::new();
    compiler_options.insert("debug".to_string(), json!(true));
    compiler_options.insert("library-path".to_string(), json!(library_path));
    compiler_options.insert("output".to_string(), json!(output));
    compiler_options.insert("source-path".to_string(), json!([config.src_dir.clone()]));
    if !is_app {
        compiler_options.insert("include-sources".to_string(), json!([config.src_dir.clone()]));
    }
    if let Some(workers) = config.internal_workers.get(&project.home) {
        let workers: Vec<Value> =
            workers.iter().map(|w| json!({"file": w.file, "output": w.output})).collect();
        compiler_options.insert("workers".to_string(), json!(workers));
    }

    let mut top = serde_json::Map::new();
    top.insert("config".to_string(), json!(config.config_type));
    top.insert("type".to_string(), json!(project_type));
    if is_app {
        top.insert("mainClass".to_string(), json!(main_class));
        if let Some(application) = application {
            top.insert("application".to_string(), json!(application));
        }
    }
    top.insert("copySourcePathAssets".to_string(), json!(config.copy_assets));
    top.insert("compilerOptions".to_string(), Value::Object(compiler_options));

    Ok(Value::Object(top))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Descriptor;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn project(home: PathBuf, is_app: bool) -> Project {
        Project {
            home,
            name: "proj".to_string(),
            class_files: vec!["M.as".to_string()],
            asset_files: vec![],
            has_lib_dir: false,
            has_binaries: false,
            has_app_binary: false,
            descriptors: vec![],
            code_timestamp: 0,
            binary_timestamp: 0,
            is_dirty: false,
            is_app_probability: is_app,
        }
    }

    #[test]
    fn lib_output_ends_in_swc() {
        let dir = tempdir().unwrap();
        let home = dir.path().join("libA");
        std::fs::create_dir_all(home.join("src")).unwrap();
        let p = project(home.clone(), false);
        let config = WorkspaceConfig::builder(dir.path(), dir.path().join("cache")).build();
        let mut problems = ProblemsLog::new();

        emit(&p, None, &config, &mut problems).unwrap();
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(home.join("asconfig.json")).unwrap()).unwrap();
        assert_eq!(written["type"], json!("lib"));
        assert!(written["compilerOptions"]["output"].as_str().unwrap().ends_with(".swc"));
    }

    #[test]
    fn app_output_ends_in_swf_and_uses_main_class() {
        let dir = tempdir().unwrap();
        let home = dir.path().join("app");
        std::fs::create_dir_all(home.join("src")).unwrap();
        let mut p = project(home.clone(), true);
        p.descriptors.push(Descriptor {
            simple_name: "M".to_string(),
            filename: "M-app.xml".to_string(),
            path: home.join("src/M-app.xml"),
            related_class_file: "M.as".to_string(),
            related_class_package: None,
        });
        let mut node = ProjectDependencyNode::new(home.clone());
        node.root_classes.push("M".to_string());
        let config = WorkspaceConfig::builder(dir.path(), dir.path().join("cache")).build();
        let mut problems = ProblemsLog::new();

        emit(&p, Some(&node), &config, &mut problems).unwrap();
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(home.join("asconfig.json")).unwrap()).unwrap();
        assert_eq!(written["mainClass"], json!("M"));
        assert!(written["compilerOptions"]["output"].as_str().unwrap().ends_with("M.swf"));
    }

    #[test]
    fn preserves_unrelated_base_keys() {
        let dir = tempdir().unwrap();
        let home = dir.path().join("libA");
        std::fs::create_dir_all(home.join("src")).unwrap();
        let p = project(home.clone(), false);
        let config = WorkspaceConfig::builder(dir.path(), dir.path().join("cache"))
            .asconfig_base(json!({"compilerOptions": {"define": [["FOO", "true"]]}}))
            .build();
        let mut problems = ProblemsLog::new();

        emit(&p, None, &config, &mut problems).unwrap();
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(home.join("asconfig.json")).unwrap()).unwrap();
        assert!(written["compilerOptions"]["define"].is_array());
        assert!(written["compilerOptions"]["output"].as_str().unwrap().ends_with(".swc"));
    }
}
