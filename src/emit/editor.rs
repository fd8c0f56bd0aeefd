//! The Editor-Config Emitter.
//!
//! Writes `.vscode/settings.json` (merged or purged) and `.vscode/tasks.json`
//! (a debug/release chain of dependency sub-tasks feeding one master build
//! task), in the same read/merge/write shape as [`crate::emit::asconfig`].

use crate::{
    config::WorkspaceConfig,
    emit::{self, object_or_empty},
    error::Result,
    model::{BuildTask, Project},
    utils,
};
use serde_json::{json, Map, Value};

const SDK_SETTING_KEY: &str = "as3mxml.sdk.framework";
/// Marks a task object as owned by this emitter, so a later run can tell
/// MASCOT-generated tasks apart from hand-authored ones.
const OWNED_MARKER: &str = "mascotOwned";

pub fn emit_settings(project: &Project, config: &WorkspaceConfig) -> Result<()> {
    let path = project.home.join(".vscode").join("settings.json");

    let mut computed = Map::new();
    if let Some(caller_settings) = config.editor_settings.get(&project.home) {
        for (key, value) in caller_settings {
            if key == "$sdk" {
                let sdk_value = config
                    .sdk_dir
                    .as_ref()
                    .map(|p| json!(utils::to_forward_slash(p)))
                    .unwrap_or_else(|| value.clone());
                computed.insert(SDK_SETTING_KEY.to_string(), sdk_value);
            } else {
                computed.insert(key.clone(), value.clone());
            }
        }
    }

    let result = if config.purge_editor_settings {
        computed
    } else {
        let existing = object_or_empty(utils::read_json_file(&path).ok());
        let mut merged = Value::Object(existing);
        emit::merge(&mut merged, Value::Object(computed));
        match merged {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    };

    utils::write_json_file(&Value::Object(result), &path)
}

pub fn emit_tasks(
    project: &Project,
    original_task: &BuildTask,
    filtered_task: &BuildTask,
    config: &WorkspaceConfig,
) -> Result<()> {
    let path = project.home.join(".vscode").join("tasks.json");
    let sdk_dir = config.sdk_dir.as_deref().map(utils::to_forward_slash).unwrap_or_default();

    let mut generated = Vec::new();
    for mode in ["debug", "release"] {
        generated.extend(build_mode_tasks(project, original_task, filtered_task, &sdk_dir, mode));
    }

    let existing_tasks: Vec<Value> = utils::read_json_file::<Value>(&path)
        .ok()
        .and_then(|v| v.get("tasks").cloned())
        .and_then(|v| v.as_array().cloned())
        .unwrap_or_default();

    let has_owned = existing_tasks.iter().any(is_owned);

    let tasks = if config.purge_editor_tasks {
        let mut kept: Vec<Value> = existing_tasks.into_iter().filter(|t| !is_owned(t)).collect();
        kept.extend(generated);
        kept
    } else if has_owned {
        return Ok(());
    } else {
        let mut kept = existing_tasks;
        kept.extend(generated);
        kept
    };

    let document = json!({"version": "2.0.0", "tasks": tasks});
    utils::write_json_file(&document, &path)
}

fn is_owned(task: &Value) -> bool {
    task.get(OWNED_MARKER).and_then(Value::as_bool).unwrap_or(false)
}

fn build_mode_tasks(
    project: &Project,
    original_task: &BuildTask,
    filtered_task: &BuildTask,
    sdk_dir: &str,
    mode: &str,
) -> Vec<Value> {
    let debug = mode == "debug";
    // The project itself is always the last entry; the rest are
    // dependencies in topological order.
    let filtered_deps = filtered_task.project_build_tasks.split_last().map(|(_, rest)| rest).unwrap_or(&[]);
    let original_deps_count = original_task.num_tasks.saturating_sub(1);

    let mut sub_tasks = Vec::new();
    let mut previous_label: Option<String> = None;
    for dep in filtered_deps {
        let label = format!("{mode}: build {} (dependency)", utils::to_forward_slash(dep));
        let mut task = Map::new();
        task.insert("label".to_string(), json!(label));
        task.insert("type".to_string(), json!("shell"));
        task.insert("command".to_string(), json!("mxmlc"));
        task.insert(
            "args".to_string(),
            json!(["--sdk", sdk_dir, "--project", utils::to_forward_slash(dep), &format!("--debug={debug}")]),
        );
        task.insert("group".to_string(), json!("build"));
        task.insert("problemMatcher".to_string(), json!("$mxmlc"));
        if let Some(prev) = &previous_label {
            task.insert("dependsOn".to_string(), json!(prev));
        }
        task.insert(OWNED_MARKER.to_string(), json!(true));
        previous_label = Some(label);
        sub_tasks.push(Value::Object(task));
    }

    let suffix = if !filtered_deps.is_empty() {
        " (with deps)"
    } else if original_deps_count == 0 {
        " (not needed)"
    } else {
        ""
    };

    let mut master = Map::new();
    master.insert("label".to_string(), json!(format!("{mode}: build{suffix}")));
    master.insert("type".to_string(), json!("actionscript"));
    master.insert("asconfig".to_string(), json!("asconfig.json"));
    master.insert("args".to_string(), json!(if debug { vec!["--debug=true"] } else { vec!["--debug=false"] }));
    master.insert(
        "group".to_string(),
        json!({"kind": "build", "isDefault": debug}),
    );
    master.insert("problemMatcher".to_string(), json!("$mxmlc"));
    if let Some(prev) = previous_label {
        master.insert("dependsOn".to_string(), json!(prev));
    }
    master.insert(OWNED_MARKER.to_string(), json!(true));

    sub_tasks.push(Value::Object(master));
    sub_tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn project(home: PathBuf) -> Project {
        Project {
            home,
            name: "app".to_string(),
            class_files: vec![],
            asset_files: vec![],
            has_lib_dir: false,
            has_binaries: false,
            has_app_binary: false,
            descriptors: vec![],
            code_timestamp: 0,
            binary_timestamp: 0,
            is_dirty: false,
            is_app_probability: true,
        }
    }

    #[test]
    fn master_label_suffix_not_needed_when_no_dependencies() {
        let dir = tempdir().unwrap();
        let home = dir.path().join("app");
        std::fs::create_dir_all(&home).unwrap();
        let p = project(home.clone());
        let task = BuildTask::new(home.clone(), vec![home.clone()]);
        let config = WorkspaceConfig::builder(dir.path(), dir.path().join("cache")).build();

        emit_tasks(&p, &task, &task, &config).unwrap();
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(home.join(".vscode/tasks.json")).unwrap())
                .unwrap();
        let labels: Vec<&str> =
            written["tasks"].as_array().unwrap().iter().map(|t| t["label"].as_str().unwrap()).collect();
        assert!(labels.iter().any(|l| l.contains("not needed")));
    }

    #[test]
    fn master_label_suffix_with_deps_when_filtered_nonempty() {
        let dir = tempdir().unwrap();
        let home = dir.path().join("app");
        std::fs::create_dir_all(&home).unwrap();
        let p = project(home.clone());
        let lib = dir.path().join("libA");
        let original = BuildTask::new(home.clone(), vec![lib.clone(), home.clone()]);
        let filtered = original.clone();
        let config = WorkspaceConfig::builder(dir.path(), dir.path().join("cache")).build();

        emit_tasks(&p, &original, &filtered, &config).unwrap();
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(home.join(".vscode/tasks.json")).unwrap())
                .unwrap();
        let labels: Vec<&str> =
            written["tasks"].as_array().unwrap().iter().map(|t| t["label"].as_str().unwrap()).collect();
        assert!(labels.iter().any(|l| l.contains("with deps")));
    }

    #[test]
    fn second_run_skips_when_owned_tasks_present_and_not_purging() {
        let dir = tempdir().unwrap();
        let home = dir.path().join("app");
        std::fs::create_dir_all(&home).unwrap();
        let p = project(home.clone());
        let task = BuildTask::new(home.clone(), vec![home.clone()]);
        let config = WorkspaceConfig::builder(dir.path(), dir.path().join("cache")).build();

        emit_tasks(&p, &task, &task, &config).unwrap();
        let first = std::fs::read_to_string(home.join(".vscode/tasks.json")).unwrap();
        emit_tasks(&p, &task, &task, &config).unwrap();
        let second = std::fs::read_to_string(home.join(".vscode/tasks.json")).unwrap();
        assert_eq!(first, second);
    }
}
