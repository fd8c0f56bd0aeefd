//! Caller-configurable inputs.
//!
//! `WorkspaceConfig` is the seam between this crate and a CLI or config-file
//! loader: that collaborator parses flags and a config file and builds one
//! of these; this crate only ever reads it.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

/// One manual-dependency amendment fed to the Manual-Dependency Patcher.
/// Both paths are expected to be absolute project home paths.
#[derive(Clone, Debug, PartialEq)]
pub struct ManualDependency {
    pub project: PathBuf,
    pub dependencies: Vec<PathBuf>,
}

/// An auxiliary compilable unit co-located within a project, listed under
/// its `asconfig.json`'s `compilerOptions.workers`.
#[derive(Clone, Debug, PartialEq)]
pub struct InternalWorker {
    pub file: String,
    pub output: String,
}

#[derive(Clone, Debug)]
pub struct WorkspaceConfig {
    pub workspace_dir: PathBuf,
    pub cache_dir: PathBuf,
    /// Required only when the Editor-Config Emitter runs.
    pub sdk_dir: Option<PathBuf>,
    pub manual_dependencies: Vec<ManualDependency>,
    /// Deep-merged under the computed `asconfig.json`.
    pub asconfig_base: Option<serde_json::Value>,
    pub config_type: String,
    pub bin_dir: String,
    pub src_dir: String,
    pub copy_assets: bool,
    /// Projects registered as external workers: their application output
    /// path is taken from here instead of the default `<bin>/<Main>.swf`.
    pub external_workers: HashMap<PathBuf, String>,
    pub internal_workers: HashMap<PathBuf, Vec<InternalWorker>>,
    /// Disables the Dirtiness Filter: every project's build-task list is
    /// emitted in full.
    pub rebuild_all: bool,
    pub overwrite_asconfig: bool,
    /// Extra `.vscode/settings.json` keys per project; the key `"$sdk"` is
    /// mapped to the editor extension's SDK-framework key.
    pub editor_settings: HashMap<PathBuf, serde_json::Map<String, serde_json::Value>>,
    pub purge_editor_settings: bool,
    pub purge_editor_tasks: bool,
}

impl WorkspaceConfig {
    pub fn builder(workspace_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> WorkspaceConfigBuilder {
        WorkspaceConfigBuilder::new(workspace_dir, cache_dir)
    }
}

pub struct WorkspaceConfigBuilder {
    workspace_dir: PathBuf,
    cache_dir: PathBuf,
    sdk_dir: Option<PathBuf>,
    manual_dependencies: Vec<ManualDependency>,
    asconfig_base: Option<serde_json::Value>,
    config_type: String,
    bin_dir: String,
    src_dir: String,
    copy_assets: bool,
    external_workers: HashMap<PathBuf, String>,
    internal_workers: HashMap<PathBuf, Vec<InternalWorker>>,
    rebuild_all: bool,
    overwrite_asconfig: bool,
    editor_settings: HashMap<PathBuf, serde_json::Map<String, serde_json::Value>>,
    purge_editor_settings: bool,
    purge_editor_tasks: bool,
}

impl WorkspaceConfigBuilder {
    pub fn new(workspace_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            workspace_dir: workspace_dir.into(),
            cache_dir: cache_dir.into(),
            sdk_dir: None,
            manual_dependencies: Vec::new(),
            asconfig_base: None,
            config_type: "air".to_string(),
            bin_dir: "bin".to_string(),
            src_dir: "src".to_string(),
            copy_assets: true,
            external_workers: HashMap::new(),
            internal_workers: HashMap::new(),
            rebuild_all: false,
            overwrite_asconfig: false,
            editor_settings: HashMap::new(),
            purge_editor_settings: false,
            purge_editor_tasks: false,
        }
    }

    #[must_use]
    pub fn sdk_dir(mut self, sdk_dir: impl Into<PathBuf>) -> Self {
        self.sdk_dir = Some(sdk_dir.into());
        self
    }

    #[must_use]
    pub fn manual_dependencies(mut self, deps: Vec<ManualDependency>) -> Self {
        self.manual_dependencies = deps;
        self
    }

    #[must_use]
    pub fn asconfig_base(mut self, base: serde_json::Value) -> Self {
        self.asconfig_base = Some(base);
        self
    }

    #[must_use]
    pub fn config_type(mut self, config_type: impl Into<String>) -> Self {
        self.config_type = config_type.into();
        self
    }

    #[must_use]
    pub fn bin_dir(mut self, bin_dir: impl Into<String>) -> Self {
        self.bin_dir = bin_dir.into();
        self
    }

    #[must_use]
    pub fn src_dir(mut self, src_dir: impl Into<String>) -> Self {
        self.src_dir = src_dir.into();
        self
    }

    #[must_use]
    pub fn copy_assets(mut self, copy_assets: bool) -> Self {
        self.copy_assets = copy_assets;
        self
    }

    #[must_use]
    pub fn external_worker(mut self, project: impl Into<PathBuf>, output: impl Into<String>) -> Self {
        self.external_workers.insert(project.into(), output.into());
        self
    }

    #[must_use]
    pub fn internal_workers(mut self, project: impl Into<PathBuf>, workers: Vec<InternalWorker>) -> Self {
        self.internal_workers.insert(project.into(), workers);
        self
    }

    #[must_use]
    pub fn rebuild_all(mut self, rebuild_all: bool) -> Self {
        self.rebuild_all = rebuild_all;
        self
    }

    #[must_use]
    pub fn overwrite_asconfig(mut self, overwrite: bool) -> Self {
        self.overwrite_asconfig = overwrite;
        self
    }

    #[must_use]
    pub fn editor_settings(
        mut self,
        project: impl Into<PathBuf>,
        settings: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        self.editor_settings.insert(project.into(), settings);
        self
    }

    #[must_use]
    pub fn purge_editor_settings(mut self, purge: bool) -> Self {
        self.purge_editor_settings = purge;
        self
    }

    #[must_use]
    pub fn purge_editor_tasks(mut self, purge: bool) -> Self {
        self.purge_editor_tasks = purge;
        self
    }

    pub fn build(self) -> WorkspaceConfig {
        WorkspaceConfig {
            workspace_dir: self.workspace_dir,
            cache_dir: self.cache_dir,
            sdk_dir: self.sdk_dir,
            manual_dependencies: self.manual_dependencies,
            asconfig_base: self.asconfig_base,
            config_type: self.config_type,
            bin_dir: self.bin_dir,
            src_dir: self.src_dir,
            copy_assets: self.copy_assets,
            external_workers: self.external_workers,
            internal_workers: self.internal_workers,
            rebuild_all: self.rebuild_all,
            overwrite_asconfig: self.overwrite_asconfig,
            editor_settings: self.editor_settings,
            purge_editor_settings: self.purge_editor_settings,
            purge_editor_tasks: self.purge_editor_tasks,
        }
    }
}

impl WorkspaceConfig {
    pub fn lib_dir(&self, project_home: &Path) -> PathBuf {
        project_home.join("lib")
    }

    pub fn bin_path(&self, project_home: &Path) -> PathBuf {
        project_home.join(&self.bin_dir)
    }

    pub fn src_path(&self, project_home: &Path) -> PathBuf {
        project_home.join(&self.src_dir)
    }
}
