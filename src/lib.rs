#![doc = include_str!("../README.md")]
#![warn(rustdoc::all)]
#![deny(unused_must_use, rust_2018_idioms)]

#[macro_use]
extern crate tracing;

pub mod cache;
pub mod config;
pub mod depgraph;
pub mod dirty;
pub mod emit;
pub mod error;
pub mod model;
pub mod patcher;
pub mod pipeline;
pub mod planner;
pub mod problems;
pub mod resolver;
pub mod scanner;
pub mod utils;

pub use config::{InternalWorker, ManualDependency, WorkspaceConfig, WorkspaceConfigBuilder};
pub use error::{Error, IoError, Result};
pub use pipeline::GenerateReport;
pub use problems::{Problem, ProblemsLog};

/// Entry point: wraps a [`WorkspaceConfig`] and runs the generation
/// pipeline over it.
///
/// ```no_run
/// use mascot_compilers::{Workspace, WorkspaceConfig};
///
/// let config = WorkspaceConfig::builder("./workspace", "./workspace/.mascot-cache")
///     .sdk_dir("/opt/flex-sdk")
///     .build();
/// let workspace = Workspace::new(config);
/// let report = workspace.generate().unwrap();
/// println!("{} projects scanned", report.project_count);
/// ```
#[derive(Clone, Debug)]
pub struct Workspace {
    config: WorkspaceConfig,
}

impl Workspace {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Runs the Shallow Scanner through Editor-Config Emitter pipeline
    /// and returns a summary of the run.
    pub fn generate(&self) -> Result<GenerateReport> {
        pipeline::generate(&self.config)
    }
}
