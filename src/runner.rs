//! Drives a hook run: discover bundles, transform their shell-script phases,
//! save each project once.

use crate::config::ProbeConfig;
use crate::discovery::discover_projects;
use crate::fs::FileSystem;
use crate::hook::{HookOperation, HookTransformer};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::project::Project;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectReport {
    pub path: PathBuf,
    pub name: String,
    pub shell_phases: usize,
    pub changed_phases: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub operation: HookOperation,
    pub root: PathBuf,
    pub projects: Vec<ProjectReport>,
    pub elapsed_secs: f64,
}

impl RunSummary {
    pub fn changed_phases(&self) -> usize {
        self.projects.iter().map(|p| p.changed_phases).sum()
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_secs)
    }
}

pub struct Runner {
    fs: Arc<dyn FileSystem>,
    config: ProbeConfig,
    transformer: HookTransformer,
    progress: Arc<dyn ProgressHandler>,
}

impl Runner {
    pub fn new(fs: Arc<dyn FileSystem>, config: ProbeConfig) -> Self {
        let transformer = HookTransformer::new(config.markers.clone());
        Self {
            fs,
            config,
            transformer,
            progress: Arc::new(NoOpHandler),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Processes every bundle under the configured root. The first project
    /// that fails to load or save aborts the run.
    pub fn run(&self, operation: HookOperation) -> Result<RunSummary> {
        let start = Instant::now();
        self.progress.on_progress(&ProgressEvent::RunStarted {
            root: self.config.root.clone(),
            operation,
        });

        let bundles = discover_projects(&self.config.root, &self.config.discovery())
            .context("Failed to search for Xcode projects")?;
        self.progress.on_progress(&ProgressEvent::ProjectsDiscovered {
            count: bundles.len(),
            scan_time: start.elapsed(),
        });

        let projects = self.process_all(&bundles, operation)?;

        let summary = RunSummary {
            operation,
            root: self.config.root.clone(),
            projects,
            elapsed_secs: start.elapsed().as_secs_f64(),
        };
        self.progress.on_progress(&ProgressEvent::RunCompleted {
            projects: summary.projects.len(),
            changed_phases: summary.changed_phases(),
            total_time: start.elapsed(),
        });

        Ok(summary)
    }

    /// Processes `bundles` in order.
    pub fn process_all(
        &self,
        bundles: &[PathBuf],
        operation: HookOperation,
    ) -> Result<Vec<ProjectReport>> {
        bundles
            .iter()
            .map(|bundle| self.process_project(bundle, operation))
            .collect()
    }

    /// Loads one project, transforms all of its shell-script phases and saves
    /// it exactly once.
    pub fn process_project(&self, bundle: &Path, operation: HookOperation) -> Result<ProjectReport> {
        self.progress.on_progress(&ProgressEvent::ProjectStarted {
            path: bundle.to_path_buf(),
        });

        let mut project = Project::open(self.fs.as_ref(), bundle)
            .with_context(|| format!("Failed to load project {}", bundle.display()))?;

        let phases = project.shell_script_phases();
        let mut changed_phases = 0;

        for phase in &phases {
            let script = project.shell_script(&phase.id)?;
            let updated = operation.transform(&self.transformer, script, phase.display_name());
            let changed = updated != script;

            debug!(
                project = %bundle.display(),
                phase = %phase.display_name(),
                id = %phase.id,
                changed,
                "Transformed shell script phase"
            );

            if changed {
                project.set_shell_script(&phase.id, updated)?;
                changed_phases += 1;
            }

            self.progress.on_progress(&ProgressEvent::PhaseProcessed {
                project: bundle.to_path_buf(),
                phase: phase.display_name().to_string(),
                changed,
            });
        }

        project
            .save(self.fs.as_ref())
            .with_context(|| format!("Failed to save project {}", bundle.display()))?;

        let report = ProjectReport {
            path: bundle.to_path_buf(),
            name: project.name(),
            shell_phases: phases.len(),
            changed_phases,
        };
        self.progress.on_progress(&ProgressEvent::ProjectCompleted {
            report: report.clone(),
            operation,
        });

        Ok(report)
    }
}
