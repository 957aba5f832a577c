//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::RunStarted { root, operation } => {
                info!(
                    root = %root.display(),
                    operation = %operation,
                    flag = operation.flag(),
                    "Starting run"
                );
            }
            ProgressEvent::ProjectsDiscovered { count, scan_time } => {
                info!(
                    projects = count,
                    scan_time_ms = scan_time.as_millis() as u64,
                    "Discovery complete"
                );
            }
            ProgressEvent::ProjectStarted { path } => {
                info!(project = %path.display(), "Processing project");
            }
            ProgressEvent::PhaseProcessed {
                project,
                phase,
                changed,
            } => {
                debug!(project = %project.display(), phase = %phase, changed, "Phase processed");
            }
            ProgressEvent::ProjectCompleted { report, operation } => {
                info!(
                    project = %report.path.display(),
                    operation = %operation,
                    shell_phases = report.shell_phases,
                    changed_phases = report.changed_phases,
                    "Project saved"
                );
            }
            ProgressEvent::RunCompleted {
                projects,
                changed_phases,
                total_time,
            } => {
                info!(
                    projects,
                    changed_phases,
                    total_time_ms = total_time.as_millis() as u64,
                    "Run complete"
                );
            }
        }
    }
}
