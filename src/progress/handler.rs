//! Progress handler trait and events

use crate::hook::HookOperation;
use crate::runner::ProjectReport;
use std::path::PathBuf;
use std::time::Duration;

/// Events emitted while a run walks its projects
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started
    RunStarted {
        root: PathBuf,
        operation: HookOperation,
    },

    /// Project discovery completed
    ProjectsDiscovered { count: usize, scan_time: Duration },

    /// A project is about to be loaded
    ProjectStarted { path: PathBuf },

    /// One shell-script phase went through the transform
    PhaseProcessed {
        project: PathBuf,
        phase: String,
        changed: bool,
    },

    /// A project was transformed and saved
    ProjectCompleted {
        report: ProjectReport,
        operation: HookOperation,
    },

    /// Every project was processed
    RunCompleted {
        projects: usize,
        changed_phases: usize,
        total_time: Duration,
    },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        NoOpHandler.on_progress(&ProgressEvent::ProjectStarted {
            path: PathBuf::from("/test/App.xcodeproj"),
        });
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::RunStarted {
            root: PathBuf::from("/test"),
            operation: HookOperation::Inject,
        });
        handler.on_progress(&ProgressEvent::ProjectsDiscovered {
            count: 2,
            scan_time: Duration::from_millis(5),
        });
        handler.on_progress(&ProgressEvent::RunCompleted {
            projects: 2,
            changed_phases: 3,
            total_time: Duration::from_millis(40),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
