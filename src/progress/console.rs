//! Progress lines for a terminal user

use super::{ProgressEvent, ProgressHandler};
use std::io::{self, Write};
use std::sync::Mutex;

/// Prints one line when a project starts and one when it has been saved
pub struct ConsoleHandler<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleHandler<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleHandler<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn line(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{}", text);
        }
    }
}

impl<W: Write + Send> ProgressHandler for ConsoleHandler<W> {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::ProjectStarted { path } => {
                self.line(&format!("Processing {}", path.display()));
            }
            ProgressEvent::ProjectCompleted { report, operation } => {
                self.line(&format!(
                    "{} {} ({} of {} shell script phases changed)",
                    operation.summary_verb(),
                    report.path.display(),
                    report.changed_phases,
                    report.shell_phases
                ));
            }
            _ => {}
        }
    }
}
