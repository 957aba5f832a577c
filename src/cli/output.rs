//! Output formatting for run summaries
//!
//! Human output is a single closing line; per-project lines are printed while
//! the run is in progress. JSON output is the whole [`RunSummary`].

use crate::runner::RunSummary;
use anyhow::{Context, Result};

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_summary(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(summary)
                .context("Failed to serialize run summary to JSON"),
            OutputFormat::Human => Ok(self.format_summary_human(summary)),
        }
    }

    fn format_summary_human(&self, summary: &RunSummary) -> String {
        let projects = summary.projects.len();
        let phases = summary.changed_phases();
        format!(
            "Finished in {:.3}s: {} project{}, {} shell script phase{} changed",
            summary.elapsed_secs,
            projects,
            if projects == 1 { "" } else { "s" },
            phases,
            if phases == 1 { "" } else { "s" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::HookOperation;
    use crate::runner::ProjectReport;
    use std::path::PathBuf;

    fn summary() -> RunSummary {
        RunSummary {
            operation: HookOperation::Inject,
            root: PathBuf::from("/work"),
            projects: vec![ProjectReport {
                path: PathBuf::from("/work/App.xcodeproj"),
                name: "App.xcodeproj".to_string(),
                shell_phases: 2,
                changed_phases: 2,
            }],
            elapsed_secs: 0.25,
        }
    }

    #[test]
    fn test_human_summary() {
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_summary(&summary())
            .unwrap();
        assert_eq!(output, "Finished in 0.250s: 1 project, 2 shell script phases changed");
    }

    #[test]
    fn test_human_summary_no_projects() {
        let empty = RunSummary {
            projects: Vec::new(),
            ..summary()
        };
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_summary(&empty)
            .unwrap();
        assert!(output.contains("0 projects, 0 shell script phases changed"));
    }

    #[test]
    fn test_json_summary() {
        let output = OutputFormatter::new(OutputFormat::Json)
            .format_summary(&summary())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["operation"], "inject");
        assert_eq!(parsed["root"], "/work");
        assert_eq!(parsed["projects"][0]["name"], "App.xcodeproj");
        assert_eq!(parsed["projects"][0]["changed_phases"], 2);
        assert_eq!(parsed["elapsed_secs"], 0.25);
    }
}
