//! Timing hooks for shell-script build phases
//!
//! A hooked phase script is the original script wrapped between a header block
//! that records a start timestamp and announces the phase, and a footer block
//! that records the end timestamp and prints how long the phase took:
//!
//! ```text
//! start_time=$(date +%s)
//! echo "[time] Starting phase Run Script"
//! <original script>
//! end_time=$(date +%s)
//! duration=$((end_time - start_time))
//! echo "[time] Phase took Run Script took $duration seconds to complete."
//! ```
//!
//! Both transforms are pure functions over the script text. Writing the result
//! back into the project is the caller's job.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Header marker used when none is configured
pub const DEFAULT_HEADER_MARKER: &str = "[time] Starting phase";

/// Footer marker used when none is configured
pub const DEFAULT_FOOTER_MARKER: &str = "[time] Phase took";

const START_CAPTURE: &str = "start_time=$(date +%s)";
const END_CAPTURE: &str = "end_time=$(date +%s)";
const DURATION_CALC: &str = "duration=$((end_time - start_time))";

fn start_capture_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*start_time=\$\(date \+%s\)\s*$").expect("valid regex"))
}

fn end_capture_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*end_time=\$\(date \+%s\)\s*$").expect("valid regex"))
}

fn duration_calc_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*duration=\$\(\(\s*end_time\s*-\s*start_time\s*\)\)\s*$")
            .expect("valid regex")
    })
}

/// The pair of literal strings that identify injected instrumentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookMarkers {
    pub header: String,
    pub footer: String,
}

impl Default for HookMarkers {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_MARKER, DEFAULT_FOOTER_MARKER)
    }
}

impl HookMarkers {
    pub fn new(header: impl Into<String>, footer: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            footer: footer.into(),
        }
    }

    /// A script counts as hooked only when it carries both markers.
    pub fn is_hooked(&self, script: &str) -> bool {
        script.contains(&self.header) && script.contains(&self.footer)
    }

    fn is_marker_line(&self, line: &str) -> bool {
        line.contains(&self.header) || line.contains(&self.footer)
    }
}

/// Which transform a run applies to every shell-script phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HookOperation {
    Inject,
    Strip,
}

impl HookOperation {
    /// Maps the command-line mode flag to an operation.
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "-hook" => Some(HookOperation::Inject),
            "-cleanhook" => Some(HookOperation::Strip),
            _ => None,
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            HookOperation::Inject => "-hook",
            HookOperation::Strip => "-cleanhook",
        }
    }

    pub fn transform(&self, transformer: &HookTransformer, script: &str, display_name: &str) -> String {
        match self {
            HookOperation::Inject => transformer.apply(script, display_name),
            HookOperation::Strip => transformer.strip(script),
        }
    }

    /// Confirmation wording for a finished project
    pub fn summary_verb(&self) -> &'static str {
        match self {
            HookOperation::Inject => "Added timing hooks to",
            HookOperation::Strip => "Removed timing hooks from",
        }
    }
}

impl fmt::Display for HookOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookOperation::Inject => write!(f, "inject"),
            HookOperation::Strip => write!(f, "strip"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HookTransformer {
    markers: HookMarkers,
}

impl HookTransformer {
    pub fn new(markers: HookMarkers) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &HookMarkers {
        &self.markers
    }

    /// Wraps `script` in timing instrumentation for the phase `display_name`.
    ///
    /// Scripts that already contain both markers are returned unchanged, which
    /// makes repeated runs idempotent.
    pub fn apply(&self, script: &str, display_name: &str) -> String {
        if self.markers.is_hooked(script) {
            return script.to_string();
        }

        let name = escape_for_double_quotes(display_name);
        let mut out = String::with_capacity(script.len() + 2 * name.len() + 192);

        out.push_str(START_CAPTURE);
        out.push('\n');
        out.push_str(&format!("echo \"{} {}\"\n", self.markers.header, name));

        out.push_str(script);
        if !script.is_empty() && !script.ends_with('\n') {
            out.push('\n');
        }

        out.push_str(END_CAPTURE);
        out.push('\n');
        out.push_str(DURATION_CALC);
        out.push('\n');
        out.push_str(&format!(
            "echo \"{} {} took $duration seconds to complete.\"\n",
            self.markers.footer, name
        ));

        out
    }

    /// Removes every marker line together with the timing statements `apply`
    /// places directly in front of them.
    ///
    /// Marker lines are removed wherever they occur, paired or not.
    pub fn strip(&self, script: &str) -> String {
        if !self.has_marker_lines(script) {
            return script.to_string();
        }

        let lines: Vec<&str> = script.split_inclusive('\n').collect();
        let mut keep = vec![true; lines.len()];

        for (idx, line) in lines.iter().enumerate() {
            if line.contains(&self.markers.header) {
                keep[idx] = false;
                if idx >= 1 && is_start_capture(lines[idx - 1]) {
                    keep[idx - 1] = false;
                }
            } else if line.contains(&self.markers.footer) {
                keep[idx] = false;
                if idx >= 1 && is_duration_calc(lines[idx - 1]) {
                    keep[idx - 1] = false;
                    if idx >= 2 && is_end_capture(lines[idx - 2]) {
                        keep[idx - 2] = false;
                    }
                }
            }
        }

        lines
            .iter()
            .zip(keep)
            .filter(|(_, keep)| *keep)
            .map(|(line, _)| *line)
            .collect()
    }

    /// True when `script` has at least one line `strip` would remove.
    pub fn has_marker_lines(&self, script: &str) -> bool {
        script.lines().any(|line| self.markers.is_marker_line(line))
    }
}

fn is_start_capture(line: &str) -> bool {
    start_capture_re().is_match(line.trim_end_matches(['\n', '\r']))
}

fn is_end_capture(line: &str) -> bool {
    end_capture_re().is_match(line.trim_end_matches(['\n', '\r']))
}

fn is_duration_calc(line: &str) -> bool {
    duration_calc_re().is_match(line.trim_end_matches(['\n', '\r']))
}

/// Makes a phase name safe inside a double-quoted shell string.
fn escape_for_double_quotes(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\\' | '"' | '$' | '`' => {
                out.push('\\');
                out.push(c);
            }
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}
