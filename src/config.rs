//! Configuration management for phaseprobe
//!
//! Settings are loaded from environment variables with sensible defaults.
//! Command-line flags override whatever the environment provides.
//!
//! # Environment Variables
//!
//! - `PHASEPROBE_ROOT`: Directory searched for `.xcodeproj` bundles - default: current directory
//! - `PHASEPROBE_MAX_DEPTH`: Maximum directory depth of the search - default: "32"
//! - `PHASEPROBE_HEADER_MARKER`: Marker printed when a phase starts - default: "[time] Starting phase"
//! - `PHASEPROBE_FOOTER_MARKER`: Marker printed when a phase ends - default: "[time] Phase took"
//! - `PHASEPROBE_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use phaseprobe::ProbeConfig;
//!
//! let config = ProbeConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("Searching {}", config.root.display());
//! ```

use crate::discovery::DiscoveryConfig;
use crate::hook::{HookMarkers, DEFAULT_FOOTER_MARKER, DEFAULT_HEADER_MARKER};
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_MAX_DEPTH: usize = 32;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_BUNDLE_EXTENSION: &str = "xcodeproj";

/// Characters that would break out of the double-quoted `echo` a marker is printed with
const FORBIDDEN_MARKER_CHARS: &[char] = &['"', '\\', '$', '`', '\n', '\r'];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Directory searched for project bundles
    pub root: PathBuf,

    /// Maximum directory depth of the search
    pub max_depth: usize,

    /// Bundle directory extension, without the dot
    pub bundle_extension: String,

    /// Markers written into and recognised in phase scripts
    pub markers: HookMarkers,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ProbeConfig {
    /// Loads PHASEPROBE_* environment variables, falling back to defaults
    /// for anything missing or unparsable.
    fn default() -> Self {
        let root = env::var("PHASEPROBE_ROOT")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        let max_depth = env::var("PHASEPROBE_MAX_DEPTH")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_DEPTH);

        let header = env::var("PHASEPROBE_HEADER_MARKER")
            .unwrap_or_else(|_| DEFAULT_HEADER_MARKER.to_string());
        let footer = env::var("PHASEPROBE_FOOTER_MARKER")
            .unwrap_or_else(|_| DEFAULT_FOOTER_MARKER.to_string());

        let log_level = env::var("PHASEPROBE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            root,
            max_depth,
            bundle_extension: DEFAULT_BUNDLE_EXTENSION.to_string(),
            markers: HookMarkers::new(header, footer),
            log_level,
        }
    }
}

impl ProbeConfig {
    /// Checks that:
    /// - the search depth is positive
    /// - the log level is valid
    /// - both markers are non-empty, distinct, single-line and safe inside
    ///   a double-quoted shell string
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_depth must be greater than 0".to_string(),
            ));
        }

        if self.bundle_extension.is_empty() || self.bundle_extension.contains('/') {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid bundle extension: '{}'",
                self.bundle_extension
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        validate_marker("header marker", &self.markers.header)?;
        validate_marker("footer marker", &self.markers.footer)?;

        if self.markers.header.contains(&self.markers.footer)
            || self.markers.footer.contains(&self.markers.header)
        {
            return Err(ConfigError::ValidationFailed(format!(
                "Header marker '{}' and footer marker '{}' must not contain one another",
                self.markers.header, self.markers.footer
            )));
        }

        Ok(())
    }

    pub fn discovery(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            max_depth: self.max_depth,
            bundle_extension: self.bundle_extension.clone(),
        }
    }

    /// Parses a `--max-depth` style override.
    pub fn parse_max_depth(value: &str) -> Result<usize, ConfigError> {
        value.parse::<usize>().map_err(|e| ConfigError::ParseError {
            field: "max_depth".to_string(),
            error: e.to_string(),
        })
    }
}

fn validate_marker(field: &str, marker: &str) -> Result<(), ConfigError> {
    if marker.trim().is_empty() {
        return Err(ConfigError::ValidationFailed(format!("{} must not be empty", field)));
    }
    if let Some(c) = marker.chars().find(|c| FORBIDDEN_MARKER_CHARS.contains(c)) {
        return Err(ConfigError::ValidationFailed(format!(
            "{} must not contain {:?}",
            field, c
        )));
    }
    Ok(())
}

impl fmt::Display for ProbeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "phaseprobe configuration:")?;
        writeln!(f, "  Root: {}", self.root.display())?;
        writeln!(f, "  Max depth: {}", self.max_depth)?;
        writeln!(f, "  Bundle extension: .{}", self.bundle_extension)?;
        writeln!(f, "  Header marker: {}", self.markers.header)?;
        writeln!(f, "  Footer marker: {}", self.markers.footer)?;
        write!(f, "  Log level: {}", self.log_level)
    }
}
