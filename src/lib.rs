//! phaseprobe - timing hooks for Xcode shell script build phases
//!
//! Every shell script build phase of every `.xcodeproj` below a directory is
//! wrapped with statements that print when the phase starts and how many
//! seconds it took. The same markers that announce the timings identify the
//! instrumentation later, so hooking is idempotent and can be undone.
//!
//! # Example Usage
//!
//! ```
//! use phaseprobe::{HookMarkers, HookTransformer};
//!
//! let transformer = HookTransformer::new(HookMarkers::default());
//! let hooked = transformer.apply("swiftlint\n", "SwiftLint");
//! assert!(hooked.contains("echo \"[time] Starting phase SwiftLint\""));
//! assert_eq!(transformer.apply(&hooked, "SwiftLint"), hooked);
//! assert_eq!(transformer.strip(&hooked), "swiftlint\n");
//! ```
//!
//! # Project Structure
//!
//! - [`hook`]: the inject and strip transforms over a script's text
//! - [`pbxproj`]: OpenStep property list parsing with source spans
//! - [`project`]: targets and build phases of a `project.pbxproj`
//! - [`discovery`]: finding `.xcodeproj` bundles on disk
//! - [`runner`]: applying an operation to every discovered project

pub mod cli;
pub mod config;
pub mod discovery;
pub mod fs;
pub mod hook;
pub mod pbxproj;
pub mod progress;
pub mod project;
pub mod runner;
pub mod util;

pub use config::{ConfigError, ProbeConfig};
pub use discovery::{discover_projects, DiscoveryConfig, DiscoveryError};
pub use hook::{HookMarkers, HookOperation, HookTransformer};
pub use project::{BuildPhase, BuildPhaseKind, Project, ProjectError, Target};
pub use runner::{ProjectReport, RunSummary, Runner};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
