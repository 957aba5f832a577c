use crate::config::ProbeConfig;
use crate::hook::HookOperation;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Printed when the mode flag is missing or not recognised
pub const USAGE: &str =
    "Invalid argument. Use '-hook' to add timing hooks, or '-cleanhook' to remove them.";

/// Add or remove timing hooks around the shell script build phases of Xcode projects
#[derive(Parser, Debug)]
#[command(
    name = "phaseprobe",
    about = "Add or remove timing hooks around Xcode shell script build phases",
    version,
    long_about = "phaseprobe finds every .xcodeproj bundle below a directory and wraps each \
                  shell script build phase with statements that print how long the phase \
                  took, or removes those statements again.\n\n\
                  Examples:\n  \
                  phaseprobe -hook\n  \
                  phaseprobe -cleanhook --root ~/src/MyApp\n  \
                  phaseprobe -hook --format json"
)]
pub struct CliArgs {
    #[arg(
        value_name = "MODE",
        allow_hyphen_values = true,
        help = "'-hook' to add timing hooks, '-cleanhook' to remove them"
    )]
    pub mode: Option<String>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Directory to search for .xcodeproj bundles (defaults to the current directory)"
    )]
    pub root: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        long,
        value_name = "DEPTH",
        value_parser = ProbeConfig::parse_max_depth,
        help = "Maximum directory depth to search"
    )]
    pub max_depth: Option<usize>,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// The operation selected by the mode flag, if it is one we know.
    pub fn operation(&self) -> Option<HookOperation> {
        self.mode.as_deref().and_then(HookOperation::from_flag)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_hook_flag() {
        let args = CliArgs::parse_from(["phaseprobe", "-hook"]);
        assert_eq!(args.mode.as_deref(), Some("-hook"));
        assert_eq!(args.operation(), Some(HookOperation::Inject));
        assert_eq!(args.format, OutputFormatArg::Human);
        assert!(args.root.is_none());
    }

    #[test]
    fn test_cleanhook_flag() {
        let args = CliArgs::parse_from(["phaseprobe", "-cleanhook"]);
        assert_eq!(args.operation(), Some(HookOperation::Strip));
    }

    #[test]
    fn test_unknown_flag_is_not_an_operation() {
        let args = CliArgs::parse_from(["phaseprobe", "-bogus"]);
        assert_eq!(args.mode.as_deref(), Some("-bogus"));
        assert_eq!(args.operation(), None);
    }

    #[test]
    fn test_missing_flag() {
        let args = CliArgs::parse_from(["phaseprobe"]);
        assert!(args.mode.is_none());
        assert_eq!(args.operation(), None);
    }

    #[test]
    fn test_with_options() {
        let args = CliArgs::parse_from([
            "phaseprobe",
            "-hook",
            "--root",
            "/tmp/ios",
            "--format",
            "json",
            "--max-depth",
            "5",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.operation(), Some(HookOperation::Inject));
        assert_eq!(args.root, Some(PathBuf::from("/tmp/ios")));
        assert_eq!(args.format, OutputFormatArg::Json);
        assert_eq!(args.max_depth, Some(5));
        assert_eq!(args.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_invalid_max_depth() {
        let result = CliArgs::try_parse_from(["phaseprobe", "-hook", "--max-depth", "many"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let result = CliArgs::try_parse_from(["phaseprobe", "-hook", "-v", "-q"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_verbose_flag() {
        let args = CliArgs::parse_from(["phaseprobe", "-v", "-cleanhook"]);
        assert!(args.verbose);
        assert!(!args.quiet);
        assert_eq!(args.operation(), Some(HookOperation::Strip));
    }
}
