use crate::cli::commands::{CliArgs, USAGE};
use crate::cli::output::{OutputFormat, OutputFormatter};
use crate::config::ProbeConfig;
use crate::fs::RealFileSystem;
use crate::hook::HookOperation;
use crate::progress::{ConsoleHandler, LoggingHandler, ProgressHandler};
use crate::runner::Runner;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error};

/// Runs the command line and returns the process exit code.
pub fn handle_run(args: &CliArgs) -> i32 {
    let Some(operation) = args.operation() else {
        debug!(mode = ?args.mode, "No recognised mode flag");
        println!("{}", USAGE);
        return 0;
    };

    match run(args, operation) {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn run(args: &CliArgs, operation: HookOperation) -> Result<()> {
    let config = build_config(args)?;
    debug!("{}", config);

    let format: OutputFormat = args.format.into();
    let progress: Arc<dyn ProgressHandler> = match format {
        OutputFormat::Human => Arc::new(ConsoleHandler::stdout()),
        OutputFormat::Json => Arc::new(LoggingHandler),
    };

    let runner = Runner::new(Arc::new(RealFileSystem::new()), config).with_progress(progress);
    let summary = runner.run(operation)?;

    println!("{}", OutputFormatter::new(format).format_summary(&summary)?);
    Ok(())
}

/// Environment configuration with command-line overrides applied.
pub fn build_config(args: &CliArgs) -> Result<ProbeConfig> {
    let mut config = ProbeConfig::default();

    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.to_lowercase();
    }

    config.validate()?;
    Ok(config)
}
