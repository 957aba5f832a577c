use phaseprobe::cli::handlers::handle_run;
use phaseprobe::cli::CliArgs;
use phaseprobe::util::logging::{init_logging, resolve_level, LoggingConfig};
use phaseprobe::VERSION;

use clap::Parser;
use std::env;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("phaseprobe v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = handle_run(&args);
    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let use_json = env::var("PHASEPROBE_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    init_logging(LoggingConfig {
        level: resolve_level(args.log_level.as_deref(), args.verbose, args.quiet),
        use_json,
        ..Default::default()
    });
}
