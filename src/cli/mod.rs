pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, OutputFormatArg, USAGE};
pub use output::{OutputFormat, OutputFormatter};
