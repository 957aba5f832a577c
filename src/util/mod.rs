//! Utility modules for phaseprobe

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
