//! Logger setup for the `album_sync` binary.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./album_sync.log";

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    Terminal,
    /// Terminal plus `./album_sync.log`.
    Both,
}

pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = log_config();
    let terminal: Box<dyn SharedLogger> = TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let mut sinks = vec![terminal];
    if destination == LogDestination::Both {
        match File::create(Path::new(LOG_FILE)) {
            Ok(file) => sinks.push(WriteLogger::new(level, config, file)),
            Err(err) => eprintln!("Warning: could not create {LOG_FILE}: {err}"),
        }
    }

    // Only fails if a logger is already installed.
    let _ = CombinedLogger::init(sinks);
}

fn log_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        // parser and tls internals are noisy at debug
        .add_filter_ignore_str("html5ever")
        .add_filter_ignore_str("selectors")
        .add_filter_ignore_str("rustls")
        .build()
}
