#![deny(missing_docs)]
//! Shared logging utilities for the album workspace.
//!
//! This crate provides the `album_*` logging macros used across the codebase,
//! a per-thread collection scope that prefixes every message, and a minimal
//! test initializer for the global logger.

use std::cell::RefCell;

#[doc(hidden)]
pub use log;

thread_local! {
    /// Name of the collection currently being synchronized on this thread.
    static COLLECTION_SCOPE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Sets the collection name that prefixes log lines on the current thread.
/// Pass `None` to clear it once a run has finished.
pub fn set_collection_scope(name: Option<&str>) {
    COLLECTION_SCOPE.with(|scope| *scope.borrow_mut() = name.map(str::to_owned));
}

/// Returns the `[name] ` prefix for the current thread, or an empty string.
pub fn scope_prefix() -> String {
    COLLECTION_SCOPE.with(|scope| match scope.borrow().as_deref() {
        Some(name) => format!("[{name}] "),
        None => String::new(),
    })
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! album_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!("{}{}", $crate::scope_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! album_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!("{}{}", $crate::scope_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! album_info {
    ($($arg:tt)*) => {{
        $crate::log::info!("{}{}", $crate::scope_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! album_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!("{}{}", $crate::scope_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! album_error {
    ($($arg:tt)*) => {{
        $crate::log::error!("{}{}", $crate::scope_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may have installed the logger already.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
