#![deny(missing_docs)]
//! Shared logging utilities for the sweep workspace.
//!
//! This crate provides the `sweep_*` logging macros used by the engine and
//! the front end, plus a minimal test initializer for the global logger.
//! The macros go through the re-exported `log` facade, so callers do not
//! need their own `log` dependency.

#[doc(hidden)]
pub use log;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! sweep_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!(target: "sweep", $($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! sweep_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!(target: "sweep", $($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! sweep_info {
    ($($arg:tt)*) => {{
        $crate::log::info!(target: "sweep", $($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! sweep_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!(target: "sweep", $($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! sweep_error {
    ($($arg:tt)*) => {{
        $crate::log::error!(target: "sweep", $($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized, so
/// every test may call it.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Never,
    )]);
}
