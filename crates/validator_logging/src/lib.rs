#![deny(missing_docs)]
//! Shared logging utilities for the URL validator workspace.
//!
//! This crate provides the `validator_*` logging macros used across the
//! codebase and a minimal test initializer for the global logger. Lines logged
//! from the coordinator thread are prefixed with the pipeline generation they
//! belong to, which makes superseded probe results easy to follow in a log.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the pipeline generation being processed.
    static GENERATION: Cell<u64> = const { Cell::new(0) };
}

/// Sets the pipeline generation for the current thread.
/// The coordinator loop calls this after every processed message.
pub fn set_generation(generation: u64) {
    GENERATION.with(|v| v.set(generation));
}

/// Retrieves the pipeline generation for the current thread.
/// Returns 0 on threads that never processed an input.
pub fn current_generation() -> u64 {
    GENERATION.with(|v| v.get())
}

/// Re-export so the macros resolve `log` without callers depending on it.
#[doc(hidden)]
pub use log;

/// Emits one record, prefixed with the current generation when it is set.
#[doc(hidden)]
pub fn __log(level: log::Level, target: &str, args: std::fmt::Arguments<'_>) {
    match current_generation() {
        0 => log::log!(target: target, level, "{}", args),
        generation => log::log!(target: target, level, "[gen {}] {}", generation, args),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! validator_trace {
    ($($arg:tt)*) => {{
        $crate::__log($crate::log::Level::Trace, module_path!(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! validator_debug {
    ($($arg:tt)*) => {{
        $crate::__log($crate::log::Level::Debug, module_path!(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! validator_info {
    ($($arg:tt)*) => {{
        $crate::__log($crate::log::Level::Info, module_path!(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! validator_warn {
    ($($arg:tt)*) => {{
        $crate::__log($crate::log::Level::Warn, module_path!(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! validator_error {
    ($($arg:tt)*) => {{
        $crate::__log($crate::log::Level::Error, module_path!(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
