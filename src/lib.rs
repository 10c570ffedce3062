//! Named loggers with per-sink severity thresholds.
//!
//! A [`FacilityConfig`] describes loggers by name, each with console and/or
//! date-rotated file sinks. [`build_logging_facility`] turns it into a
//! [`Dispatcher`] which routes every call to the logger of the requested name,
//! or to the default logger when no such logger exists, and prefixes the
//! message with the logger name and call-site:
//!
//! ```text
//! [2024-03-07 14:05:09.042] - info: <test> [service.rs.hello:12] TEST Hello World
//! ```
//!
//! ```rust,no_run
//! use named_log::{build_logging_facility, FacilityConfig, Severity};
//!
//! let facility = build_logging_facility(FacilityConfig::new("default"))?;
//! facility.log("default", Severity::Info, "up")?;
//! named_log::warn!(facility, "db", "slow query took {}ms", 1200)?;
//! # Ok::<(), eyre::Report>(())
//! ```

pub mod config;
pub mod logging;

pub use config::{ConfigError, FacilityConfig, NamedLoggerConfig, SinkKind, SinkSpec};
pub use logging::{Builder, CallSite, Dispatcher, Registry, Severity};

/// Builds the registry for `config` with default console settings.
pub fn build_logging_facility(config: FacilityConfig) -> eyre::Result<Dispatcher> {
    Builder::new(config).build()
}

/// Logs a formatted message through a [`Dispatcher`], recording the enclosing
/// function as part of the call-site.
#[macro_export]
macro_rules! log_to {
    ($dispatcher:expr, $name:expr, $level:expr, $($arg:tt)+) => {
        $dispatcher.log_at(
            &$crate::call_site!(),
            $name,
            $level,
            &::std::format!($($arg)+),
        )
    };
}

#[macro_export]
macro_rules! verbose {
    ($dispatcher:expr, $name:expr, $($arg:tt)+) => {
        $crate::log_to!($dispatcher, $name, $crate::Severity::Verbose, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($dispatcher:expr, $name:expr, $($arg:tt)+) => {
        $crate::log_to!($dispatcher, $name, $crate::Severity::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($dispatcher:expr, $name:expr, $($arg:tt)+) => {
        $crate::log_to!($dispatcher, $name, $crate::Severity::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($dispatcher:expr, $name:expr, $($arg:tt)+) => {
        $crate::log_to!($dispatcher, $name, $crate::Severity::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($dispatcher:expr, $name:expr, $($arg:tt)+) => {
        $crate::log_to!($dispatcher, $name, $crate::Severity::Error, $($arg)+)
    };
}
