use std::borrow::Cow;

use eyre::Context;
use log::{LevelFilter, Log};

use super::{call_site::CallSite, registry::Registry, Severity};

/// Routes log calls to named loggers, annotating each line with its call-site.
pub struct Dispatcher {
    registry: Registry,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn default_logger_name(&self) -> &str {
        self.registry.default_name()
    }

    /// Logs `message` through the logger called `name`, or the default logger if
    /// there is none.
    ///
    /// The call-site is the caller's file and line only (`service.rs:40`); the
    /// [`log_to!`](crate::log_to) family of macros also records the enclosing
    /// function (`service.rs.hello:40`).
    #[track_caller]
    pub fn log(&self, name: &str, level: Severity, message: &str) -> eyre::Result<()> {
        self.log_at(&CallSite::caller(), name, level, message)
    }

    /// Like [`Dispatcher::log`] with a numeric level; unknown codes log as verbose.
    #[track_caller]
    pub fn log_code(&self, name: &str, code: i64, message: &str) -> eyre::Result<()> {
        self.log_at(&CallSite::caller(), name, Severity::from_code(code), message)
    }

    pub fn log_at(
        &self,
        call_site: &CallSite,
        name: &str,
        level: Severity,
        message: &str,
    ) -> eyre::Result<()> {
        let (display_name, logger) = self.registry.resolve(name);
        if !logger.accepts(level) {
            return Ok(());
        }

        logger.log(level, &format_line(display_name, call_site, message))
    }

    pub fn flush(&self) {
        for logger in self.registry.loggers() {
            logger.flush();
        }
    }

    /// Installs the dispatcher as the `log` crate backend. Record targets are
    /// used as logger names.
    pub fn install(self, max_level: LevelFilter) -> eyre::Result<()> {
        log::set_max_level(max_level);
        log::set_boxed_logger(Box::new(self)).context("Failed registering boxed logger")?;

        Ok(())
    }
}

pub fn format_line(display_name: &str, call_site: &CallSite, message: &str) -> String {
    format!("<{}> [{}] {}", display_name, call_site, message)
}

// `log` records carry no function name, only file and line.
fn record_call_site(record: &log::Record) -> CallSite {
    match (record.file(), record.line()) {
        (Some(file), Some(line)) => CallSite::Known {
            file: Cow::Owned(file.to_string()),
            function: None,
            line,
        },
        _ => CallSite::Unknown,
    }
}

impl Log for Dispatcher {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let (_, logger) = self.registry.resolve(metadata.target());
        logger.accepts(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();
        if let Err(err) = self.log_at(
            &record_call_site(record),
            record.target(),
            record.level().into(),
            &message,
        ) {
            eprintln!("named-log: failed writing record: {:#}", err);
        }
    }

    fn flush(&self) {
        Dispatcher::flush(self)
    }
}
