pub mod call_site;
mod dispatcher;
mod formatters;
mod logger;
mod registry;
mod severity;
mod sinks;
pub mod time_format;

use chrono::{DateTime, Local};

use crate::config::SinkKind;

pub use call_site::{CallSite, Frame, CALLER_FRAME_INDEX};
pub use dispatcher::{format_line, Dispatcher};
pub use formatters::{ConsoleFormatter, PlainFormatter};
pub use logger::{Builder, ConsoleWriterFactory, Logger};
pub use registry::Registry;
pub use severity::Severity;
pub use sinks::{ConsoleSink, ConsoleWriter, RotatingFileSink};

/// One log line as handed to sinks. The timestamp is rendered once per logger.
pub struct Record<'a> {
    pub level: Severity,
    pub time: DateTime<Local>,
    pub timestamp: String,
    pub message: &'a str,
}

pub trait LogFormatter: Sync + Send {
    fn format(&self, record: &Record) -> String;
}

pub trait LogSink: Sync + Send {
    fn write_log(&self, record: &Record) -> eyre::Result<()>;
    fn flush(&self);
    fn kind(&self) -> SinkKind;
}
