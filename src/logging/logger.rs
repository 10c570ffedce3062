use std::{collections::HashMap, io::IsTerminal, sync::Arc};

use chrono::Local;

use super::{
    dispatcher::Dispatcher,
    formatters::{ConsoleFormatter, PlainFormatter},
    registry::Registry,
    sinks::{ConsoleSink, ConsoleWriter, RotatingFileSink},
    time_format::TimeFormat,
    LogSink, Record, Severity,
};
use crate::config::{ConfigError, FacilityConfig, SinkKind, SinkSpec};

struct AttachedSink {
    level: Severity,
    sink: Box<dyn LogSink>,
}

/// A named bundle of sinks sharing one timestamp format.
pub struct Logger {
    name: String,
    time_format: TimeFormat,
    sinks: Vec<AttachedSink>,
}

impl Logger {
    pub fn new(name: impl Into<String>, time_format: TimeFormat) -> Self {
        Self {
            name: name.into(),
            time_format,
            sinks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attach(&mut self, level: Severity, sink: Box<dyn LogSink>) {
        self.sinks.push(AttachedSink { level, sink });
    }

    /// Kind and minimum severity of every sink, in attachment order.
    pub fn sinks(&self) -> Vec<(SinkKind, Severity)> {
        self.sinks
            .iter()
            .map(|attached| (attached.sink.kind(), attached.level))
            .collect()
    }

    pub fn accepts(&self, level: Severity) -> bool {
        self.sinks.iter().any(|attached| attached.level <= level)
    }

    /// Writes `message` to every sink whose minimum severity is at or below `level`.
    ///
    /// All accepting sinks are attempted; the first failure is returned.
    pub fn log(&self, level: Severity, message: &str) -> eyre::Result<()> {
        if !self.accepts(level) {
            return Ok(());
        }

        let time = Local::now();
        let record = Record {
            level,
            timestamp: self.time_format.format(&time),
            time,
            message,
        };

        let mut result = Ok(());
        for attached in self.sinks.iter().filter(|attached| attached.level <= level) {
            if let Err(err) = attached.sink.write_log(&record) {
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }

        result
    }

    pub fn flush(&self) {
        for attached in &self.sinks {
            attached.sink.flush();
        }
    }
}

pub type ConsoleWriterFactory = Box<dyn Fn() -> ConsoleWriter + Send + Sync>;

pub struct Builder {
    config: FacilityConfig,
    use_ansi: bool,
    console_writer: ConsoleWriterFactory,
    legacy_empty_sink_level: bool,
}

impl Builder {
    pub fn new(config: FacilityConfig) -> Self {
        Self {
            config,
            use_ansi: std::io::stdout().is_terminal(),
            console_writer: Box::new(|| Box::new(std::io::stdout())),
            legacy_empty_sink_level: false,
        }
    }

    pub fn with_ansi(self, use_ansi: bool) -> Self {
        Self { use_ansi, ..self }
    }

    pub fn with_console_writer(
        self,
        factory: impl Fn() -> ConsoleWriter + Send + Sync + 'static,
    ) -> Self {
        Self {
            console_writer: Box::new(factory),
            ..self
        }
    }

    /// A logger without sinks gets a console sink at the level of the last sink
    /// seen in an earlier logger instead of debug.
    pub fn with_legacy_empty_sink_level(self, enabled: bool) -> Self {
        Self {
            legacy_empty_sink_level: enabled,
            ..self
        }
    }

    pub fn config(&self) -> &FacilityConfig {
        &self.config
    }

    pub fn build(&self) -> eyre::Result<Dispatcher> {
        Ok(Dispatcher::new(self.build_registry()?))
    }

    pub fn build_registry(&self) -> eyre::Result<Registry> {
        self.config.validate()?;

        let default_name = self.config.default_logger_name.clone();
        let mut loggers: HashMap<String, Arc<Logger>> = HashMap::new();

        if let Some(named_loggers) = &self.config.named_logger_options {
            let mut last_seen_level: Option<Severity> = None;

            for named in named_loggers {
                let logger = match named.sinks() {
                    Some(specs) => {
                        last_seen_level = specs.last().map(|spec| spec.level);
                        self.new_logger(&named.name, specs)?
                    }
                    None => {
                        let level = self.empty_sink_level(&named.name, last_seen_level)?;
                        log::warn!(
                            target: "named_log",
                            "logger {} declares no sinks, attaching a console sink at {}",
                            named.name,
                            level
                        );
                        self.new_logger(&named.name, &[SinkSpec::console(level)])?
                    }
                };

                if loggers.insert(named.name.clone(), Arc::new(logger)).is_some() {
                    log::warn!(target: "named_log", "logger {} is configured more than once, keeping the last one", named.name);
                }
            }
        }

        let default = match loggers.get(&default_name).cloned() {
            Some(logger) => logger,
            None => {
                log::debug!(target: "named_log", "synthesizing default logger {}", default_name);
                let logger = Arc::new(self.synthesized_default()?);
                loggers.insert(default_name.clone(), logger.clone());
                logger
            }
        };

        Ok(Registry::new(default_name, loggers, default))
    }

    fn empty_sink_level(
        &self,
        name: &str,
        last_seen_level: Option<Severity>,
    ) -> eyre::Result<Severity> {
        if !self.legacy_empty_sink_level {
            return Ok(Severity::Debug);
        }

        last_seen_level.ok_or_else(|| ConfigError::NoCarriedLevel(name.to_string()).into())
    }

    fn synthesized_default(&self) -> eyre::Result<Logger> {
        let name = &self.config.default_logger_name;
        match self
            .config
            .fallback_sinks
            .as_deref()
            .filter(|sinks| !sinks.is_empty())
        {
            Some(specs) => self.new_logger(name, specs),
            None => self.new_logger(name, &[SinkSpec::console(Severity::Debug)]),
        }
    }

    fn new_logger(&self, name: &str, specs: &[SinkSpec]) -> eyre::Result<Logger> {
        let mut logger = Logger::new(name, TimeFormat::new(&self.config.time_format));

        for spec in specs {
            logger.attach(spec.level, self.build_sink(spec)?);
        }

        log::debug!(target: "named_log", "built logger {} with {} sink(s)", name, specs.len());
        Ok(logger)
    }

    fn build_sink(&self, spec: &SinkSpec) -> eyre::Result<Box<dyn LogSink>> {
        match spec.kind {
            SinkKind::Console => Ok(Box::new(ConsoleSink::new(
                (self.console_writer)(),
                Box::new(ConsoleFormatter::new(self.use_ansi)),
            ))),
            SinkKind::File => {
                let sink = RotatingFileSink::new(
                    spec.dirname(),
                    spec.filename(),
                    spec.date_pattern(),
                    Box::new(PlainFormatter),
                )?;
                Ok(Box::new(sink))
            }
        }
    }
}
