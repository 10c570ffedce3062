use clap::Args;

use named_log::{Builder, Dispatcher, FacilityConfig, NamedLoggerConfig, Severity, SinkSpec};

#[derive(Args, Debug)]
#[command(about = "Emit a fixed batch of lines through the default, test and sample loggers.")]
pub struct Cmd {}

/// Console default logger plus two loggers splitting info and error lines into
/// separate daily files under `logs/`.
pub fn sample_config() -> FacilityConfig {
    let file_logger = |name: &str| {
        NamedLoggerConfig::new(
            name,
            vec![
                SinkSpec::file(Severity::Info, "logs", format!("{}_info.log", name))
                    .with_date_pattern("YYYY-MM-DD"),
                SinkSpec::file(Severity::Error, "logs", format!("{}_error.log", name))
                    .with_date_pattern("YYYY-MM-DD"),
                SinkSpec::console(Severity::Debug),
            ],
        )
    };

    FacilityConfig::new("default")
        .with_time_format("YYYY-MM-DD HH:mm:ss.SSS")
        .with_logger(NamedLoggerConfig::new(
            "default",
            vec![SinkSpec::console(Severity::Debug)],
        ))
        .with_logger(file_logger("test"))
        .with_logger(file_logger("sample"))
        .with_fallback_sinks(vec![SinkSpec::console(Severity::Debug)])
}

impl Cmd {
    pub fn run(&self, builder: &Builder) -> eyre::Result<()> {
        let dispatcher = builder.build()?;

        // A failed write is reported and the batch abandoned, the command itself succeeds.
        if let Err(err) = self.say_hello(&dispatcher) {
            eprintln!("{:?}", err);
        }

        dispatcher.flush();
        Ok(())
    }

    fn say_hello(&self, logger: &Dispatcher) -> eyre::Result<()> {
        let default = logger.default_logger_name();

        named_log::debug!(logger, default, "Hello World")?;
        named_log::info!(logger, default, "Hello World")?;
        named_log::info!(logger, "test", "TEST Hello World")?;
        named_log::error!(logger, "test", "TEST Hello World")?;
        named_log::debug!(logger, "test", "TEST Hello World")?;
        named_log::info!(logger, default, "Hello World")?;
        named_log::debug!(logger, "sample", "TEST Hello World")?;
        named_log::error!(logger, "sample", "TEST Hello World")?;

        Ok(())
    }
}
