use std::fmt::Display;

use clap::Args;

use named_log::{Builder, Severity};

#[derive(Args, Debug)]
#[command(about = "Write a single line through a named logger.")]
pub struct Cmd {
    #[arg(index = 1, help = "Logger name, unknown names go to the default logger.")]
    pub logger: String,

    #[arg(
        index = 2,
        value_parser = parse_level,
        help = "verbose, debug, info, warn, error or their codes 0-4. Other codes log as verbose."
    )]
    pub level: Severity,

    #[arg(index = 3, num_args = 1.., trailing_var_arg = true)]
    pub message: Vec<String>,
}

impl Display for Cmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}> {}", self.logger, self.level)
    }
}

fn parse_level(raw: &str) -> eyre::Result<Severity> {
    if let Ok(code) = raw.parse::<i64>() {
        return Ok(Severity::from_code(code));
    }

    Ok(raw.parse()?)
}

impl Cmd {
    pub fn run(&self, builder: &Builder) -> eyre::Result<()> {
        let dispatcher = builder.build()?;

        let message = self.message.join(" ");
        named_log::log_to!(dispatcher, &self.logger, self.level, "{}", message)?;

        dispatcher.flush();
        Ok(())
    }
}
