use std::{fmt::Display, path::PathBuf};

use clap::{Parser, Subcommand};
use eyre::Context;

use named_log::{
    config::{ConfigManager, LocalConfigManager},
    Builder, FacilityConfig,
};

mod check;
mod demo;
mod emit;

#[derive(Subcommand, Debug)]
pub enum NamedLogCmd {
    Demo(demo::Cmd),

    Emit(emit::Cmd),

    Check(check::Cmd),
}

impl Display for NamedLogCmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NamedLogCmd::Demo(_cmd) => write!(f, "demo"),
            NamedLogCmd::Emit(cmd) => write!(f, "emit {}", cmd),
            NamedLogCmd::Check(_cmd) => write!(f, "check"),
        }
    }
}

#[derive(Parser)]
#[command(version, long_version = "")]
#[command(about = "Routes log lines to named console and rotating file loggers.", long_about = None, disable_help_subcommand = true)]
pub struct NamedLog {
    #[arg(
        global = true,
        long,
        short = 'c',
        help = "Path to a JSON logging configuration. Defaults to $XDG_CONFIG_HOME/named-log/config.json when it exists.",
        display_order = 0
    )]
    pub config: Option<PathBuf>,

    #[arg(
        global = true,
        long,
        help = "Disable colored level names on console sinks.",
        display_order = 1
    )]
    pub no_color: bool,

    #[arg(
        global = true,
        long,
        help = "Give loggers without sinks the level of the last sink declared before them instead of debug.",
        display_order = 2
    )]
    pub legacy_empty_sink_level: bool,

    #[command(subcommand)]
    pub cmd: NamedLogCmd,
}

impl NamedLog {
    fn builder(&self, config: FacilityConfig) -> Builder {
        let mut builder =
            Builder::new(config).with_legacy_empty_sink_level(self.legacy_empty_sink_level);

        if self.no_color {
            builder = builder.with_ansi(false);
        }

        builder
    }

    fn load_config(&self, fallback: impl FnOnce() -> FacilityConfig) -> eyre::Result<FacilityConfig> {
        let manager = LocalConfigManager::new(self.config.clone());
        let path = manager.get_config_path()?;

        if self.config.is_none() && !path.exists() {
            return Ok(fallback());
        }

        manager
            .load()
            .with_context(|| format!("Failed loading configuration for {}", &self.cmd))
    }

    pub fn run(self) -> eyre::Result<()> {
        match &self.cmd {
            NamedLogCmd::Demo(demo) => {
                let config = self.load_config(demo::sample_config)?;
                demo.run(&self.builder(config))
            }
            NamedLogCmd::Emit(emit) => {
                let config = self.load_config(FacilityConfig::default)?;
                emit.run(&self.builder(config))
            }
            NamedLogCmd::Check(check) => {
                let config = self.load_config(FacilityConfig::default)?;
                check.run(&self.builder(config))
            }
        }
    }
}
