use clap::Args;

use named_log::Builder;

#[derive(Args, Debug)]
#[command(about = "Validate the configuration and list the loggers it produces.")]
pub struct Cmd {}

impl Cmd {
    pub fn run(&self, builder: &Builder) -> eyre::Result<()> {
        let registry = builder.build_registry()?;

        println!("Time format:    {}", builder.config().time_format);
        println!("Default logger: {}", registry.default_name());

        for name in registry.names() {
            let Some(logger) = registry.get(name) else {
                continue;
            };

            println!("{}", name);
            for (kind, level) in logger.sinks() {
                println!("  {:<8} >= {}", kind.to_string(), level);
            }
        }

        Ok(())
    }
}
