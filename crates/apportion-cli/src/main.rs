use anyhow::Result;
use apportion_cli::cli::Cli;
use apportion_cli::config::{ApportionConfig, IgnoredOverride};
use apportion_cli::logging::init_logging;
use apportion_cli::run;
use clap::Parser;
use tracing::{debug, info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, source) = ApportionConfig::load(cli.config.as_deref())?;
    let (config, ignored) = config.apply_env();
    init_logging(&config.logging)?;

    for IgnoredOverride { variable, value } in &ignored {
        warn!(variable, value = %value, "ignoring unrecognised environment override");
    }

    if source.found {
        info!(path = %source.path.display(), "loaded configuration");
    } else {
        debug!(path = %source.path.display(), "no configuration file, using defaults");
    }

    let output = run(&cli, &config)?;
    println!("{output}");
    Ok(())
}
