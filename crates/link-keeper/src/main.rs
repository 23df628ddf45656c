use clap::Parser;
use link_keeper::cli::Cli;
use link_keeper::config::Config;
use link_keeper::workspace::Workspace;
use link_keeper::{commands, logging};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(if cli.verbose { "debug" } else { "info" });

    let config = Config::load(&cli.root, cli.config.as_deref())?;
    let mut workspace = Workspace::load(&cli.root, config)?;

    let output = commands::run(&mut workspace, cli.command)?;
    println!("{}", output);
    Ok(())
}
