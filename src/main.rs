use anyhow::Result;
use clap::Parser;

use exporter_deploy::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose);
    let log = logging::Logger::new();

    match args.command {
        cli::Command::Deploy => commands::deploy::run(&args.global, &log),
        cli::Command::Plan(opts) => commands::plan::run(&args.global, &opts, &log),
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
