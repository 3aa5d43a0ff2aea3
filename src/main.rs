//! Command-line entry point for machine setup.
use anyhow::Result;
use clap::Parser;

use machine_setup::commands::{self, setup::SetupOptions};
use machine_setup::{cli, logging, prompt};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    if matches!(args.command, cli::Command::Version) {
        commands::version::run();
        return Ok(());
    }

    logging::init_subscriber(args.verbose, args.command.log_name());
    let log = logging::Logger::new(args.command.log_name());
    log.debug(&format!("machine-setup {}", commands::version::version()));

    let config_path = args.global.config_path();
    match args.command {
        cli::Command::Setup => {
            let opts = SetupOptions {
                config_path,
                interactive: !args.global.no_form,
            };
            let prompt = prompt::for_mode(opts.interactive);
            commands::setup::run(&opts, prompt.as_ref(), &log, commands::host_manager)?;
        }
        cli::Command::Update(opts) => {
            commands::update::run(&config_path, &opts.names, &log, commands::host_manager)?;
        }
        cli::Command::Uninstall(opts) => {
            commands::uninstall::run(&config_path, &opts.names, &log, commands::host_manager)?;
        }
        cli::Command::Status => {
            commands::status::run(&config_path, &log, commands::host_manager)?;
        }
        cli::Command::Version => {}
    }

    log.print_summary();
    Ok(())
}
