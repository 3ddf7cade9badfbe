use clap::Parser;
use gibbsmotif::{
    cli::{init_verbose, Cli, Command, FULL_VERSION},
    commands::{discover, simulate, validate},
    utils::{handle_error_and_exit, Result},
};

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    let subcommand_name = match cli.command {
        Command::Discover(_) => "discover",
        Command::Validate(_) => "validate",
        Command::Simulate(_) => "simulate",
    };

    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        *FULL_VERSION,
        subcommand_name
    );
    match cli.command {
        Command::Discover(args) => discover::discover(args)?,
        Command::Validate(args) => validate::validate(args)?,
        Command::Simulate(args) => simulate::simulate(args)?,
    }
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
