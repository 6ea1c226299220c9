mod check_cmd;
mod cli;
mod config;
mod cumulate_cmd;
mod logging;
mod notify;
mod peq_cmd;
mod tables;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Cumulate(args) => cumulate_cmd::run(args),
        Command::Peq(args) => peq_cmd::run(args),
        Command::Check(args) => check_cmd::run(args),
    }
}
