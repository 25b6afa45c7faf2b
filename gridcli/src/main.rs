use clap::Parser;
use colored::Colorize;
use gridlib::io::ScenarioSet;
use gridlib::*;
use std::path::{Path, PathBuf};

/// Log an error and exit the process with the given code.
macro_rules! fatal_error {
    ($code:expr, $($arg:tt)*) => {{
        log::error!($($arg)*);
        std::process::exit($code)
    }};
}

mod commands;
use commands::*;

/// Cascading failure simulator for electrical distribution grids.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    cli.command.run();
}
