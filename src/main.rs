mod cli;
mod config;
mod error;
mod models;
mod sources;

use clap::Parser;
use env_logger::Builder as LoggerBuilder;
use log::LevelFilter;

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = LoggerBuilder::new();
    builder.filter(None, level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn main() {
    let cli = cli::Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = cli::run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
