mod command;
mod prompt;
mod render;
mod wizard;

use clap::Parser;
use colored::Colorize;
use fluvio_future::task::run_block_on;

use self::command::Cli;

fn main() {
    fluvio_future::subscriber::init_logger();

    let cli = Cli::parse();

    if let Err(err) = run_block_on(cli.process()) {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
