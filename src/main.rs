#![forbid(unsafe_code)]

//! advancepurge — purge unneeded locale, manual, help and documentation files.

use clap::Parser;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse_from(cli_app::retain_known_args(std::env::args_os()));
    if let Err(e) = cli_app::run(&args) {
        eprintln!("advancepurge: {e}");
        std::process::exit(e.exit_code());
    }
}
