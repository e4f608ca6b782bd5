mod cli;
mod command;
mod config;
mod error;
mod shadow {
    #![allow(clippy::needless_raw_string_hashes)]
    use shadow_rs::shadow;
    shadow!(build);

    pub use self::build::*;
}

use clap::Parser;

use self::{cli::Cli, error::CommandError};

fn main() {
    // variables from `.env` never override the process environment
    dotenvy::dotenv().ok();

    if let Err(err) = Cli::parse().run() {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}
