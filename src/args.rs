pub mod database;
pub mod types;
pub mod validation;

use clap::Parser;

pub use types::*;

/// Parses the command line, exiting with clap's usage message on bad input.
#[must_use]
pub fn args_checks() -> CleanArgs {
    let mut args = Args::parse();
    if let Err(e) = args.validate() {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }
    CleanArgs::from(args)
}
