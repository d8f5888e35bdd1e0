//! `stix_req` binary: a thin wrapper around the library's CLI helpers.

use std::process;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use stix_req::cli::{self, Cli};

fn main() -> Result<()> {
    let args = Cli::parse();
    cli::init_logging(&args)?;

    let Some(invocation) = args.invocation() else {
        Cli::command().print_help()?;
        println!();
        process::exit(1);
    };

    match cli::run(&args, &invocation) {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            eprintln!("stix_req error: {e:#}");
            process::exit(1);
        }
    }
}
