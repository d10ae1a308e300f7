// Chunk: docs/chunks/viewer_cli - Load, edit and print a file through the gap buffer

//! gapline binary entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use gapline::{init_logging, run, CliArgs};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    match run(&args, io::stdout().lock()) {
        Ok(stats) => {
            if args.stats {
                eprintln!("{stats}");
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("gapline: {error:#}");
            ExitCode::FAILURE
        }
    }
}
