//! clinanno-codes - extract ontology codes from XMI graph files
//!
//! ```bash
//! clinanno-codes --xmi-dir out/xmi --output-dir out/codes
//! ```

use clap::Parser;
use clinanno::cli::{commands, finish, output, CodesCli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = CodesCli::parse();
    output::init_logging(args.common.quiet);
    finish(commands::codes::run(&args))
}
