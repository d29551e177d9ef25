mod args;
mod steps;

use std::process::ExitCode;

use clap::Parser;
use sql_request::prelude::*;
use tracing::{error, info};

use crate::args::Args;

type Step = fn(&ConnectionTarget) -> Result<(), SqlRequestError>;

const STEPS: [(&str, Step); 8] = [
    ("0. Prepare the Test table", steps::prepare_table),
    ("A.1. Unreachable server, then the configured one", steps::check_connection),
    ("A.2. Malformed query", steps::check_query),
    ("B.1. Read every row", steps::select_all),
    ("B.2. Read the row with id 2", steps::select_by_id),
    ("C.1. Insert a row, then read it", steps::insert),
    ("C.2. Read the last row, update it, read it again", steps::update),
    ("C.3. Insert a row, then delete it", steps::delete),
];

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(args.log_level)
        .init();

    let target = match args.target() {
        Ok(target) => target,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    info!(backend = ?target.database_type(), "SqlRequest usage examples");

    let mut failed = 0;
    for (title, step) in STEPS {
        info!("{title}");
        if let Err(err) = step(&target) {
            error!("{title} failed: {err}");
            failed += 1;
        }
        println!();
    }

    info!(failed, "end of program");
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
