mod args;
mod survey;

use clap::Parser;
use log::{debug, warn};
use snafu::ErrorCompat;

use crate::args::{Args, Command};
use crate::survey::*;

fn run(args: &Args) -> SurveyResult<()> {
    match &args.command {
        Command::Merge {
            canonical,
            batch,
            canonical_delimiter,
            batch_delimiter,
            batch_type,
            excel_worksheet_name,
            out,
        } => {
            let settings = MergeSettings::from_args(
                canonical,
                batch,
                canonical_delimiter.as_deref(),
                batch_delimiter.as_deref(),
                batch_type.as_deref(),
                excel_worksheet_name.as_deref(),
                out.as_deref(),
            )?;
            let stats = run_merge(&settings)?;
            println!("Original rows: {}", stats.canonical_rows);
            println!("New rows:      {}", stats.batch_rows);
            println!("Total now:     {}", stats.merged_rows);
            Ok(())
        }
        Command::Summarize {
            config,
            input,
            out,
            reference,
        } => {
            run_summary(
                config,
                input.as_deref(),
                out.as_deref(),
                reference.as_deref(),
            )?;
            Ok(())
        }
    }
}

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    debug!("args: {:?}", args);

    if let Err(e) = run(&args) {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        let mut cause = std::error::Error::source(&e);
        while let Some(c) = cause {
            eprintln!("  caused by: {}", c);
            cause = c.source();
        }
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
