//! WXR extraction tool
//!
//! Runs a WordPress export through the streaming extractor and feeds every
//! record to one of the built-in handlers:
//!
//! - `print` writes each record as a debug line (default)
//! - `count` writes per-kind totals and items per post type
//! - `noop` only walks the document, useful for timing and validation

#![forbid(unsafe_code)]

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;
use wxrtools::handler::{HANDLER_NAMES, handler_by_name};
use wxrtools::{ExtractorConfig, RepairConfig, extract_path};

/// Command-line arguments for the extraction tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the WXR export file
    #[arg(value_name = "FILE")]
    wxr_file: PathBuf,

    /// Handler receiving the extracted records
    #[arg(
        long,
        default_value = "print",
        value_parser = clap::builder::PossibleValuesParser::new(HANDLER_NAMES)
    )]
    handler: String,

    /// Read the file as-is instead of repairing it with xmllint first
    #[arg(long)]
    no_repair: bool,

    /// Stop after this many items
    #[arg(short, long, value_name = "N")]
    limit: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // RUST_LOG, when set, takes precedence over -v
    env_logger::Builder::new()
        .filter_level(level(args.verbose))
        .parse_default_env()
        .init();

    let repair = if args.no_repair {
        RepairConfig::disabled()
    } else {
        RepairConfig::new()
    };
    let mut config = ExtractorConfig::new();
    if let Some(limit) = args.limit {
        config = config.with_limit(limit);
    }

    let result = handler_by_name(&args.handler)
        .and_then(|handler| extract_path(&args.wxr_file, handler, &repair, &config));

    match result {
        Ok(stats) => {
            log::info!(
                "{}: {} events, peak {} retained nodes",
                args.wxr_file.display(),
                stats.events,
                stats.peak_retained_nodes
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("wxrtool: {}: {}", args.wxr_file.display(), e);
            ExitCode::FAILURE
        }
    }
}
