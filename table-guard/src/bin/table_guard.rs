//! table-guard command line
//!
//! Validates a dataset against a YAML rule file and writes JSON and Markdown
//! reports.
//!
//! ```text
//! table-guard --input data/customers.csv --config rules.yaml --output report
//! ```
//!
//! Exit status: 0 when the data passed, 1 when violations were found, 2 when
//! the run could not complete.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use table_guard::constraints::DuplicateMarking;
use table_guard::formatters::{write_reports, FormatterConfig, HumanFormatter};
use table_guard::logging::setup::{init_logging, LoggingConfig};
use table_guard::prelude::*;
use table_guard::sources::source_for_path;
use tracing::error;

#[derive(Parser, Debug)]
#[command(author, version, about = "Rule-based validation for tabular datasets", long_about = None)]
struct Args {
    /// Dataset to validate (CSV, TSV, JSON, NDJSON, Parquet or Excel)
    #[arg(long)]
    input: PathBuf,

    /// YAML file with the validation rules
    #[arg(long)]
    config: PathBuf,

    /// Report path prefix; writes <prefix>.json and <prefix>.md
    #[arg(long, default_value = "validation_report")]
    output: PathBuf,

    /// Flag every occurrence of a duplicated value, including the first
    #[arg(long)]
    all_duplicates: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Log each rule and data operation
    #[arg(long, short)]
    verbose: bool,

    /// Maximum violations printed to the console
    #[arg(long, default_value_t = 20)]
    max_violations: usize,
}

async fn run(args: &Args) -> Result<ValidationResult> {
    let log = if args.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };

    let rules = RuleSet::from_path(&args.config)?;
    let table = source_for_path(&args.input, log.clone())?.load().await?;

    let marking = if args.all_duplicates {
        DuplicateMarking::All
    } else {
        DuplicateMarking::AllButFirst
    };
    let validator = Validator::builder()
        .duplicate_marking(marking)
        .log_config(log)
        .build();
    let result = validator.validate(&table, rules.rules())?;

    let paths = write_reports(&result, &args.output)?;

    let console = FormatterConfig::console().with_max_violations(Some(args.max_violations));
    print!("{}", HumanFormatter::with_config(console).format(&result)?);
    println!(
        "Reports saved as {} and {}",
        paths.json.display(),
        paths.markdown.display()
    );
    Ok(result)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let logging = if args.verbose {
        LoggingConfig::development()
    } else {
        LoggingConfig::default()
    };
    if let Err(e) = init_logging(logging.with_json_format(args.json_logs)) {
        eprintln!("warning: could not initialize logging: {e}");
    }

    match run(&args).await {
        Ok(result) if result.passed => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            error!(error = %e, "Validation run failed");
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
