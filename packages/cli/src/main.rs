#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Merges credit-card statements into a single CSV ledger.
//!
//! Each statement's transaction table is reconstructed from positioned
//! text, the tables are concatenated in document order, and the rows are
//! enriched with parsed dates, amounts, and merchant details before export.
//!
//! Uses `indicatif-log-bridge` (via
//! [`statement_ledger_cli_utils::init_logger`]) so log lines and progress
//! bars never fight for the terminal.

mod args;
mod export;
mod pipeline;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use statement_ledger::TableExtractor;
use statement_ledger_cli_utils::{IndicatifProgress, MultiProgress};
use statement_ledger_models::{CardIdentity, StatementLayout};

use crate::args::ArgsError;
use crate::pipeline::Pipeline;

#[derive(Parser)]
#[command(
    name = "statement_ledger",
    about = "Merge credit card statement PDFs into a single CSV file"
)]
#[command(group(ArgGroup::new("input").required(true).args(["folder", "files"])))]
struct Cli {
    /// First four digits of the card number
    #[arg(short = 'f', long, value_name = "1234")]
    first_digits: String,

    /// Last four digits of the card number
    #[arg(short = 'l', long, value_name = "5678")]
    last_digits: String,

    /// Directory of statements to merge (not searched recursively)
    #[arg(long, value_name = "DIR")]
    folder: Option<PathBuf>,

    /// Statements to merge, in order
    #[arg(long, num_args = 1.., value_name = "PDF")]
    files: Vec<PathBuf>,

    /// Output CSV file
    #[arg(short, long, default_value = "statements_data.csv", value_name = "CSV")]
    out: PathBuf,

    /// Year used when no statement date is found
    #[arg(
        short = 'y',
        long,
        alias = "default_year",
        default_value = "2000",
        value_name = "YYYY"
    )]
    default_year: String,

    /// TOML file overriding the statement layout
    #[arg(long, value_name = "TOML")]
    layout: Option<PathBuf>,

    /// Save each statement's tokens as JSON into this directory
    #[arg(long, value_name = "DIR")]
    dump_tokens: Option<PathBuf>,
}

fn main() -> ExitCode {
    let multi = statement_ledger_cli_utils::init_logger();
    let cli = Cli::parse();

    match run(&cli, &multi) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    args::check_card_digits(&cli.first_digits)?;
    args::check_card_digits(&cli.last_digits)?;
    let documents = args::expand_documents(cli.folder.as_deref(), &cli.files)?;

    let layout = match &cli.layout {
        Some(path) => {
            let contents = std::fs::read_to_string(path).map_err(ArgsError::Io)?;
            log::info!("Using layout from {}", path.display());
            StatementLayout::from_toml_str(&contents)?
        }
        None => StatementLayout::default(),
    };

    let card = CardIdentity::new(&cli.first_digits, &cli.last_digits);
    let extractor = TableExtractor::with_layout(&card, layout);
    let pipeline = Pipeline {
        extractor: &extractor,
        default_year: &cli.default_year,
        dump_dir: cli.dump_tokens.as_deref(),
    };

    log::info!("Processing {} statements", documents.len());
    let progress =
        IndicatifProgress::documents_bar(multi, "Parsing statements", documents.len() as u64);
    let transactions = pipeline.run(&documents, progress.as_ref(), &|name| {
        IndicatifProgress::pages_bar(multi, name)
    })?;

    let file = File::create(&cli.out)?;
    export::write_csv(BufWriter::new(file), &transactions)?;

    progress.finish(format!(
        "Wrote {} transactions to {}",
        transactions.len(),
        cli.out.display()
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_folder_invocation_with_defaults() {
        let cli = Cli::try_parse_from([
            "statement_ledger",
            "-f",
            "1111",
            "-l",
            "2222",
            "--folder",
            "statements",
        ])
        .unwrap();

        assert_eq!(cli.folder, Some(PathBuf::from("statements")));
        assert!(cli.files.is_empty());
        assert_eq!(cli.out, PathBuf::from("statements_data.csv"));
        assert_eq!(cli.default_year, "2000");
    }

    #[test]
    fn parses_multiple_files() {
        let cli = Cli::try_parse_from([
            "statement_ledger",
            "--first-digits",
            "1111",
            "--last-digits",
            "2222",
            "--files",
            "a.pdf",
            "b.pdf",
            "-y",
            "2023",
        ])
        .unwrap();

        assert_eq!(cli.files, vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
        assert_eq!(cli.default_year, "2023");
    }

    #[test]
    fn folder_and_files_are_exclusive_and_one_is_required() {
        assert!(
            Cli::try_parse_from([
                "statement_ledger",
                "-f",
                "1111",
                "-l",
                "2222",
                "--folder",
                "statements",
                "--files",
                "a.pdf",
            ])
            .is_err()
        );
        assert!(Cli::try_parse_from(["statement_ledger", "-f", "1111", "-l", "2222"]).is_err());
    }

    #[test]
    fn validation_failure_is_an_error() {
        let cli = Cli::try_parse_from([
            "statement_ledger",
            "-f",
            "1111",
            "-l",
            "2222",
            "--files",
            "definitely_missing_statement.pdf",
        ])
        .unwrap();

        let result = run(&cli, &MultiProgress::new());

        assert!(result.is_err());
    }
}
