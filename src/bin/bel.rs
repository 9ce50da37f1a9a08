//! Command-line interface for bel
//!
//! Usage:
//!   bel validate `<path>...` [--report `<format>`] [--output `<file>`] [--json] [--force]
//!                            [--repair] [--fail-fast] [--config `<file>`]
//!   bel repair `<path>` [--output `<file>`] [--diff]
//!
//! Directories are walked for `*.bel` files; documents are validated in
//! parallel. The exit status is 1 when any document has errors.

use bel::bel::diagnostics::{render, ReportFormat};
use bel::bel::formats::ExportOptions;
use bel::bel::pipeline::{collect_inputs, validate_paths, DocumentOutcome, ParseOptions};
use bel::bel::repair::repair;
use bel_config::{BelConfig, Loader};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOCAL_CONFIG: &str = "bel.toml";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let matches = Command::new("bel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validate and repair BEL scripts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("validate")
                .about("Parse and validate BEL scripts, printing a diagnostic report")
                .arg(
                    Arg::new("paths")
                        .help("Files or directories to validate")
                        .required(true)
                        .num_args(1..)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .short('r')
                        .help("Report format: table, csv, tsv, markdown, json"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write the report to a file instead of stdout")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Export each valid document next to its input as <file>.json")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help("Export documents whose only errors are semantic")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("repair")
                        .long("repair")
                        .help("Run the repair pass before parsing")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("fail-fast")
                        .long("fail-fast")
                        .help("Stop each document at its first lexical error")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Configuration file layered over the defaults [default: ./bel.toml if present]")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("repair")
                .about("Apply textual repairs to a BEL script")
                .arg(
                    Arg::new("path")
                        .help("Script to repair")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write the repaired script to a file instead of stdout")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("diff")
                        .long("diff")
                        .help("Print a unified diff against the input instead of the repaired script")
                        .action(ArgAction::SetTrue),
                ),
        )
        .get_matches();

    let outcome = match matches.subcommand() {
        Some(("validate", args)) => handle_validate_command(args),
        Some(("repair", args)) => handle_repair_command(args),
        _ => Err("unknown command".to_string()),
    };

    match outcome {
        Ok(code) => code,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::from(2)
        }
    }
}

/// Defaults, then `--config` (or `bel.toml` in the working directory when
/// present), then command-line flags
fn load_config(args: &ArgMatches) -> Result<BelConfig, String> {
    let mut loader = match args.get_one::<PathBuf>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    if let Some(format) = args.get_one::<String>("report") {
        loader = loader
            .set_override("report.format", format.as_str())
            .map_err(|e| e.to_string())?;
    }
    for (flag, key) in [
        ("repair", "validation.repair"),
        ("fail-fast", "validation.fail_fast"),
        ("force", "export.force"),
    ] {
        if args.get_flag(flag) {
            loader = loader.set_override(key, true).map_err(|e| e.to_string())?;
        }
    }
    loader.build().map_err(|e| format!("invalid configuration: {}", e))
}

fn write_output(output: Option<&PathBuf>, text: &str) -> Result<(), String> {
    match output {
        Some(path) => fs::write(path, text).map_err(|e| format!("{}: {}", path.display(), e)),
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}

fn render_outcomes(outcomes: &[DocumentOutcome], format: ReportFormat) -> Result<String, String> {
    if format == ReportFormat::Json {
        let documents: Vec<serde_json::Value> = outcomes
            .iter()
            .map(|outcome| {
                serde_json::json!({
                    "path": outcome.path.display().to_string(),
                    "valid": outcome.result.is_valid(),
                    "diagnostics": outcome.result.diagnostics,
                })
            })
            .collect();
        return serde_json::to_string_pretty(&documents)
            .map(|json| json + "\n")
            .map_err(|e| e.to_string());
    }

    let mut output = String::new();
    for outcome in outcomes {
        output.push_str(&format!(
            "# {} ({} errors, {} warnings)\n",
            outcome.path.display(),
            outcome.result.error_count(),
            outcome.result.warning_count()
        ));
        if !outcome.result.diagnostics.is_empty() {
            let report = render(&outcome.result.diagnostics, format).map_err(|e| e.to_string())?;
            output.push_str(&report);
        }
        output.push('\n');
    }
    Ok(output)
}

/// Handle the validate command
fn handle_validate_command(args: &ArgMatches) -> Result<ExitCode, String> {
    let config = load_config(args)?;
    let options = ParseOptions::from(&config);
    let format = ReportFormat::from(config.report.format);
    let export_options = ExportOptions::from(&config.export);

    let paths: Vec<PathBuf> = args
        .get_many::<PathBuf>("paths")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let inputs = collect_inputs(&paths).map_err(|e| e.to_string())?;
    tracing::info!(documents = inputs.len(), "validating");

    let mut outcomes = Vec::new();
    let mut failed = false;
    for result in validate_paths(&inputs, &options) {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(error) => {
                eprintln!("Error: {}", error);
                failed = true;
            }
        }
    }

    if args.get_flag("json") {
        for outcome in &outcomes {
            match outcome.export(&export_options) {
                Ok(path) => eprintln!("Exported {}", path.display()),
                Err(error) => eprintln!("Skipped export: {}", error),
            }
        }
    }

    let report = render_outcomes(&outcomes, format)?;
    write_output(args.get_one::<PathBuf>("output"), &report)?;

    if failed || outcomes.iter().any(|outcome| !outcome.result.is_valid()) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Handle the repair command
fn handle_repair_command(args: &ArgMatches) -> Result<ExitCode, String> {
    let path = args
        .get_one::<PathBuf>("path")
        .ok_or_else(|| "a path is required".to_string())?;
    let bytes = fs::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let source = String::from_utf8_lossy(&bytes);
    let report = repair(&source);
    tracing::info!(changes = report.changes.len(), "repaired {}", path.display());

    let text = if args.get_flag("diff") {
        report.diff()
    } else {
        report.text
    };
    write_output(args.get_one::<PathBuf>("output"), &text)?;
    Ok(ExitCode::SUCCESS)
}
