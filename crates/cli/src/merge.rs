//! `elreg merge` - apply a monthly update batch to the register.

use std::path::PathBuf;

use tracing::{info, warn};

use elreg_register::config::AuditConfig;
use elreg_register::{merge, MergeConfig, MergeReport, MonthOrdering, Register, UpdateBatch};

use crate::exit_codes::EXIT_MERGE_SKIPPED;
use crate::{read_input, CliError};

pub struct MergeArgs {
    pub update: PathBuf,
    pub register: PathBuf,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
    pub numeric_months: bool,
    pub audit: bool,
    pub no_backup: bool,
    pub strict: bool,
    pub json: bool,
}

/// Config file first, then command-line overrides.
fn load_config(args: &MergeArgs) -> Result<MergeConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
            MergeConfig::from_toml(&text).map_err(CliError::merge)?
        }
        None => MergeConfig::default(),
    };
    if args.numeric_months {
        config.month_ordering = MonthOrdering::Numeric;
    }
    if args.audit {
        config.audit = AuditConfig::all();
    }
    Ok(config)
}

fn require_file(path: &std::path::Path, what: &str) -> Result<(), CliError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::io(format!("{what} file not found: {}", path.display()))
            .with_hint("run from the directory holding this month's files, or pass -u / -r"))
    }
}

pub fn cmd_merge(args: MergeArgs) -> Result<(), CliError> {
    let config = load_config(&args)?;

    require_file(&args.update, "update")?;
    require_file(&args.register, "register")?;

    if !args.no_backup {
        let stamp = elreg_io::backup_timestamp(chrono::Local::now());
        for path in [&args.update, &args.register] {
            let backup = elreg_io::backup_with_timestamp(path, &stamp).map_err(CliError::io)?;
            eprintln!("backed up {} to {}", path.display(), backup.display());
        }
    }

    let register_text = read_input(&args.register)?;
    let update_text = read_input(&args.update)?;

    let mut register = Register::from_csv(&register_text, &config.key_field).map_err(CliError::merge)?;
    if !register.duplicate_keys().is_empty() {
        warn!(
            count = register.duplicate_keys().len(),
            "register has duplicate keys, the last row for each was kept"
        );
    }
    let batch = UpdateBatch::from_csv(&update_text, &config).map_err(CliError::merge)?;

    let report = merge(&mut register, &batch, &config);

    if args.strict && !report.skipped.is_empty() {
        print_json(&report, args.json)?;
        print_skipped(&report);
        return Err(CliError::new(
            EXIT_MERGE_SKIPPED,
            format!(
                "{} record(s) skipped under --strict, {} not written",
                report.skipped.len(),
                args.output.display()
            ),
        ));
    }

    let out = register.to_csv_string().map_err(CliError::merge)?;
    elreg_io::write_atomic(&args.output, out.as_bytes()).map_err(CliError::io)?;
    info!(output = %args.output.display(), records = register.len(), "register written");

    print_json(&report, args.json)?;

    eprintln!(
        "Merged update file '{}' with register file '{}' and saved the updated register as '{}'.",
        args.update.display(),
        args.register.display(),
        args.output.display()
    );
    eprintln!("{}", report.summary_line());
    print_skipped(&report);

    Ok(())
}

fn print_json(report: &MergeReport, json: bool) -> Result<(), CliError> {
    if json {
        let text = serde_json::to_string_pretty(report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{text}");
    }
    Ok(())
}

fn print_skipped(report: &MergeReport) {
    if report.skipped.is_empty() {
        return;
    }
    eprintln!("skipped {} record(s):", report.skipped.len());
    for skipped in &report.skipped {
        eprintln!(
            "  line {}: {} ({})",
            skipped.line, skipped.elector_id, skipped.reason
        );
    }
}
