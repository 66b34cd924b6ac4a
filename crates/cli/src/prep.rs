//! `elreg map` and `elreg transform` - turn a supplier export into an
//! update file the merge accepts.

use std::path::PathBuf;

use tracing::info;

use elreg_prep::{map_csv, transform_csv, PdLookup, SynonymTable, TransformConfig};

use crate::{read_input, CliError};

pub fn cmd_map(
    input: PathBuf,
    output: PathBuf,
    delimiter: String,
    synonyms: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let table = match &synonyms {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("cannot read synonyms {}: {e}", path.display())))?;
            SynonymTable::from_toml(&text).map_err(CliError::prep)?
        }
        None => SynonymTable::builtin().map_err(CliError::prep)?,
    };

    let content = read_input(&input)?;
    let delimiter = match elreg_io::parse_delimiter(&delimiter).map_err(CliError::usage)? {
        Some(d) => d,
        None => {
            let d = elreg_io::sniff_delimiter(&content);
            info!(delimiter = %(d as char).escape_default(), "sniffed delimiter");
            d
        }
    };

    let mapped = map_csv(&content, delimiter, &table).map_err(CliError::prep)?;
    elreg_io::write_atomic(&output, mapped.csv.as_bytes()).map_err(CliError::io)?;

    if !mapped.unmapped_fields.is_empty() {
        info!(fields = ?mapped.unmapped_fields, "canonical fields with no supplier column");
    }

    if json {
        let text = serde_json::to_string_pretty(&mapped)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{text}");
    }

    eprintln!(
        "Mapped {} rows from '{}' and saved them as '{}'.",
        mapped.rows,
        input.display(),
        output.display()
    );
    Ok(())
}

pub fn cmd_transform(
    input: PathBuf,
    output: PathBuf,
    pd_file: PathBuf,
    month: Option<u32>,
    config: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let mut config = match &config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
            TransformConfig::from_toml(&text).map_err(CliError::prep)?
        }
        None => TransformConfig::default(),
    };
    if let Some(month) = month {
        config.process_month = month;
        config.validate().map_err(CliError::prep)?;
    }

    let lookup = PdLookup::from_csv(&read_input(&pd_file)?).map_err(CliError::prep)?;
    info!(entries = lookup.len(), "PD lookup loaded");

    let content = read_input(&input)?;
    let transformed = transform_csv(&content, &lookup, &config).map_err(CliError::prep)?;
    elreg_io::write_atomic(&output, transformed.csv.as_bytes()).map_err(CliError::io)?;

    let report = &transformed.report;
    if json {
        let text = serde_json::to_string_pretty(report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{text}");
    }

    eprintln!(
        "Transformed and cleaned {} rows, saved as '{}'.",
        report.rows,
        output.display()
    );
    for code in &report.missing_pd_codes {
        eprintln!("No PD entry in {} for {}", pd_file.display(), code);
    }
    Ok(())
}
