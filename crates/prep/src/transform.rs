//! Clean, enrich and key a mapped supplier file.
//!
//! Rows are processed independently and in input order. Each one is cleaned
//! field by field, has its address lines tidied, gets lifecycle months from
//! its status flag, is enriched from the polling district lookup and finally
//! receives the `Elector ID` the register is keyed on.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::address::{shuffle_address_lines, ADDRESS_LINES, MAX_ADDRESS_LINES};
use crate::clean::{clean_address, clean_name, clean_text, title_case};
use crate::config::TransformConfig;
use crate::elector::{elector_id, normalize_number, split_elector_number};
use crate::error::PrepError;
use crate::lookup::{PdLookup, ENRICHED_FIELDS};
use crate::status::{StatusCounts, StatusFlag, LIFECYCLE_FIELDS, STATUS_FIELD};
use crate::Row;

const ELECTOR_ID: &str = "Elector ID";
const PD_CODE: &str = "PDCode";
const NUMBER_PREFIX: &str = "Elector Number Prefix";
const NUMBER: &str = "Elector Number";
const NUMBER_SUFFIX: &str = "Elector Number Suffix";
const POSTCODE: &str = "PostCode";

#[derive(Debug, Clone, Default, Serialize)]
pub struct TransformReport {
    pub rows: usize,
    pub status: StatusCounts,
    /// Rows that received LAD / constituency values from the lookup.
    pub enriched: usize,
    /// Polling district codes with no lookup entry, in first-seen order.
    pub missing_pd_codes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub csv: String,
    pub report: TransformReport,
}

/// Output column order for a given input header.
fn output_header(input: &[String]) -> Vec<String> {
    let has = |name: &str| input.iter().any(|h| h == name);

    let mut header = Vec::with_capacity(input.len() + 8);
    if !has("LAD") {
        header.extend(ENRICHED_FIELDS.iter().map(|f| f.to_string()));
    }
    header.extend(input.iter().cloned());
    if !has(ELECTOR_ID) {
        header.push(ELECTOR_ID.to_string());
    }
    if has(STATUS_FIELD) {
        for field in LIFECYCLE_FIELDS {
            if !has(field) {
                header.push(field.to_string());
            }
        }
    }
    header
}

fn field<'a>(row: &'a Row, name: &str) -> &'a str {
    row.get(name).map(String::as_str).unwrap_or("")
}

struct Transformer<'a> {
    lookup: &'a PdLookup,
    config: &'a TransformConfig,
    shuffle: bool,
    missing_seen: HashSet<String>,
    report: TransformReport,
}

impl<'a> Transformer<'a> {
    fn new(lookup: &'a PdLookup, config: &'a TransformConfig, header: &[String]) -> Self {
        let shuffle = ADDRESS_LINES.iter().all(|a| header.iter().any(|h| h == a));
        Self {
            lookup,
            config,
            shuffle,
            missing_seen: HashSet::new(),
            report: TransformReport::default(),
        }
    }

    fn process(&mut self, mut row: Row) -> Row {
        for value in row.values_mut() {
            *value = clean_text(value);
        }

        let postcode = field(&row, POSTCODE).to_string();
        for i in 1..=MAX_ADDRESS_LINES {
            if let Some(line) = row.get_mut(&format!("Address{i}")) {
                *line = clean_address(line, &postcode);
            }
        }

        for (name, value) in row.iter_mut() {
            *value = if self.config.is_upper_case(name) {
                value.to_uppercase()
            } else if self.config.is_name(name) {
                clean_name(value)
            } else {
                title_case(value)
            };
        }

        if self.shuffle {
            let mut lines = ADDRESS_LINES.map(|a| row.remove(a).unwrap_or_default());
            shuffle_address_lines(&mut lines);
            for (name, line) in ADDRESS_LINES.iter().zip(lines) {
                row.insert(name.to_string(), line);
            }
        }

        if row.contains_key(STATUS_FIELD) {
            let flag = StatusFlag::parse(field(&row, STATUS_FIELD));
            self.report.status.record(flag);
            if let Some(months) = flag.lifecycle_months(self.config.process_month) {
                for (name, month) in LIFECYCLE_FIELDS.iter().zip(months) {
                    row.insert(name.to_string(), month);
                }
            }
        }

        let split = split_elector_number(field(&row, NUMBER))
            .map(|(district, number)| (district.to_string(), number.to_string()));
        if let Some((district, number)) = split {
            row.insert(PD_CODE.to_string(), district.clone());
            row.insert(NUMBER_PREFIX.to_string(), district);
            row.insert(NUMBER.to_string(), number);
        }

        self.enrich(&mut row);

        let number = normalize_number(field(&row, NUMBER)).to_string();
        let id = elector_id(field(&row, NUMBER_PREFIX), &number, field(&row, NUMBER_SUFFIX));
        row.insert(NUMBER.to_string(), number);
        row.insert(ELECTOR_ID.to_string(), id);

        self.report.rows += 1;
        row
    }

    fn enrich(&mut self, row: &mut Row) {
        let code = field(row, NUMBER_PREFIX).to_string();
        if code.is_empty() {
            return;
        }
        match self.lookup.get(&code) {
            Some(entry) => {
                for (name, value) in ENRICHED_FIELDS.iter().zip(entry.values()) {
                    row.insert(name.to_string(), value.to_string());
                }
                self.report.enriched += 1;
            }
            None => {
                if self.missing_seen.insert(code.clone()) {
                    warn!(pd_code = %code, "no PD lookup entry for polling district");
                    self.report.missing_pd_codes.push(code);
                }
            }
        }
    }
}

/// Transform a mapped supplier file.
pub fn transform_csv(
    input: &str,
    lookup: &PdLookup,
    config: &TransformConfig,
) -> Result<TransformOutput, PrepError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(input.as_bytes());

    let input_header: Vec<String> = reader.headers()?.iter().map(clean_text).collect();
    let header = output_header(&input_header);
    debug!(columns = header.len(), "transform output header");

    let mut transformer = Transformer::new(lookup, config, &input_header);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&header)?;

    for result in reader.records() {
        let record = result?;
        let row: Row = input_header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        let row = transformer.process(row);
        writer.write_record(header.iter().map(|name| field(&row, name)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PrepError::Csv(e.to_string()))?;
    let csv = String::from_utf8(bytes).map_err(|e| PrepError::Csv(e.to_string()))?;
    let report = transformer.report;
    info!(
        rows = report.rows,
        enriched = report.enriched,
        missing_pd_codes = report.missing_pd_codes.len(),
        "transform complete"
    );
    Ok(TransformOutput { csv, report })
}
