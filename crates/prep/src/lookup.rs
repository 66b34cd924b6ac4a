//! Polling district lookup table.
//!
//! A headerless CSV with one row per polling district:
//! `LAD, E-code, O-code, PD code, Constituency`.

use std::collections::HashMap;

use crate::error::PrepError;

/// Columns written by enrichment, in the order they prefix the output header.
pub const ENRICHED_FIELDS: [&str; 4] = ["LAD", "E-code", "O-code", "Constituency"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdEntry {
    pub lad: String,
    pub e_code: String,
    pub o_code: String,
    pub constituency: String,
}

impl PdEntry {
    /// Values for [`ENRICHED_FIELDS`], in the same order.
    pub fn values(&self) -> [&str; 4] {
        [&self.lad, &self.e_code, &self.o_code, &self.constituency]
    }
}

#[derive(Debug, Clone, Default)]
pub struct PdLookup {
    entries: HashMap<String, PdEntry>,
}

impl PdLookup {
    pub fn from_csv(csv_data: &str) -> Result<Self, PrepError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(csv_data.as_bytes());

        let mut entries = HashMap::new();
        for (i, result) in reader.records().enumerate() {
            let record = result?;
            let line = record.position().map(|p| p.line() as usize).unwrap_or(i + 1);
            if record.len() != 5 {
                return Err(PrepError::LookupRow { line, fields: record.len() });
            }
            let entry = PdEntry {
                lad: record[0].to_string(),
                e_code: record[1].to_string(),
                o_code: record[2].to_string(),
                constituency: record[4].to_string(),
            };
            // Later rows for the same code replace earlier ones.
            entries.insert(record[3].to_string(), entry);
        }
        Ok(Self { entries })
    }

    pub fn get(&self, pd_code: &str) -> Option<&PdEntry> {
        self.entries.get(pd_code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_rows() {
        let lookup = PdLookup::from_csv(
            "Northtown,E07000001,O1,AA,Northtown West\nNorthtown,E07000001,O2,AB,Northtown East\n",
        )
        .unwrap();
        assert_eq!(lookup.len(), 2);
        let entry = lookup.get("AB").unwrap();
        assert_eq!(entry.o_code, "O2");
        assert_eq!(entry.constituency, "Northtown East");
        assert!(lookup.get("ZZ").is_none());
    }

    #[test]
    fn reject_short_row() {
        let err = PdLookup::from_csv("Northtown,E07000001,O1,AA,West\nbroken,row\n").unwrap_err();
        match err {
            PrepError::LookupRow { line, fields } => {
                assert_eq!(line, 2);
                assert_eq!(fields, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_table() {
        let lookup = PdLookup::from_csv("").unwrap();
        assert!(lookup.is_empty());
    }
}
