//! Supplier header mapping.
//!
//! Each local authority exports electors with its own column names. The
//! synonym table lists the canonical register fields in output order along
//! with the spellings accepted for each; [`map_csv`] rewrites a supplier
//! file onto that canonical layout.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clean::clean_text;
use crate::error::PrepError;

const BUILTIN_SYNONYMS: &str = include_str!("../data/synonyms.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct FieldSynonyms {
    pub name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl FieldSynonyms {
    fn matches(&self, header: &str) -> bool {
        self.name.to_lowercase() == header
            || self.synonyms.iter().any(|s| s.to_lowercase() == header)
    }
}

#[derive(Debug, Deserialize)]
struct SynonymFile {
    #[serde(default)]
    field: Vec<FieldSynonyms>,
}

/// Ordered canonical fields with accepted supplier spellings.
#[derive(Debug, Clone)]
pub struct SynonymTable {
    fields: Vec<FieldSynonyms>,
}

impl SynonymTable {
    /// The table shipped with the crate.
    pub fn builtin() -> Result<Self, PrepError> {
        Self::from_toml(BUILTIN_SYNONYMS)
    }

    pub fn from_toml(input: &str) -> Result<Self, PrepError> {
        let file: SynonymFile =
            toml::from_str(input).map_err(|e| PrepError::ConfigParse(e.to_string()))?;
        let table = Self { fields: file.field };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), PrepError> {
        if self.fields.is_empty() {
            return Err(PrepError::ConfigValidation(
                "synonym table has no [[field]] entries".into(),
            ));
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(PrepError::ConfigValidation(
                    "synonym table entry with empty name".into(),
                ));
            }
            if !seen.insert(field.name.to_lowercase()) {
                return Err(PrepError::ConfigValidation(format!(
                    "canonical field '{}' listed twice",
                    field.name
                )));
            }
        }
        Ok(())
    }

    /// Canonical field names in output order.
    pub fn canonical_fields(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Canonical name for a supplier header, ignoring case and stray
    /// whitespace. The first table entry that accepts the header wins.
    pub fn canonical_for(&self, header: &str) -> Option<&str> {
        let wanted = clean_text(header).to_lowercase();
        self.fields
            .iter()
            .find(|f| f.matches(&wanted))
            .map(|f| f.name.as_str())
    }

    /// Canonical column index for every supplier header, in input order.
    pub fn map_headers<'a, I>(&self, headers: I) -> Result<Vec<usize>, PrepError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        headers
            .into_iter()
            .map(|header| {
                let wanted = clean_text(header).to_lowercase();
                self.fields
                    .iter()
                    .position(|f| f.matches(&wanted))
                    .ok_or_else(|| PrepError::UnknownHeader(header.to_string()))
            })
            .collect()
    }
}

/// Result of mapping one supplier file.
#[derive(Debug, Clone, Serialize)]
pub struct MapOutput {
    #[serde(skip)]
    pub csv: String,
    pub rows: usize,
    /// Canonical fields no supplier column mapped onto; written empty.
    pub unmapped_fields: Vec<String>,
}

/// Rewrite a supplier CSV onto the canonical layout.
///
/// Every canonical field is written, fully quoted, in table order. When two
/// supplier columns map onto the same field, the later column wins.
pub fn map_csv(input: &str, delimiter: u8, table: &SynonymTable) -> Result<MapOutput, PrepError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(input.as_bytes());

    let headers = reader.headers()?.clone();
    let targets = table.map_headers(headers.iter())?;
    for (header, &target) in headers.iter().zip(&targets) {
        debug!(column = header, field = table.fields[target].name.as_str(), "mapped supplier column");
    }

    let width = table.fields.len();
    let unmapped_fields = (0..width)
        .filter(|i| !targets.contains(i))
        .map(|i| table.fields[i].name.clone())
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());
    writer.write_record(table.canonical_fields())?;

    let mut rows = 0;
    for result in reader.records() {
        let record = result?;
        let mut out = vec![""; width];
        for (value, &target) in record.iter().zip(&targets) {
            out[target] = value;
        }
        writer.write_record(&out)?;
        rows += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PrepError::Csv(e.to_string()))?;
    let csv = String::from_utf8(bytes).map_err(|e| PrepError::Csv(e.to_string()))?;
    Ok(MapOutput { csv, rows, unmapped_fields })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
[[field]]
name = "Elector Number"
synonyms = ["ENO", "Number"]

[[field]]
name = "Elector Name"
synonyms = ["Name", "Full Name"]

[[field]]
name = "PostCode"
synonyms = ["Postcode", "Post Code"]
"#;

    fn table() -> SynonymTable {
        SynonymTable::from_toml(TABLE).unwrap()
    }

    #[test]
    fn builtin_table_loads() {
        let table = SynonymTable::builtin().unwrap();
        let fields = table.canonical_fields();
        assert_eq!(fields[0], "Elector ID");
        assert!(fields.contains(&"ElectorDeletedMonth"));
        assert_eq!(table.canonical_for("surname"), Some("Elector Name Last"));
    }

    #[test]
    fn canonical_lookup_ignores_case() {
        let table = table();
        assert_eq!(table.canonical_for("eno"), Some("Elector Number"));
        assert_eq!(table.canonical_for("POST CODE"), Some("PostCode"));
        assert_eq!(table.canonical_for(" Elector Name "), Some("Elector Name"));
        assert_eq!(table.canonical_for("\u{FEFF}Name"), Some("Elector Name"));
        assert_eq!(table.canonical_for("Ward"), None);
    }

    #[test]
    fn map_reorders_and_fills() {
        let out = map_csv("Post Code,ENO\nAB1 2CD,12\n", b',', &table()).unwrap();
        assert_eq!(
            out.csv,
            "\"Elector Number\",\"Elector Name\",\"PostCode\"\n\"12\",\"\",\"AB1 2CD\"\n"
        );
        assert_eq!(out.rows, 1);
        assert_eq!(out.unmapped_fields, vec!["Elector Name"]);
    }

    #[test]
    fn map_with_semicolons() {
        let out = map_csv("Name;Number\nAnn Smith;7\n", b';', &table()).unwrap();
        assert!(out.csv.ends_with("\"7\",\"Ann Smith\",\"\"\n"));
    }

    #[test]
    fn later_duplicate_column_wins() {
        let out = map_csv("Name,Full Name\nfirst,second\n", b',', &table()).unwrap();
        assert!(out.csv.contains("\"second\""));
        assert!(!out.csv.contains("\"first\""));
    }

    #[test]
    fn unknown_header_fails() {
        let err = map_csv("ENO,Ward\n1,North\n", b',', &table()).unwrap_err();
        assert!(matches!(err, PrepError::UnknownHeader(ref h) if h == "Ward"));
        assert!(err.to_string().contains("'Ward'"));
    }

    #[test]
    fn reject_duplicate_canonical_names() {
        let err = SynonymTable::from_toml(
            "[[field]]\nname = \"A\"\n[[field]]\nname = \"a\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, PrepError::ConfigValidation(_)));
    }

    #[test]
    fn reject_empty_table() {
        assert!(SynonymTable::from_toml("").is_err());
    }
}
