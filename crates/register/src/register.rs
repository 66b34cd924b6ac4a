//! In-memory register store.
//!
//! Keys keep the position of their first insertion: overwriting an existing
//! key leaves it in place, a new key appends, and a key that was removed and
//! inserted again appends. Output follows that order.

use std::collections::HashMap;
use std::io;

use tracing::debug;

use crate::error::MergeError;
use crate::model::{ElectorRecord, SchemaChange};

/// Result of merging fields into a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyOutcome {
    Merged,
    NotFound,
}

#[derive(Debug, Clone, Default)]
pub struct Register {
    fields: Vec<String>,
    slots: Vec<Option<(String, ElectorRecord)>>,
    index: HashMap<String, usize>,
    duplicate_keys: Vec<String>,
}

impl Register {
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Load a register snapshot from CSV text.
    ///
    /// A later row with an already-seen key replaces the earlier row's values.
    /// Such keys are collected in [`Register::duplicate_keys`].
    pub fn from_csv(csv_data: &str, key_field: &str) -> Result<Self, MergeError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| MergeError::csv("register", e))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let key_idx = headers.iter().position(|h| h == key_field).ok_or_else(|| {
            MergeError::MissingKeyField {
                source: "register".into(),
                field: key_field.into(),
            }
        })?;

        let mut register = Register::new(headers);

        for record in reader.records() {
            let record = record.map_err(|e| MergeError::csv("register", e))?;
            let key = record.get(key_idx).unwrap_or("").to_string();

            let fields: ElectorRecord = register
                .fields
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect();

            if register.insert(key.clone(), fields) {
                debug!(elector_id = %key, "duplicate key in register snapshot, later row wins");
                register.duplicate_keys.push(key);
            }
        }

        Ok(register)
    }

    /// Field order used when the register is written.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, elector_id: &str) -> bool {
        self.index.contains_key(elector_id)
    }

    pub fn get(&self, elector_id: &str) -> Option<&ElectorRecord> {
        let slot = *self.index.get(elector_id)?;
        self.slots[slot].as_ref().map(|(_, record)| record)
    }

    /// Keys that appeared more than once in the loaded snapshot.
    pub fn duplicate_keys(&self) -> &[String] {
        &self.duplicate_keys
    }

    /// Live records in register order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ElectorRecord)> {
        self.slots
            .iter()
            .flatten()
            .map(|(key, record)| (key.as_str(), record))
    }

    /// Insert or replace a record. Returns true if the key was already present.
    pub fn insert(&mut self, elector_id: String, record: ElectorRecord) -> bool {
        if let Some(&slot) = self.index.get(&elector_id) {
            self.slots[slot] = Some((elector_id, record));
            return true;
        }
        self.index.insert(elector_id.clone(), self.slots.len());
        self.slots.push(Some((elector_id, record)));
        false
    }

    pub fn remove(&mut self, elector_id: &str) -> Option<ElectorRecord> {
        let slot = self.index.remove(elector_id)?;
        self.slots[slot].take().map(|(_, record)| record)
    }

    /// Overwrite every field of the stored record that `update` carries.
    pub fn merge_fields(&mut self, elector_id: &str, update: &ElectorRecord) -> ModifyOutcome {
        let Some(&slot) = self.index.get(elector_id) else {
            return ModifyOutcome::NotFound;
        };
        match self.slots[slot].as_mut() {
            Some((_, record)) => {
                for (field, value) in update {
                    record.insert(field.clone(), value.clone());
                }
                ModifyOutcome::Merged
            }
            None => ModifyOutcome::NotFound,
        }
    }

    /// Replace the output schema. Fields no longer in the schema are removed
    /// from every stored record.
    pub fn set_fields(&mut self, fields: Vec<String>) -> SchemaChange {
        let added_fields: Vec<String> = fields
            .iter()
            .filter(|f| !self.fields.contains(f))
            .cloned()
            .collect();
        let dropped_fields: Vec<String> = self
            .fields
            .iter()
            .filter(|f| !fields.contains(f))
            .cloned()
            .collect();

        if !dropped_fields.is_empty() {
            for (_, record) in self.slots.iter_mut().flatten() {
                record.retain(|field, _| fields.contains(field));
            }
        }

        self.fields = fields;

        SchemaChange {
            output_fields: self.fields.clone(),
            added_fields,
            dropped_fields,
        }
    }

    /// Serialize as CSV: header row, then one row per live record.
    /// Fields a record lacks are written empty.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), MergeError> {
        let mut writer = csv::WriterBuilder::new().from_writer(writer);

        writer
            .write_record(&self.fields)
            .map_err(|e| MergeError::Io(e.to_string()))?;

        for (_, record) in self.iter() {
            let row = self
                .fields
                .iter()
                .map(|f| record.get(f).map(String::as_str).unwrap_or(""));
            writer
                .write_record(row)
                .map_err(|e| MergeError::Io(e.to_string()))?;
        }

        writer.flush().map_err(|e| MergeError::Io(e.to_string()))?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, MergeError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| MergeError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = "\
Elector ID,Name,PostCode
A-1/0,Ann Smith,AB1 2CD
A-2/0,Bob Jones,AB1 2CE
A-3/0,Cat Brown,AB1 2CF
";

    fn record(pairs: &[(&str, &str)]) -> ElectorRecord {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn keys(register: &Register) -> Vec<&str> {
        register.iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn load_basic() {
        let register = Register::from_csv(SNAPSHOT, "Elector ID").unwrap();
        assert_eq!(register.len(), 3);
        assert_eq!(register.fields(), &["Elector ID", "Name", "PostCode"]);
        assert_eq!(register.get("A-2/0").unwrap()["Name"], "Bob Jones");
        assert!(register.duplicate_keys().is_empty());
    }

    #[test]
    fn load_missing_key_field() {
        let err = Register::from_csv("ID,Name\n1,x\n", "Elector ID").unwrap_err();
        match err {
            MergeError::MissingKeyField { source, field } => {
                assert_eq!(source, "register");
                assert_eq!(field, "Elector ID");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_empty_input_has_no_key_field() {
        let err = Register::from_csv("", "Elector ID").unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn load_duplicate_keys_last_row_wins_first_position_kept() {
        let csv = "\
Elector ID,Name
A-1/0,First
A-2/0,Other
A-1/0,Second
";
        let register = Register::from_csv(csv, "Elector ID").unwrap();
        assert_eq!(register.len(), 2);
        assert_eq!(register.get("A-1/0").unwrap()["Name"], "Second");
        assert_eq!(keys(&register), vec!["A-1/0", "A-2/0"]);
        assert_eq!(register.duplicate_keys(), &["A-1/0".to_string()]);
    }

    #[test]
    fn load_short_rows_leave_fields_unset() {
        let csv = "Elector ID,Name,PostCode\nA-1/0,Ann\n";
        let register = Register::from_csv(csv, "Elector ID").unwrap();
        let rec = register.get("A-1/0").unwrap();
        assert_eq!(rec["Name"], "Ann");
        assert!(!rec.contains_key("PostCode"));
        let out = register.to_csv_string().unwrap();
        assert_eq!(out.lines().nth(1), Some("A-1/0,Ann,"));
    }

    #[test]
    fn insert_existing_key_keeps_position() {
        let mut register = Register::from_csv(SNAPSHOT, "Elector ID").unwrap();
        let existed = register.insert("A-1/0".into(), record(&[("Name", "Ann Other")]));
        assert!(existed);
        assert_eq!(keys(&register), vec!["A-1/0", "A-2/0", "A-3/0"]);
    }

    #[test]
    fn removed_then_reinserted_key_appends() {
        let mut register = Register::from_csv(SNAPSHOT, "Elector ID").unwrap();
        assert!(register.remove("A-1/0").is_some());
        assert!(register.remove("A-1/0").is_none());
        assert!(!register.insert("A-1/0".into(), record(&[("Name", "Back")])));
        assert_eq!(keys(&register), vec!["A-2/0", "A-3/0", "A-1/0"]);
        assert_eq!(register.len(), 3);
    }

    #[test]
    fn merge_fields_overwrites_only_given_fields() {
        let mut register = Register::from_csv(SNAPSHOT, "Elector ID").unwrap();
        let outcome = register.merge_fields("A-3/0", &record(&[("Name", "Cat Green")]));
        assert_eq!(outcome, ModifyOutcome::Merged);
        let rec = register.get("A-3/0").unwrap();
        assert_eq!(rec["Name"], "Cat Green");
        assert_eq!(rec["PostCode"], "AB1 2CF");
    }

    #[test]
    fn merge_fields_unknown_key() {
        let mut register = Register::from_csv(SNAPSHOT, "Elector ID").unwrap();
        let outcome = register.merge_fields("Z-9/0", &record(&[("Name", "Nobody")]));
        assert_eq!(outcome, ModifyOutcome::NotFound);
        assert_eq!(register.len(), 3);
    }

    #[test]
    fn set_fields_reports_and_strips_dropped() {
        let mut register = Register::from_csv(SNAPSHOT, "Elector ID").unwrap();
        let change = register.set_fields(vec![
            "Elector ID".into(),
            "Name".into(),
            "Ward".into(),
        ]);
        assert_eq!(change.added_fields, vec!["Ward"]);
        assert_eq!(change.dropped_fields, vec!["PostCode"]);
        assert!(!register.get("A-1/0").unwrap().contains_key("PostCode"));

        let out = register.to_csv_string().unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Elector ID,Name,Ward"));
        assert_eq!(lines.next(), Some("A-1/0,Ann Smith,"));
    }

    #[test]
    fn write_quotes_fields_with_commas() {
        let mut register = Register::new(vec!["Elector ID".into(), "Address1".into()]);
        register.insert(
            "A-1/0".into(),
            record(&[("Elector ID", "A-1/0"), ("Address1", "Flat 1, High St")]),
        );
        let out = register.to_csv_string().unwrap();
        assert_eq!(out.lines().nth(1), Some("A-1/0,\"Flat 1, High St\""));
    }
}
