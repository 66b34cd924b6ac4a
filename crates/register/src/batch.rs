use crate::config::MergeConfig;
use crate::error::MergeError;
use crate::lifecycle::LifecycleMonths;
use crate::model::ElectorRecord;

/// One row of an update batch.
#[derive(Debug, Clone)]
pub struct UpdateRecord {
    /// 1-based data line (header excluded).
    pub line: usize,
    pub elector_id: String,
    pub created: String,
    pub changed: String,
    pub deleted: String,
    pub fields: ElectorRecord,
}

impl UpdateRecord {
    pub fn months(&self) -> LifecycleMonths<'_> {
        LifecycleMonths {
            created: &self.created,
            changed: &self.changed,
            deleted: &self.deleted,
        }
    }
}

/// A parsed update file: header order plus rows in file order.
#[derive(Debug, Clone)]
pub struct UpdateBatch {
    pub fields: Vec<String>,
    pub records: Vec<UpdateRecord>,
}

impl UpdateBatch {
    pub fn from_csv(csv_data: &str, config: &MergeConfig) -> Result<Self, MergeError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let fields: Vec<String> = reader
            .headers()
            .map_err(|e| MergeError::csv("update", e))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let idx = |name: &str| -> Option<usize> { fields.iter().position(|h| h == name) };

        let key_idx = idx(&config.key_field).ok_or_else(|| MergeError::MissingKeyField {
            source: "update".into(),
            field: config.key_field.clone(),
        })?;

        let mut month_idx = [0usize; 3];
        for (slot, column) in month_idx.iter_mut().zip(config.lifecycle_fields()) {
            *slot = idx(column).ok_or_else(|| MergeError::MissingColumn {
                source: "update".into(),
                column: column.into(),
            })?;
        }

        let mut records = Vec::new();

        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(|e| MergeError::csv("update", e))?;
            let get = |col: usize| record.get(col).unwrap_or("").to_string();

            let values: ElectorRecord = fields
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect();

            records.push(UpdateRecord {
                line: i + 1,
                elector_id: get(key_idx),
                created: get(month_idx[0]),
                changed: get(month_idx[1]),
                deleted: get(month_idx[2]),
                fields: values,
            });
        }

        Ok(Self { fields, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
