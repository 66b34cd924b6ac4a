use std::collections::BTreeSet;

use serde::Deserialize;

use crate::error::MergeError;
use crate::lifecycle::MonthOrdering;

pub const DEFAULT_KEY_FIELD: &str = "Elector ID";
pub const DEFAULT_CREATED_FIELD: &str = "ElectorCreatedMonth";
pub const DEFAULT_CHANGED_FIELD: &str = "ElectorChangedMonth";
pub const DEFAULT_DELETED_FIELD: &str = "ElectorDeletedMonth";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MergeConfig {
    #[serde(default = "default_key_field")]
    pub key_field: String,
    #[serde(default = "default_created_field")]
    pub created_field: String,
    #[serde(default = "default_changed_field")]
    pub changed_field: String,
    #[serde(default = "default_deleted_field")]
    pub deleted_field: String,
    #[serde(default)]
    pub month_ordering: MonthOrdering,
    #[serde(default)]
    pub audit: AuditConfig,
}

fn default_key_field() -> String {
    DEFAULT_KEY_FIELD.into()
}

fn default_created_field() -> String {
    DEFAULT_CREATED_FIELD.into()
}

fn default_changed_field() -> String {
    DEFAULT_CHANGED_FIELD.into()
}

fn default_deleted_field() -> String {
    DEFAULT_DELETED_FIELD.into()
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            key_field: default_key_field(),
            created_field: default_created_field(),
            changed_field: default_changed_field(),
            deleted_field: default_deleted_field(),
            month_ordering: MonthOrdering::default(),
            audit: AuditConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

/// Which applied actions are logged at info level and kept in the report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub mode: AuditMode,
    /// Elector IDs to audit when `mode = "keys"`.
    #[serde(default)]
    pub keys: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditMode {
    #[default]
    Off,
    All,
    Keys,
}

impl AuditConfig {
    pub fn all() -> Self {
        Self {
            mode: AuditMode::All,
            keys: BTreeSet::new(),
        }
    }

    pub fn covers(&self, elector_id: &str) -> bool {
        match self.mode {
            AuditMode::Off => false,
            AuditMode::All => true,
            AuditMode::Keys => self.keys.contains(elector_id),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MergeConfig {
    pub fn from_toml(input: &str) -> Result<Self, MergeError> {
        let config: MergeConfig =
            toml::from_str(input).map_err(|e| MergeError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MergeError> {
        let columns = [
            ("key_field", &self.key_field),
            ("created_field", &self.created_field),
            ("changed_field", &self.changed_field),
            ("deleted_field", &self.deleted_field),
        ];

        for (name, value) in &columns {
            if value.trim().is_empty() {
                return Err(MergeError::ConfigValidation(format!("{name} must not be empty")));
            }
        }

        // All four columns must be distinct
        let distinct: BTreeSet<&str> = columns.iter().map(|(_, v)| v.as_str()).collect();
        if distinct.len() != columns.len() {
            return Err(MergeError::ConfigValidation(
                "key and lifecycle fields must name four distinct columns".into(),
            ));
        }

        if self.audit.mode == AuditMode::Keys && self.audit.keys.is_empty() {
            return Err(MergeError::ConfigValidation(
                "audit mode \"keys\" requires at least one key".into(),
            ));
        }

        Ok(())
    }

    /// The three lifecycle column names in created/changed/deleted order.
    pub fn lifecycle_fields(&self) -> [&str; 3] {
        [&self.created_field, &self.changed_field, &self.deleted_field]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
