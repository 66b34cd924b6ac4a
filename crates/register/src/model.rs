use std::collections::HashMap;

use serde::Serialize;

use crate::lifecycle::{LifecycleSignal, MonthOrdering};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One elector: field name to value. Field order lives in the register header.
pub type ElectorRecord = HashMap<String, String>;

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
}

impl RunCounters {
    pub fn net_change(&self) -> i64 {
        self.added as i64 - self.deleted as i64
    }

    pub fn total(&self) -> usize {
        self.added + self.modified + self.deleted
    }
}

// ---------------------------------------------------------------------------
// Skipped records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// No rule matched: added and deleted in the same month, or no signal at all.
    Conflict,
    /// A modify targeted an elector that is not on the register.
    UnknownKey,
    /// A month code was not an integer (numeric ordering only).
    MalformedMonth { field: String, value: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict => write!(f, "conflicting lifecycle months"),
            Self::UnknownKey => write!(f, "modify for elector not on register"),
            Self::MalformedMonth { field, value } => {
                write!(f, "malformed {field} month '{value}'")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub elector_id: String,
    pub line: usize,
    pub created: String,
    pub changed: String,
    pub deleted: String,
    pub reason: SkipReason,
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub action: LifecycleSignal,
    pub elector_id: String,
    pub line: usize,
    /// Whether the key was on the register before the action.
    pub existed: bool,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Output schema after the merge, relative to the prior register header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaChange {
    pub output_fields: Vec<String>,
    pub added_fields: Vec<String>,
    pub dropped_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegisterStats {
    pub size_before: usize,
    pub size_after: usize,
    pub duplicate_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeMeta {
    pub engine_version: String,
    pub run_at: String,
    pub month_ordering: MonthOrdering,
    pub batch_records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub meta: MergeMeta,
    pub counters: RunCounters,
    pub net_change: i64,
    pub skipped: Vec<SkippedRecord>,
    pub audit: Vec<AuditEntry>,
    pub schema: SchemaChange,
    pub register: RegisterStats,
}

impl MergeReport {
    /// One-line human summary of the run counters.
    pub fn summary_line(&self) -> String {
        let c = &self.counters;
        format!(
            "added {}, modified {}, deleted {} elector records, net change {}",
            c.added,
            c.modified,
            c.deleted,
            self.net_change,
        )
    }

    pub fn skipped_count(&self, reason: &SkipReason) -> usize {
        self.skipped
            .iter()
            .filter(|s| std::mem::discriminant(&s.reason) == std::mem::discriminant(reason))
            .count()
    }
}
