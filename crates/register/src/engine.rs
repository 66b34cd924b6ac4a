use tracing::{info, warn};

use crate::batch::{UpdateBatch, UpdateRecord};
use crate::config::MergeConfig;
use crate::lifecycle::{classify, LifecycleSignal};
use crate::model::{
    AuditEntry, MergeMeta, MergeReport, RegisterStats, RunCounters, SkipReason, SkippedRecord,
};
use crate::register::{ModifyOutcome, Register};

/// Apply one update batch to the register, in batch order.
///
/// Each record gets at most one mutation. Records that cannot be applied are
/// skipped with a warning and listed in the report; they never abort the run.
/// Afterwards the register's output schema is the batch header.
pub fn merge(register: &mut Register, batch: &UpdateBatch, config: &MergeConfig) -> MergeReport {
    let size_before = register.len();
    let mut counters = RunCounters::default();
    let mut skipped = Vec::new();
    let mut audit = Vec::new();

    for record in &batch.records {
        let signal = match classify(&record.months(), config.month_ordering) {
            Ok(signal) => signal,
            Err(bad) => {
                warn!(
                    elector_id = %record.elector_id,
                    line = record.line,
                    field = bad.field,
                    value = %bad.value,
                    "malformed lifecycle month, no action taken"
                );
                skipped.push(skip(
                    record,
                    SkipReason::MalformedMonth {
                        field: bad.field.into(),
                        value: bad.value,
                    },
                ));
                continue;
            }
        };

        let existed = register.contains(&record.elector_id);

        match signal {
            LifecycleSignal::Delete => {
                register.remove(&record.elector_id);
                counters.deleted += 1;
            }
            LifecycleSignal::Insert => {
                register.insert(record.elector_id.clone(), record.fields.clone());
                counters.added += 1;
            }
            LifecycleSignal::Modify => {
                match register.merge_fields(&record.elector_id, &record.fields) {
                    ModifyOutcome::Merged => counters.modified += 1,
                    ModifyOutcome::NotFound => {
                        warn!(
                            elector_id = %record.elector_id,
                            line = record.line,
                            "modify for elector not on register, no action taken"
                        );
                        skipped.push(skip(record, SkipReason::UnknownKey));
                        continue;
                    }
                }
            }
            LifecycleSignal::Conflict => {
                warn!(
                    elector_id = %record.elector_id,
                    line = record.line,
                    created = %record.created,
                    changed = %record.changed,
                    deleted = %record.deleted,
                    "added and deleted in same month or no change flagged, no action taken"
                );
                skipped.push(skip(record, SkipReason::Conflict));
                continue;
            }
        }

        if config.audit.covers(&record.elector_id) {
            info!(
                target: "elreg::audit",
                action = %signal,
                elector_id = %record.elector_id,
                line = record.line,
                existed = existed,
                "applied"
            );
            audit.push(AuditEntry {
                action: signal,
                elector_id: record.elector_id.clone(),
                line: record.line,
                existed,
            });
        }
    }

    let schema = register.set_fields(batch.fields.clone());
    if !schema.dropped_fields.is_empty() {
        warn!(
            fields = ?schema.dropped_fields,
            "register fields absent from the update header are dropped from the output"
        );
    }

    info!(
        added = counters.added,
        modified = counters.modified,
        deleted = counters.deleted,
        skipped = skipped.len(),
        "merge complete"
    );

    MergeReport {
        meta: MergeMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            month_ordering: config.month_ordering,
            batch_records: batch.len(),
        },
        net_change: counters.net_change(),
        counters,
        skipped,
        audit,
        schema,
        register: RegisterStats {
            size_before,
            size_after: register.len(),
            duplicate_keys: register.duplicate_keys().to_vec(),
        },
    }
}

fn skip(record: &UpdateRecord, reason: SkipReason) -> SkippedRecord {
    SkippedRecord {
        elector_id: record.elector_id.clone(),
        line: record.line,
        created: record.created.clone(),
        changed: record.changed.clone(),
        deleted: record.deleted.clone(),
        reason,
    }
}
