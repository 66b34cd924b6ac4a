//! `elreg-register` - Electoral register merge engine.
//!
//! Pure engine crate: receives CSV text for the register snapshot and the
//! update batch, applies the batch, returns the new snapshot plus a report.
//! No CLI or file IO dependencies.

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod register;

pub use batch::UpdateBatch;
pub use config::{AuditMode, MergeConfig};
pub use engine::merge;
pub use error::MergeError;
pub use lifecycle::{LifecycleSignal, MonthOrdering};
pub use model::{MergeReport, RunCounters, SkipReason, SkippedRecord};
pub use register::Register;
