//! `elreg-prep` - Supplier file preparation stages.
//!
//! Pure functions over CSV text: map supplier headers onto canonical field
//! names, then clean, enrich and key every record so the result can be
//! merged into the register. No file IO.

pub mod address;
pub mod clean;
pub mod config;
pub mod elector;
pub mod error;
pub mod lookup;
pub mod status;
pub mod synonyms;
pub mod transform;

pub use config::TransformConfig;
pub use error::PrepError;
pub use lookup::PdLookup;
pub use status::StatusFlag;
pub use synonyms::{map_csv, MapOutput, SynonymTable};
pub use transform::{transform_csv, TransformOutput, TransformReport};

/// One CSV record keyed by header name.
pub type Row = std::collections::HashMap<String, String>;
