//! Supplier status flags.
//!
//! Some suppliers mark changes with a single-letter `Status` column instead
//! of populating the three lifecycle month columns. The flag is turned into
//! month values here so the merge only ever sees months.

use std::fmt;

use serde::Serialize;

pub const STATUS_FIELD: &str = "Status";
pub const CREATED_FIELD: &str = "ElectorCreatedMonth";
pub const CHANGED_FIELD: &str = "ElectorChangedMonth";
pub const DELETED_FIELD: &str = "ElectorDeletedMonth";

/// Lifecycle columns in created / changed / deleted order.
pub const LIFECYCLE_FIELDS: [&str; 3] = [CREATED_FIELD, CHANGED_FIELD, DELETED_FIELD];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFlag {
    Added,
    Modified,
    Deleted,
    /// Blank or any other letter; month columns are left as supplied.
    Unknown,
}

impl StatusFlag {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "A" | "a" => Self::Added,
            "M" | "m" => Self::Modified,
            "D" | "d" => Self::Deleted,
            _ => Self::Unknown,
        }
    }

    /// Month values for the created / changed / deleted columns, or `None`
    /// when the flag does not say which lifecycle event happened.
    pub fn lifecycle_months(self, month: u32) -> Option<[String; 3]> {
        let month = month.to_string();
        let zero = || "0".to_string();
        match self {
            Self::Added => Some([month, zero(), zero()]),
            Self::Modified => Some([zero(), month, zero()]),
            Self::Deleted => Some([zero(), zero(), month]),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Modified => write!(f, "modified"),
            Self::Deleted => write!(f, "deleted"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Rows seen per status flag during a transform run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    pub unknown: usize,
}

impl StatusCounts {
    pub fn record(&mut self, flag: StatusFlag) {
        match flag {
            StatusFlag::Added => self.added += 1,
            StatusFlag::Modified => self.modified += 1,
            StatusFlag::Deleted => self.deleted += 1,
            StatusFlag::Unknown => self.unknown += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flags() {
        assert_eq!(StatusFlag::parse("A"), StatusFlag::Added);
        assert_eq!(StatusFlag::parse("m"), StatusFlag::Modified);
        assert_eq!(StatusFlag::parse(" D "), StatusFlag::Deleted);
        assert_eq!(StatusFlag::parse(""), StatusFlag::Unknown);
        assert_eq!(StatusFlag::parse("K"), StatusFlag::Unknown);
    }

    #[test]
    fn months_follow_flag() {
        assert_eq!(
            StatusFlag::Added.lifecycle_months(3),
            Some(["3".to_string(), "0".to_string(), "0".to_string()])
        );
        assert_eq!(
            StatusFlag::Modified.lifecycle_months(11),
            Some(["0".to_string(), "11".to_string(), "0".to_string()])
        );
        assert_eq!(
            StatusFlag::Deleted.lifecycle_months(1),
            Some(["0".to_string(), "0".to_string(), "1".to_string()])
        );
        assert_eq!(StatusFlag::Unknown.lifecycle_months(1), None);
    }

    #[test]
    fn counts() {
        let mut counts = StatusCounts::default();
        for flag in [StatusFlag::Added, StatusFlag::Added, StatusFlag::Unknown] {
            counts.record(flag);
        }
        assert_eq!(counts.added, 2);
        assert_eq!(counts.unknown, 1);
        assert_eq!(counts.deleted, 0);
    }
}
