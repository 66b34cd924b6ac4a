//! Lifecycle classification of update records.
//!
//! Each update row carries three month codes (created, changed, deleted).
//! Classification tests Delete, Insert, Modify in that order; the first rule
//! that matches wins and anything else is a conflict.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// How month codes are compared against each other and against `"0"`.
///
/// `Lexical` is the legacy rule: codes are compared as strings, so `"10"`
/// sorts before `"2"`, `""` counts as unset and `"00"` counts as set.
/// `Numeric` parses codes as unsigned integers (blank = 0) and rejects
/// anything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthOrdering {
    #[default]
    Lexical,
    Numeric,
}

impl std::fmt::Display for MonthOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical"),
            Self::Numeric => write!(f, "numeric"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleSignal {
    Delete,
    Insert,
    Modify,
    Conflict,
}

impl std::fmt::Display for LifecycleSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delete => write!(f, "delete"),
            Self::Insert => write!(f, "insert"),
            Self::Modify => write!(f, "modify"),
            Self::Conflict => write!(f, "conflict"),
        }
    }
}

/// The three month codes of one update row, as read from the file.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleMonths<'a> {
    pub created: &'a str,
    pub changed: &'a str,
    pub deleted: &'a str,
}

/// A month code that could not be parsed under `MonthOrdering::Numeric`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedMonth {
    pub field: &'static str,
    pub value: String,
}

impl MonthOrdering {
    /// Compare two month codes. Fails only under `Numeric` ordering.
    pub fn compare(self, a: &str, b: &str) -> Result<Ordering, String> {
        match self {
            Self::Lexical => Ok(a.cmp(b)),
            Self::Numeric => {
                let a = parse_month(a).ok_or_else(|| a.to_string())?;
                let b = parse_month(b).ok_or_else(|| b.to_string())?;
                Ok(a.cmp(&b))
            }
        }
    }
}

fn parse_month(value: &str) -> Option<u64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    trimmed.parse().ok()
}

/// Classify one update row. Branches are mutually exclusive by precedence.
pub fn classify(
    months: &LifecycleMonths<'_>,
    ordering: MonthOrdering,
) -> Result<LifecycleSignal, MalformedMonth> {
    match ordering {
        MonthOrdering::Lexical => Ok(decide(
            months.created,
            months.changed,
            months.deleted,
            |m: &&str| *m > "0",
        )),
        MonthOrdering::Numeric => {
            let parse = |field: &'static str, value: &str| {
                parse_month(value).ok_or_else(|| MalformedMonth {
                    field,
                    value: value.to_string(),
                })
            };
            let created = parse("created", months.created)?;
            let changed = parse("changed", months.changed)?;
            let deleted = parse("deleted", months.deleted)?;
            Ok(decide(created, changed, deleted, |m: &u64| *m > 0))
        }
    }
}

fn decide<T: PartialEq>(
    created: T,
    changed: T,
    deleted: T,
    is_set: impl Fn(&T) -> bool,
) -> LifecycleSignal {
    let deleted_set = is_set(&deleted);

    if deleted_set && created != deleted {
        LifecycleSignal::Delete
    } else if is_set(&created) && !deleted_set {
        LifecycleSignal::Insert
    } else if is_set(&changed) && !deleted_set {
        LifecycleSignal::Modify
    } else {
        LifecycleSignal::Conflict
    }
}
