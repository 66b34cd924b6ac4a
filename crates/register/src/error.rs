use std::fmt;

#[derive(Debug)]
pub enum MergeError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty field name, duplicate lifecycle column, etc.).
    ConfigValidation(String),
    /// The register or update batch has no identifier column.
    MissingKeyField { source: String, field: String },
    /// The update batch lacks a lifecycle month column.
    MissingColumn { source: String, column: String },
    /// Malformed CSV input.
    Csv { source: String, message: String },
    /// Writing the register snapshot failed.
    Io(String),
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingKeyField { source, field } => {
                write!(f, "{source}: missing key field '{field}'")
            }
            Self::MissingColumn { source, column } => {
                write!(f, "{source}: missing column '{column}'")
            }
            Self::Csv { source, message } => write!(f, "{source}: {message}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for MergeError {}

impl MergeError {
    pub(crate) fn csv(source: &str, err: csv::Error) -> Self {
        Self::Csv {
            source: source.into(),
            message: err.to_string(),
        }
    }

    /// True for errors caused by the shape of an input file rather than its syntax.
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::MissingKeyField { .. } | Self::MissingColumn { .. })
    }
}
