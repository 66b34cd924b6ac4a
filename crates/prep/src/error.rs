use std::fmt;

#[derive(Debug)]
pub enum PrepError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty synonym table, zero month, etc.).
    ConfigValidation(String),
    /// A supplier column has no canonical field in the synonym table.
    UnknownHeader(String),
    /// A PD lookup row does not have exactly five fields.
    LookupRow { line: usize, fields: usize },
    /// Malformed CSV input.
    Csv(String),
}

impl fmt::Display for PrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnknownHeader(header) => write!(
                f,
                "no synonym found for column name '{header}', update the synonym table"
            ),
            Self::LookupRow { line, fields } => write!(
                f,
                "PD lookup line {line}: expected 5 fields (LAD, E-code, O-code, PD code, constituency), found {fields}"
            ),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for PrepError {}

impl From<csv::Error> for PrepError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}
