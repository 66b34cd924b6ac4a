//! CLI Exit Code Registry
//!
//! Single source of truth for `elreg` exit codes. The monthly update scripts
//! branch on these, so treat them as part of the interface.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain     | Description                                  |
//! |---------|------------|----------------------------------------------|
//! | 0       | Universal  | Success                                      |
//! | 1       | Universal  | General error (unspecified)                  |
//! | 2       | Universal  | CLI usage error (bad args)                   |
//! | 3-9     | merge      | Input shape, IO, CSV, config, strict skips   |
//! | 10-19   | prep       | Header mapping and lookup table codes        |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `CliError` or the command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments. clap exits with this code on its own errors.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Merge and shared file handling (3-9)
// =============================================================================

/// An input lacks the key field or a lifecycle column.
pub const EXIT_SCHEMA: u8 = 3;

/// A file could not be read, backed up or written.
pub const EXIT_IO: u8 = 4;

/// Malformed CSV in an input file.
pub const EXIT_CSV_PARSE: u8 = 5;

/// Bad TOML configuration or an invalid override.
pub const EXIT_CONFIG: u8 = 6;

/// `merge --strict` skipped at least one record; nothing was written.
pub const EXIT_MERGE_SKIPPED: u8 = 7;

// =============================================================================
// Prep (10-19)
// =============================================================================

/// A supplier column has no entry in the synonym table.
pub const EXIT_PREP_UNKNOWN_HEADER: u8 = 10;

/// The PD lookup table has a row without exactly five fields.
pub const EXIT_PREP_LOOKUP: u8 = 11;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_SCHEMA,
            EXIT_IO,
            EXIT_CSV_PARSE,
            EXIT_CONFIG,
            EXIT_MERGE_SKIPPED,
            EXIT_PREP_UNKNOWN_HEADER,
            EXIT_PREP_LOOKUP,
        ];
        let unique: std::collections::HashSet<u8> = codes.iter().copied().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
