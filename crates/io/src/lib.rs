// File I/O for register and supplier files

pub mod csv;
pub mod fs;

pub use crate::csv::{parse_delimiter, read_file_as_utf8, sniff_delimiter};
pub use crate::fs::{backup_timestamp, backup_with_timestamp, write_atomic};
