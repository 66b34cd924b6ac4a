// Reading supplier and register CSV files

use std::io::Read;
use std::path::Path;

use tracing::debug;

/// Read a file as UTF-8, falling back to Windows-1252.
///
/// Supplier exports are usually Windows-1252 even when labelled Latin-1;
/// the register itself is always written as UTF-8.
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| format!("cannot open {}: {}", path.display(), e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            debug!(path = %path.display(), "not UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Parse a `--delimiter` value: a single ASCII character, `tab`/`\t`, or
/// `auto` (returns `None`, meaning sniff from the content).
pub fn parse_delimiter(value: &str) -> Result<Option<u8>, String> {
    match value {
        "auto" => Ok(None),
        "tab" | "\\t" | "\t" => Ok(Some(b'\t')),
        s if s.len() == 1 && s.is_ascii() => Ok(Some(s.as_bytes()[0])),
        other => Err(format!(
            "invalid delimiter '{}': expected one character, 'tab' or 'auto'",
            other
        )),
    }
}

/// Guess the field delimiter of a supplier file from its first lines.
///
/// Candidates are tab, semicolon, comma and pipe. A candidate must split the
/// header into more than one field; the one that splits the most sampled
/// lines into the same number of fields as the header wins, with wider
/// headers breaking ties.
pub fn sniff_delimiter(content: &str) -> u8 {
    let lines: Vec<&str> = content.lines().take(10).collect();
    let mut best = (b',', 0usize);

    for delim in [b'\t', b';', b',', b'|'] {
        let widths: Vec<usize> = lines
            .iter()
            .map(|line| {
                ::csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map_or(1, |r| r.len())
            })
            .collect();

        let header_width = match widths.first() {
            Some(&w) if w > 1 => w,
            _ => continue,
        };
        let score = widths.iter().filter(|&&w| w == header_width).count() * header_width;
        if score > best.1 {
            best = (delim, score);
        }
    }

    best.0
}
