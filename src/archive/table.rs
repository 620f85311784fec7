//! Response body decoding and CSV parsing

use csv::ReaderBuilder;
use std::fmt;

/// Parsed CSV: rows of string fields, in file order, no schema.
pub type Table = Vec<Vec<String>>;

/// Encoding a response body was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => f.write_str("utf-8"),
            TextEncoding::Latin1 => f.write_str("latin-1"),
        }
    }
}

/// Decodes a body as UTF-8, falling back to Latin-1.
///
/// Latin-1 maps every byte to one character, so this never fails.
pub fn decode_body(bytes: &[u8]) -> (String, TextEncoding) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), TextEncoding::Utf8),
        Err(_) => (
            encoding_rs::mem::decode_latin1(bytes).into_owned(),
            TextEncoding::Latin1,
        ),
    }
}

/// Parses CSV text into a table.
///
/// No header row is assumed and rows may have differing field counts.
/// Each blank line yields an empty row, so row positions match the lines
/// of the file.
pub fn parse_table(text: &str) -> Result<Table, csv::Error> {
    let mut table = Table::new();
    let mut chunk: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.is_empty() {
            parse_chunk(&chunk, &mut table)?;
            chunk.clear();
            table.push(Vec::new());
        } else {
            chunk.push(line);
        }
    }
    parse_chunk(&chunk, &mut table)?;

    Ok(table)
}

/// Parses a run of non-blank lines, appending its records to `table`.
fn parse_chunk(lines: &[&str], table: &mut Table) -> Result<(), csv::Error> {
    if lines.is_empty() {
        return Ok(());
    }
    let joined = lines.join("\n");
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(joined.as_bytes());

    for record in reader.records() {
        table.push(record?.iter().map(str::to_string).collect());
    }
    Ok(())
}

/// Whether a successful response looks like the CSV file.
///
/// The host does not reliably declare a content type, so a body larger
/// than `min_bytes` is accepted regardless of what it claims to be.
pub fn is_usable(content_type: &str, body_len: usize, min_bytes: usize) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/csv")
        || content_type.contains("application/csv")
        || body_len > min_bytes
}

/// First `max_chars` characters of a body, lossily decoded, for logs.
pub fn preview(bytes: &[u8], max_chars: usize) -> String {
    String::from_utf8_lossy(bytes).chars().take(max_chars).collect()
}
