//! Tag table parsing
//!
//! Rows are `name,category_code,popularity,aliases` without a header. The
//! alias column is one (usually quoted) comma-joined string.

use crate::error::Result;
use crate::types::{Corpus, TagCategory, TagEntry};
use tracing::{debug, warn};

/// Outcome of parsing a tag table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Rows turned into entries
    pub parsed: usize,
    /// Rows dropped because the name was missing, blank or not UTF-8
    pub skipped: usize,
}

/// Parse a raw tag table into a popularity-sorted corpus
///
/// Rows whose name is missing, blank or not valid UTF-8 are skipped and the
/// rest of the table is kept. Aliases with invalid UTF-8 are decoded lossily.
/// Only failures of the CSV reader itself fail the whole parse.
pub fn parse_corpus(bytes: &[u8]) -> Result<(Corpus, ParseReport)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut entries = Vec::new();
    let mut report = ParseReport::default();

    for record in reader.byte_records() {
        let record = record?;

        let name = match std::str::from_utf8(record.get(0).unwrap_or_default()) {
            Ok(name) if !name.trim().is_empty() => name,
            Ok(_) => {
                report.skipped += 1;
                continue;
            }
            Err(e) => {
                debug!("Skipping tag row with invalid UTF-8 name: {}", e);
                report.skipped += 1;
                continue;
            }
        };

        let category = text_field(&record, 1)
            .and_then(parse_integer)
            .map(TagCategory::from_code)
            .unwrap_or_default();
        let popularity = text_field(&record, 2)
            .and_then(parse_integer)
            .map(|count| count.max(0) as u64)
            .unwrap_or(0);
        let aliases = String::from_utf8_lossy(record.get(3).unwrap_or_default());

        entries.push(TagEntry::new(name, category, popularity, aliases));
        report.parsed += 1;
    }

    if report.skipped > 0 {
        warn!("Skipped {} malformed tag rows", report.skipped);
    }
    debug!("Parsed {} tag rows", report.parsed);

    Ok((Corpus::from_entries(entries), report))
}

fn text_field(record: &csv::ByteRecord, index: usize) -> Option<&str> {
    record.get(index).and_then(|field| std::str::from_utf8(field).ok())
}

/// Lenient integer parsing: leading sign and digits, ignoring any trailing junk
fn parse_integer(field: &str) -> Option<i64> {
    let field = field.trim();
    let (negative, digits) = match field.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, field.strip_prefix('+').unwrap_or(field)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;

    Some(if negative { -value } else { value })
}
