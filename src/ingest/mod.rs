//! Bank statement ingestion
//!
//! Turns a raw delimited export (`date, amount, description...`) into the
//! ordered list of usable rows. Rows that cannot be read as a transaction are
//! skipped rather than failing the import; only structurally broken input or
//! an export with nothing usable in it is an error.

pub mod categorize;

pub use categorize::*;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use crate::types::{LedgerError, LedgerResult};
use crate::utils::money::parse_amount;

/// Date format used by the bank exports (`DD/MM/YYYY`)
pub const BANK_DATE_FORMAT: &str = "%d/%m/%Y";

/// A usable statement row, before reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// Position of the record in the export, counting skipped records
    pub file_index: usize,
    pub date: NaiveDate,
    pub amount: BigDecimal,
    pub description: String,
    /// Category supplied by the caller, if any
    pub category: Option<String>,
}

/// Pick the field delimiter from the first non-blank line.
///
/// Tabs win ties, and a line with neither character is treated as
/// tab-separated.
pub fn detect_delimiter(content: &str) -> u8 {
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let tabs = trimmed.matches('\t').count();
        let commas = trimmed.matches(',').count();
        if tabs >= commas {
            return b'\t';
        }
        return b',';
    }
    b','
}

/// Parse a bank export into its usable rows, in file order
pub fn parse_rows(content: &str) -> LedgerResult<Vec<RawRow>> {
    let delimiter = detect_delimiter(content);
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (file_index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| LedgerError::Parse(e.to_string()))?;
        match parse_record(file_index, &record) {
            Some(row) => rows.push(row),
            None => skipped += 1,
        }
    }

    log::debug!(
        "Parsed bank export: {} rows kept, {} skipped, delimiter {:?}",
        rows.len(),
        skipped,
        delimiter as char
    );

    if rows.is_empty() {
        return Err(LedgerError::EmptyImport);
    }
    Ok(rows)
}

fn parse_record(file_index: usize, record: &StringRecord) -> Option<RawRow> {
    if record.len() < 3 {
        return None;
    }
    let date_raw = record.get(0).unwrap_or_default().trim();
    let amount_raw = record.get(1).unwrap_or_default().trim();
    let description = record
        .iter()
        .skip(2)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();

    if date_raw.is_empty() && amount_raw.is_empty() && description.is_empty() {
        return None;
    }

    let date = NaiveDate::parse_from_str(date_raw, BANK_DATE_FORMAT).ok()?;
    let amount = parse_amount(amount_raw)?;

    Some(RawRow {
        file_index,
        date,
        amount,
        description,
        category: None,
    })
}
