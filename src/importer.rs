use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{FinsortError, Result};
use crate::models::Transaction;

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

/// Header names of the four columns the importer reads. Everything else in
/// the export is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub date: String,
    pub description: String,
    pub debit: String,
    pub credit: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: "Transaction Date".to_string(),
            description: "Description".to_string(),
            debit: "Debit".to_string(),
            credit: "Credit".to_string(),
        }
    }
}

struct ColumnIndex {
    date: usize,
    description: usize,
    debit: usize,
    credit: usize,
}

fn locate_columns(headers: &StringRecord, columns: &ColumnMap) -> Result<ColumnIndex> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| FinsortError::MissingColumn(name.to_string()))
    };
    Ok(ColumnIndex {
        date: find(&columns.date)?,
        description: find(&columns.description)?,
        debit: find(&columns.debit)?,
        credit: find(&columns.credit)?,
    })
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
enum RowError {
    #[error("could not convert {column} value '{value}' to a number")]
    InvalidAmount { column: String, value: String },

    #[error("{0}")]
    Malformed(#[from] csv::Error),
}

/// Parse a debit/credit cell. Thousands separators are dropped; anything that
/// is not a finite number is rejected.
fn parse_amount(raw: &str, column: &str) -> std::result::Result<f64, RowError> {
    raw.replace(',', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RowError::InvalidAmount {
            column: column.to_string(),
            value: raw.to_string(),
        })
}

/// `Ok(None)` means the row carries no amount and is dropped without comment.
fn parse_row(
    record: &StringRecord,
    index: &ColumnIndex,
    columns: &ColumnMap,
) -> std::result::Result<Option<Transaction>, RowError> {
    let field = |i: usize| record.get(i).unwrap_or("").trim();
    let debit = field(index.debit);
    let credit = field(index.credit);

    // Debit wins when a row fills in both columns.
    let amount = if !debit.is_empty() {
        -parse_amount(debit, &columns.debit)?
    } else if !credit.is_empty() {
        parse_amount(credit, &columns.credit)?
    } else {
        return Ok(None);
    };
    if amount == 0.0 {
        return Ok(None);
    }

    Ok(Some(Transaction::new(
        field(index.date),
        field(index.description),
        amount,
    )))
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ImportResult {
    pub transactions: Vec<Transaction>,
    /// Rows rejected with a warning (bad numbers, unreadable records).
    pub skipped: usize,
    /// Rows with neither a debit nor a credit.
    pub empty: usize,
}

pub fn parse_file(file_path: &Path, columns: &ColumnMap) -> Result<ImportResult> {
    let file = std::fs::File::open(file_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FinsortError::FileNotFound(file_path.to_path_buf()),
        _ => FinsortError::Other(format!("cannot open {}: {e}", file_path.display())),
    })?;
    debug!("Reading transactions from {}", file_path.display());
    parse_reader(std::io::BufReader::new(file), columns)
}

pub fn parse_reader<R: Read>(reader: R, columns: &ColumnMap) -> Result<ImportResult> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Ok(ImportResult::default());
    }
    let index = locate_columns(&headers, columns)?;

    let mut result = ImportResult::default();
    for (i, record) in rdr.records().enumerate() {
        let row = i + 1;
        let parsed = record
            .map_err(RowError::from)
            .and_then(|record| parse_row(&record, &index, columns));
        match parsed {
            Ok(Some(txn)) => result.transactions.push(txn),
            Ok(None) => result.empty += 1,
            Err(e) => {
                warn!("Skipping invalid row {row}: {e}");
                result.skipped += 1;
            }
        }
    }

    debug!(
        "Parsed {} transactions ({} skipped, {} without amount)",
        result.transactions.len(),
        result.skipped,
        result.empty
    );
    Ok(result)
}
