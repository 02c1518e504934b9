use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use encoding_rs::ISO_8859_15;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{Catalog, CertificateRecord};
use crate::error::CatalogError;

static SNAPSHOT_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_(\d{2})(\d{2})(\d{4})\.csv$").expect("valid snapshot date regex"));

/// Load a snapshot CSV file into an immutable catalog
pub fn load_catalog<P: AsRef<Path>>(file_path: P) -> Result<Catalog> {
    let path = file_path.as_ref();
    info!("Loading CDB snapshot: {:?}", path);

    let bytes = std::fs::read(path)
        .map_err(CatalogError::from)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let content = decode_snapshot(&bytes);

    let snapshot_date = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(snapshot_date_from_file_name);
    if snapshot_date.is_none() {
        debug!("No _DDMMYYYY suffix in {:?}, snapshot date unknown", path);
    }

    let catalog = parse_catalog(&content, snapshot_date)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

    info!("Loaded {} offers", catalog.len());
    Ok(catalog)
}

/// Extract the snapshot date from a `<name>_DDMMYYYY.csv` file name.
pub fn snapshot_date_from_file_name(file_name: &str) -> Option<NaiveDate> {
    let caps = SNAPSHOT_DATE_RE.captures(file_name)?;
    let day = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse snapshot CSV content. Rows that cannot be used are skipped with a warning.
pub fn parse_catalog(
    content: &str,
    snapshot_date: Option<NaiveDate>,
) -> Result<Catalog, CatalogError> {
    let content = content.trim_start_matches('\u{feff}');
    let delimiter = detect_delimiter(content);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    debug!("Snapshot headers: {:?}", headers);
    let columns = find_columns(&headers)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let row_num = idx + 2;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping row {}: {}", row_num, e);
                skipped += 1;
                continue;
            }
        };

        match parse_row(&row, &columns, row_num) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => skipped += 1,
            Err(e) => {
                warn!("Skipping row {}: {}", row_num, e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} unusable snapshot rows", skipped);
    }

    Ok(Catalog::new(records, snapshot_date))
}

/// Snapshots exported from spreadsheets are not always UTF-8.
fn decode_snapshot(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!("Snapshot is not valid UTF-8, decoding as ISO-8859-15");
            let (decoded, _, _) = ISO_8859_15.decode(bytes);
            decoded.into_owned()
        }
    }
}

fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}

#[derive(Debug)]
struct ColumnMapping {
    bank: usize,
    maturity_date: usize,
    product: Option<usize>,
    indexer: usize,
    rating_name: Option<usize>,
    risk_score: Option<usize>,
    min_tax: usize,
    pu_min_value: Option<usize>,
    quantity_available: Option<usize>,
}

fn find_columns(headers: &csv::StringRecord) -> Result<ColumnMapping, CatalogError> {
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    Ok(ColumnMapping {
        bank: position("bank").ok_or(CatalogError::MissingColumn("bank"))?,
        maturity_date: position("maturity_date")
            .ok_or(CatalogError::MissingColumn("maturity_date"))?,
        product: position("product"),
        indexer: position("indexer").ok_or(CatalogError::MissingColumn("indexer"))?,
        rating_name: position("ratingName"),
        risk_score: position("riskScore"),
        min_tax: position("minTax").ok_or(CatalogError::MissingColumn("minTax"))?,
        pu_min_value: position("puMinValue"),
        quantity_available: position("quantityAvailable"),
    })
}

fn parse_row(
    row: &csv::StringRecord,
    columns: &ColumnMapping,
    row_num: usize,
) -> Result<Option<CertificateRecord>, CatalogError> {
    let text = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("").trim();

    let bank = text(Some(columns.bank));
    if bank.is_empty() {
        debug!("Row {} has no bank, skipping", row_num);
        return Ok(None);
    }

    let maturity_date = parse_snapshot_date(text(Some(columns.maturity_date)))?;
    let min_tax = parse_snapshot_number(text(Some(columns.min_tax)))?;

    let optional_number = |idx: Option<usize>| {
        let raw = text(idx);
        if raw.is_empty() {
            Ok(0.0)
        } else {
            parse_snapshot_number(raw)
        }
    };

    let record = CertificateRecord::new(
        bank,
        text(columns.product),
        text(Some(columns.indexer)),
        min_tax,
        maturity_date,
    )
    .with_rating(text(columns.rating_name), optional_number(columns.risk_score)?)
    .with_offer(
        optional_number(columns.pu_min_value)?,
        optional_number(columns.quantity_available)?,
    );

    Ok(Some(record))
}

/// Accepts `YYYY-MM-DD` (with an optional time part) and `DD/MM/YYYY`.
pub(crate) fn parse_snapshot_date(raw: &str) -> Result<NaiveDate, CatalogError> {
    let date_part = raw
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(raw);

    if let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(date_part, "%d/%m/%Y") {
        return Ok(date);
    }

    Err(CatalogError::ParseError(format!(
        "could not parse date: '{}'",
        raw
    )))
}

/// Accepts `10.65`, `10,65`, `1.234,56`, `1,234.56` and values carrying `R$` or `%`.
///
/// When both separators appear, the last one is the decimal mark.
pub(crate) fn parse_snapshot_number(raw: &str) -> Result<f64, CatalogError> {
    let stripped: String = raw
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '%')
        .collect();

    let cleaned = match (stripped.rfind(','), stripped.rfind('.')) {
        (Some(comma), Some(dot)) if dot > comma => stripped.replace(',', ""),
        (Some(_), _) => stripped.replace('.', "").replace(',', "."),
        _ => stripped,
    };

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CatalogError::ParseError(format!("invalid number: '{}'", raw)))
}
