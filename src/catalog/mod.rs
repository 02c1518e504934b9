//! Instrument catalog
//!
//! An immutable, in-memory collection of CDB offers for one snapshot date.
//! Records are classified into an [`IndexerCategory`] once, when they are
//! built, so the selector and the simulator never match indexer labels again.

pub mod loader;

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

pub use loader::{load_catalog, snapshot_date_from_file_name};

/// Rate-indexation regime of a certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexerCategory {
    /// Percentage of CDI
    PostFixed,
    /// Fixed annual rate
    PreFixed,
    /// IPCA plus a fixed spread
    InflationLinked,
    Unrecognized,
}

impl IndexerCategory {
    /// Categories that have a best-offer card and can be simulated, in display order.
    pub const SIMULATED: [IndexerCategory; 3] = [
        IndexerCategory::PostFixed,
        IndexerCategory::PreFixed,
        IndexerCategory::InflationLinked,
    ];

    /// Classify a free-text indexer label.
    ///
    /// Matching ignores case and accents ("Pós", "POS" and "pos" are the same
    /// marker). Inflation markers win over the others, then post-fixed, then
    /// pre-fixed.
    pub fn classify(label: &str) -> Self {
        let normalized = normalize_label(label);
        if normalized.contains("INFLA") || normalized.contains("IPCA") {
            IndexerCategory::InflationLinked
        } else if normalized.contains("POS") {
            IndexerCategory::PostFixed
        } else if normalized.contains("PRE") {
            IndexerCategory::PreFixed
        } else {
            IndexerCategory::Unrecognized
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexerCategory::PostFixed => "POST_FIXED",
            IndexerCategory::PreFixed => "PRE_FIXED",
            IndexerCategory::InflationLinked => "INFLATION_LINKED",
            IndexerCategory::Unrecognized => "UNRECOGNIZED",
        }
    }

    /// Card title shown to the user
    pub fn title(&self) -> &'static str {
        match self {
            IndexerCategory::PostFixed => "CDB Pós-fixado",
            IndexerCategory::PreFixed => "CDB Prefixado",
            IndexerCategory::InflationLinked => "CDB IPCA+",
            IndexerCategory::Unrecognized => "CDB (other indexer)",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, IndexerCategory::Unrecognized)
    }
}

/// Upper-case, strip accents and collapse whitespace.
pub(crate) fn normalize_label(input: &str) -> String {
    let upper = input.to_uppercase();
    let mut out = String::with_capacity(upper.len());
    for ch in upper.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        out.push(ch);
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One row of the snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateRecord {
    pub bank: String,
    pub product: String,
    pub indexer: String,
    pub rating_name: String,
    pub risk_score: f64,
    /// Nominal annual rate in percent (10.65 means 10.65%)
    pub min_tax: f64,
    pub maturity_date: NaiveDate,
    pub pu_min_value: f64,
    pub quantity_available: f64,
    category: IndexerCategory,
}

impl CertificateRecord {
    pub fn new(
        bank: impl Into<String>,
        product: impl Into<String>,
        indexer: impl Into<String>,
        min_tax: f64,
        maturity_date: NaiveDate,
    ) -> Self {
        let indexer = indexer.into();
        let category = IndexerCategory::classify(&indexer);
        Self {
            bank: bank.into(),
            product: product.into(),
            indexer,
            rating_name: String::new(),
            risk_score: 0.0,
            min_tax,
            maturity_date,
            pu_min_value: 0.0,
            quantity_available: 0.0,
            category,
        }
    }

    pub fn with_rating(mut self, rating_name: impl Into<String>, risk_score: f64) -> Self {
        self.rating_name = rating_name.into();
        self.risk_score = risk_score;
        self
    }

    pub fn with_offer(mut self, pu_min_value: f64, quantity_available: f64) -> Self {
        self.pu_min_value = pu_min_value;
        self.quantity_available = quantity_available;
        self
    }

    pub fn category(&self) -> IndexerCategory {
        self.category
    }

    /// Signed calendar days from `reference_date` until maturity.
    pub fn days_to_maturity(&self, reference_date: NaiveDate) -> i64 {
        (self.maturity_date - reference_date).num_days()
    }
}

/// Read-only collection of offers for one snapshot
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<CertificateRecord>,
    snapshot_date: Option<NaiveDate>,
}

impl Catalog {
    pub fn new(records: Vec<CertificateRecord>, snapshot_date: Option<NaiveDate>) -> Self {
        Self {
            records,
            snapshot_date,
        }
    }

    pub fn records(&self) -> &[CertificateRecord] {
        &self.records
    }

    pub fn snapshot_date(&self) -> Option<NaiveDate> {
        self.snapshot_date
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct issuer names
    pub fn banks(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.bank.as_str()))
    }

    /// Sorted distinct indexer labels
    pub fn indexers(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.indexer.as_str()))
    }

    /// Sorted distinct rating names
    pub fn ratings(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.rating_name.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    values
        .filter(|v| !v.trim().is_empty())
        .sorted()
        .dedup()
        .collect()
}
