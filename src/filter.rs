//! Filter engine
//!
//! Narrows a catalog by bank, indexer, rating and maturity window. Every pass
//! recomputes `days_to_maturity` against the reference date it is given; the
//! catalog itself is only borrowed.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::catalog::{Catalog, CertificateRecord};

/// How the bank dimension interprets its value set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankFilterMode {
    /// Keep only listed banks
    Inclusion,
    /// Drop listed banks, keep every other one
    Exclusion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankFilter {
    pub mode: BankFilterMode,
    pub values: BTreeSet<String>,
}

impl BankFilter {
    /// Every bank in the catalog (an exclusion of nothing)
    pub fn all() -> Self {
        Self {
            mode: BankFilterMode::Exclusion,
            values: BTreeSet::new(),
        }
    }

    pub fn include<I, S>(banks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: BankFilterMode::Inclusion,
            values: banks.into_iter().map(Into::into).collect(),
        }
    }

    pub fn exclude<I, S>(banks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: BankFilterMode::Exclusion,
            values: banks.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, bank: &str) -> bool {
        let listed = self.values.contains(bank);
        match self.mode {
            BankFilterMode::Inclusion => listed,
            BankFilterMode::Exclusion => !listed,
        }
    }
}

impl Default for BankFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// Indexer and rating dimensions: everything present, or an explicit set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    /// An empty set selects nothing.
    Only(BTreeSet<String>),
}

impl Selection {
    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Only(values.into_iter().map(Into::into).collect())
    }

    /// `All` covers the values present in the catalog, which never include blanks.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => !value.trim().is_empty(),
            Selection::Only(values) => values.contains(value),
        }
    }
}

/// Inclusive range of signed calendar days to maturity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaturityWindow {
    pub min_days: i64,
    pub max_days: i64,
}

impl MaturityWindow {
    pub fn new(min_days: i64, max_days: i64) -> Self {
        Self { min_days, max_days }
    }

    pub fn unbounded() -> Self {
        Self::new(i64::MIN, i64::MAX)
    }

    pub fn contains(&self, days_to_maturity: i64) -> bool {
        days_to_maturity >= self.min_days && days_to_maturity <= self.max_days
    }
}

impl Default for MaturityWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Named maturity buckets offered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaturityPreset {
    UpToSixMonths,
    SixMonthsToOneYear,
    OneToTwoYears,
    OverTwoYears,
}

impl MaturityPreset {
    pub const ALL: [MaturityPreset; 4] = [
        MaturityPreset::UpToSixMonths,
        MaturityPreset::SixMonthsToOneYear,
        MaturityPreset::OneToTwoYears,
        MaturityPreset::OverTwoYears,
    ];

    pub fn window(&self) -> MaturityWindow {
        match self {
            MaturityPreset::UpToSixMonths => MaturityWindow::new(0, 182),
            MaturityPreset::SixMonthsToOneYear => MaturityWindow::new(183, 365),
            MaturityPreset::OneToTwoYears => MaturityWindow::new(366, 730),
            MaturityPreset::OverTwoYears => MaturityWindow::new(731, 10_000),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaturityPreset::UpToSixMonths => "up-to-6m",
            MaturityPreset::SixMonthsToOneYear => "6m-1y",
            MaturityPreset::OneToTwoYears => "1y-2y",
            MaturityPreset::OverTwoYears => "over-2y",
        }
    }
}

impl fmt::Display for MaturityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaturityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        MaturityPreset::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown maturity preset '{}' (expected one of: {})",
                    s,
                    MaturityPreset::ALL.map(|p| p.as_str()).join(", ")
                )
            })
    }
}

/// Complete filter configuration for one evaluation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub banks: BankFilter,
    pub indexers: Selection,
    pub ratings: Selection,
    pub maturity: MaturityWindow,
}

impl FilterCriteria {
    fn matches_attributes(&self, record: &CertificateRecord) -> bool {
        self.banks.matches(&record.bank)
            && self.indexers.matches(&record.indexer)
            && self.ratings.matches(&record.rating_name)
    }
}

/// A catalog record that passed the filters, with its derived day count
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilteredRecord<'a> {
    #[serde(flatten)]
    pub record: &'a CertificateRecord,
    pub days_to_maturity: i64,
}

/// Read-only result of a filter pass, in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    rows: Vec<FilteredRecord<'a>>,
    reference_date: NaiveDate,
}

impl<'a> FilteredView<'a> {
    pub fn rows(&self) -> &[FilteredRecord<'a>] {
        &self.rows
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Apply `criteria` to `catalog` as seen from `reference_date`.
pub fn filter<'a>(
    catalog: &'a Catalog,
    criteria: &FilterCriteria,
    reference_date: NaiveDate,
) -> FilteredView<'a> {
    let rows: Vec<FilteredRecord<'a>> = catalog
        .records()
        .iter()
        .filter(|record| criteria.matches_attributes(record))
        .map(|record| FilteredRecord {
            record,
            days_to_maturity: record.days_to_maturity(reference_date),
        })
        .filter(|row| criteria.maturity.contains(row.days_to_maturity))
        .collect();

    debug!(
        "Filter kept {} of {} offers (reference date {})",
        rows.len(),
        catalog.len(),
        reference_date
    );

    FilteredView {
        rows,
        reference_date,
    }
}
