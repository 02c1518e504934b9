//! Yield simulation engine
//!
//! Projects the after-tax payout of investing in a single CDB offer:
//!
//! 1. resolve the effective annual rate for the offer's indexer
//! 2. count business days until maturity
//! 3. compound the investment over `business_days / 252` years
//! 4. withhold the regressive income tax, chosen by calendar days
//!
//! Everything is a pure function of its inputs, including the reference date.
//! Amounts are not rounded here.

pub mod calendar;
pub mod rates;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::catalog::{CertificateRecord, IndexerCategory};
use crate::error::SimulationError;
use crate::filter::FilteredView;
use crate::selector::best_offer;
use crate::tax::{regressive_tax_rate, tax_on_return};

pub use calendar::{business_days_between, BUSINESS_DAYS_PER_YEAR};
pub use rates::{effective_annual_rate, ReferenceRates};

pub const DEFAULT_MIN_INVESTMENT: f64 = 100.0;
pub const DEFAULT_INVESTED_AMOUNT: f64 = 5000.0;
pub const DEFAULT_CDI_PCT: f64 = 10.65;
pub const DEFAULT_IPCA_PCT: f64 = 4.5;

/// What the user asks to simulate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationRequest {
    pub invested_amount: f64,
    pub cdi_annual_pct: f64,
    pub ipca_annual_pct: f64,
}

impl Default for SimulationRequest {
    fn default() -> Self {
        Self {
            invested_amount: DEFAULT_INVESTED_AMOUNT,
            cdi_annual_pct: DEFAULT_CDI_PCT,
            ipca_annual_pct: DEFAULT_IPCA_PCT,
        }
    }
}

impl SimulationRequest {
    fn reference_rates(&self) -> ReferenceRates {
        ReferenceRates {
            cdi_annual_pct: self.cdi_annual_pct,
            ipca_annual_pct: self.ipca_annual_pct,
        }
    }

    /// Reject the request before any computation happens.
    pub fn validate(&self, limits: &SimulationLimits) -> Result<(), SimulationError> {
        let amount = self.invested_amount;
        if !amount.is_finite() || amount <= 0.0 || amount < limits.min_investment {
            return Err(SimulationError::InvalidAmount {
                amount,
                minimum: limits.min_investment,
            });
        }

        for (name, value) in [("CDI", self.cdi_annual_pct), ("IPCA", self.ipca_annual_pct)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::InvalidRate { name, value });
            }
        }

        Ok(())
    }
}

/// Configurable bounds on simulation input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationLimits {
    pub min_investment: f64,
}

impl Default for SimulationLimits {
    fn default() -> Self {
        Self {
            min_investment: DEFAULT_MIN_INVESTMENT,
        }
    }
}

/// Projected payout of one offer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub category: IndexerCategory,
    pub bank: String,
    pub product: String,
    /// Offer rate as published, in percent
    pub nominal_rate: f64,
    /// Annual rate used for compounding, as a fraction
    pub effective_rate: f64,
    pub maturity_date: NaiveDate,
    pub calendar_days: i64,
    pub business_days: i64,
    pub invested_amount: f64,
    pub gross_return: f64,
    /// Fraction withheld (0.2 = 20%)
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub net_return: f64,
    pub final_value: f64,
}

/// Simulate investing `request.invested_amount` in `record` from `reference_date` to maturity.
pub fn simulate(
    record: &CertificateRecord,
    request: &SimulationRequest,
    limits: &SimulationLimits,
    reference_date: NaiveDate,
) -> Result<SimulationResult, SimulationError> {
    request.validate(limits)?;

    let category = record.category();
    let effective_rate =
        effective_annual_rate(category, record.min_tax, request.reference_rates())
            .ok_or_else(|| SimulationError::UnsupportedIndexer(record.indexer.clone()))?;

    let business_days = business_days_between(reference_date, record.maturity_date);
    let years = business_days as f64 / BUSINESS_DAYS_PER_YEAR;
    let gross_return = request.invested_amount * ((1.0 + effective_rate).powf(years) - 1.0);

    let calendar_days = record.days_to_maturity(reference_date);
    let tax_rate = regressive_tax_rate(calendar_days);
    let tax_amount = tax_on_return(gross_return, tax_rate);
    let net_return = gross_return - tax_amount;
    let final_value = request.invested_amount + net_return;

    debug!(
        "Simulated {} {}: rate {:.6}, {} business days, gross {:.2}, tax {:.1}%",
        record.bank,
        category.as_str(),
        effective_rate,
        business_days,
        gross_return,
        tax_rate * 100.0
    );

    Ok(SimulationResult {
        category,
        bank: record.bank.clone(),
        product: record.product.clone(),
        nominal_rate: record.min_tax,
        effective_rate,
        maturity_date: record.maturity_date,
        calendar_days,
        business_days,
        invested_amount: request.invested_amount,
        gross_return,
        tax_rate,
        tax_amount,
        net_return,
        final_value,
    })
}

/// Simulate the best offer of `category` in the filtered view.
pub fn simulate_best(
    view: &FilteredView<'_>,
    category: IndexerCategory,
    request: &SimulationRequest,
    limits: &SimulationLimits,
) -> Result<SimulationResult, SimulationError> {
    request.validate(limits)?;
    let best = best_offer(view, category).ok_or(SimulationError::EmptySelection(category))?;
    simulate(best.record, request, limits, view.reference_date())
}

/// One simulation outcome per card category, in card order.
pub fn simulate_all(
    view: &FilteredView<'_>,
    request: &SimulationRequest,
    limits: &SimulationLimits,
) -> Vec<(IndexerCategory, Result<SimulationResult, SimulationError>)> {
    IndexerCategory::SIMULATED
        .into_iter()
        .map(|category| (category, simulate_best(view, category, request, limits)))
        .collect()
}
