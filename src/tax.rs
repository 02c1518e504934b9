// Tax module - regressive income tax withheld on fixed-income returns

use serde::Serialize;

/// One step of the regressive schedule.
///
/// Applies to holdings of up to `max_days` calendar days; the last bracket is
/// open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxBracket {
    pub max_days: Option<i64>,
    /// Fraction of the gross return withheld (0.225 = 22.5%)
    pub rate: f64,
}

/// Regressive schedule for CDB income, shortest holding first
pub const REGRESSIVE_BRACKETS: [TaxBracket; 4] = [
    TaxBracket {
        max_days: Some(180),
        rate: 0.225,
    },
    TaxBracket {
        max_days: Some(360),
        rate: 0.20,
    },
    TaxBracket {
        max_days: Some(720),
        rate: 0.175,
    },
    TaxBracket {
        max_days: None,
        rate: 0.15,
    },
];

/// Withholding rate for a holding of `calendar_days` (signed, inclusive bounds).
///
/// Already-matured or same-day holdings fall in the first bracket.
pub fn regressive_tax_rate(calendar_days: i64) -> f64 {
    REGRESSIVE_BRACKETS
        .iter()
        .find(|bracket| bracket.max_days.map_or(true, |max| calendar_days <= max))
        .map(|bracket| bracket.rate)
        .unwrap_or(0.15)
}

/// Tax withheld on a gross return. Principal is never taxed.
pub fn tax_on_return(gross_return: f64, tax_rate: f64) -> f64 {
    gross_return * tax_rate
}
