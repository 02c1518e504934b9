use crate::catalog::IndexerCategory;

/// Macro reference rates, in percent per year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceRates {
    pub cdi_annual_pct: f64,
    pub ipca_annual_pct: f64,
}

/// Effective annual rate as a fraction (0.1278 = 12.78%).
///
/// `min_tax` is the offer's nominal rate in percent. Returns `None` for
/// indexers that cannot be simulated.
pub fn effective_annual_rate(
    category: IndexerCategory,
    min_tax: f64,
    rates: ReferenceRates,
) -> Option<f64> {
    let nominal = min_tax / 100.0;
    match category {
        // percentage of CDI, not a spread over it
        IndexerCategory::PostFixed => Some(nominal * (rates.cdi_annual_pct / 100.0)),
        IndexerCategory::InflationLinked => Some(rates.ipca_annual_pct / 100.0 + nominal),
        IndexerCategory::PreFixed => Some(nominal),
        IndexerCategory::Unrecognized => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn rates(cdi: f64, ipca: f64) -> ReferenceRates {
        ReferenceRates {
            cdi_annual_pct: cdi,
            ipca_annual_pct: ipca,
        }
    }

    #[test]
    fn test_post_fixed_is_fraction_of_cdi() {
        let rate = effective_annual_rate(IndexerCategory::PostFixed, 110.0, rates(10.0, 4.0)).unwrap();
        assert!((rate - 0.11).abs() < EPSILON);

        let rate = effective_annual_rate(IndexerCategory::PostFixed, 120.0, rates(10.65, 4.5)).unwrap();
        assert!((rate - 0.1278).abs() < EPSILON);
    }

    #[test]
    fn test_inflation_linked_adds_spread_to_ipca() {
        let rate =
            effective_annual_rate(IndexerCategory::InflationLinked, 5.0, rates(10.0, 4.0)).unwrap();
        assert!((rate - 0.09).abs() < EPSILON);
    }

    #[test]
    fn test_pre_fixed_ignores_reference_rates() {
        let a = effective_annual_rate(IndexerCategory::PreFixed, 12.0, rates(10.0, 4.0)).unwrap();
        let b = effective_annual_rate(IndexerCategory::PreFixed, 12.0, rates(0.0, 50.0)).unwrap();
        assert!((a - 0.12).abs() < EPSILON);
        assert_eq!(a, b);
    }

    #[test]
    fn test_unrecognized_has_no_rate() {
        assert!(effective_annual_rate(IndexerCategory::Unrecognized, 12.0, rates(10.0, 4.0)).is_none());
    }
}
