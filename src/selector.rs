//! Best-offer selection per indexation category

use crate::catalog::IndexerCategory;
use crate::filter::{FilteredRecord, FilteredView};

/// Highest `min_tax` offer of `category` in the view.
///
/// Ties keep the first record in catalog order. `None` means the category has
/// no offer under the current filters.
pub fn best_offer<'v, 'a>(
    view: &'v FilteredView<'a>,
    category: IndexerCategory,
) -> Option<&'v FilteredRecord<'a>> {
    view.rows()
        .iter()
        .filter(|row| row.record.category() == category)
        .fold(None, |best: Option<&FilteredRecord<'a>>, row| match best {
            Some(current) if current.record.min_tax >= row.record.min_tax => Some(current),
            _ => Some(row),
        })
}

/// Best offer for each simulated category, in card order.
pub fn best_offers<'v, 'a>(
    view: &'v FilteredView<'a>,
) -> Vec<(IndexerCategory, Option<&'v FilteredRecord<'a>>)> {
    IndexerCategory::SIMULATED
        .into_iter()
        .map(|category| (category, best_offer(view, category)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CertificateRecord};
    use crate::filter::{filter, FilterCriteria};
    use chrono::{Duration, NaiveDate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 30).unwrap()
    }

    fn offer(bank: &str, indexer: &str, rate: f64) -> CertificateRecord {
        CertificateRecord::new(bank, "CDB", indexer, rate, today() + Duration::days(365))
            .with_rating("AA", 1.0)
    }

    #[test]
    fn test_picks_highest_rate_within_category() {
        let catalog = Catalog::new(
            vec![
                offer("Banco A", "Pós-fixado", 105.0),
                offer("Banco B", "Pós-fixado", 120.0),
                offer("Banco C", "Prefixado", 14.0),
                offer("Banco D", "Pós-fixado", 110.0),
            ],
            None,
        );
        let view = filter(&catalog, &FilterCriteria::default(), today());

        let best = best_offer(&view, IndexerCategory::PostFixed).unwrap();
        assert_eq!(best.record.bank, "Banco B");

        let pre = best_offer(&view, IndexerCategory::PreFixed).unwrap();
        assert_eq!(pre.record.bank, "Banco C");
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let catalog = Catalog::new(
            vec![
                offer("Banco A", "Prefixado", 13.0),
                offer("Banco B", "Prefixado", 13.5),
                offer("Banco C", "Prefixado", 13.5),
            ],
            None,
        );
        let view = filter(&catalog, &FilterCriteria::default(), today());

        let best = best_offer(&view, IndexerCategory::PreFixed).unwrap();
        assert_eq!(best.record.bank, "Banco B");
    }

    #[test]
    fn test_missing_category_is_none() {
        let catalog = Catalog::new(vec![offer("Banco A", "Prefixado", 13.0)], None);
        let view = filter(&catalog, &FilterCriteria::default(), today());

        assert!(best_offer(&view, IndexerCategory::InflationLinked).is_none());
    }

    #[test]
    fn test_unrecognized_indexers_never_win_a_card() {
        let catalog = Catalog::new(
            vec![offer("Banco A", "CDI+", 99.0), offer("Banco B", "Prefixado", 12.0)],
            None,
        );
        let view = filter(&catalog, &FilterCriteria::default(), today());

        let cards = best_offers(&view);
        assert_eq!(cards.len(), 3);
        assert!(cards
            .iter()
            .flat_map(|(_, best)| best)
            .all(|row| row.record.bank != "Banco A"));
        // still part of the filtered view
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_selection_is_idempotent() {
        let catalog = Catalog::new(
            vec![
                offer("Banco A", "Inflação", 6.1),
                offer("Banco B", "Inflação", 6.4),
            ],
            None,
        );
        let view = filter(&catalog, &FilterCriteria::default(), today());

        let first = best_offer(&view, IndexerCategory::InflationLinked);
        let second = best_offer(&view, IndexerCategory::InflationLinked);
        assert_eq!(first, second);
        assert_eq!(first.unwrap().record.bank, "Banco B");
    }
}
