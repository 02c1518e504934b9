use itertools::Itertools;
use serde::Serialize;

use crate::filter::FilteredView;

/// Mean offered rate for one indexer label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexerAverage {
    pub indexer: String,
    pub avg_return: f64,
    pub offers: usize,
}

/// Average return per indexer, as plotted by the dashboard chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AveragesReport {
    pub rows: Vec<IndexerAverage>,
    /// Upper bound of the value axis: the largest average plus 5, rounded up to a multiple of 5
    pub axis_max: f64,
}

impl AveragesReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Group the view by indexer label and average `min_tax`. Labels are sorted.
pub fn average_rate_by_indexer(view: &FilteredView<'_>) -> AveragesReport {
    let rows: Vec<IndexerAverage> = view
        .rows()
        .iter()
        .map(|row| (row.record.indexer.as_str(), row.record.min_tax))
        .into_group_map()
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(b.0))
        .map(|(indexer, rates)| IndexerAverage {
            indexer: indexer.to_string(),
            avg_return: rates.iter().sum::<f64>() / rates.len() as f64,
            offers: rates.len(),
        })
        .collect();

    let axis_max = rows
        .iter()
        .map(|row| row.avg_return)
        .reduce(f64::max)
        .map(axis_ceiling)
        .unwrap_or(0.0);

    AveragesReport { rows, axis_max }
}

fn axis_ceiling(max_value: f64) -> f64 {
    ((max_value + 5.0) / 5.0).ceil() * 5.0
}
