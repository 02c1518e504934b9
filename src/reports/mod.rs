// Reports module - aggregations over a filtered view

pub mod averages;

pub use averages::{average_rate_by_indexer, AveragesReport, IndexerAverage};
