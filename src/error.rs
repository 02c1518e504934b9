//! Error handling for the CDB comparator
//!
//! Domain errors are typed with thiserror; the application edge uses
//! anyhow for context chaining and error propagation.

use thiserror::Error;

use crate::catalog::IndexerCategory;

/// Errors produced by a single simulation evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid amount: R$ {amount:.2} (minimum investment is R$ {minimum:.2})")]
    InvalidAmount { amount: f64, minimum: f64 },

    #[error("invalid rate: {name} must be a non-negative percentage, got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("unsupported indexer: '{0}' is not post-fixed, pre-fixed or inflation-linked")]
    UnsupportedIndexer(String),

    #[error("no instrument available for {}", .0.title())]
    EmptySelection(IndexerCategory),
}

impl SimulationError {
    /// Absence of a record is shown to the user as information, not as a failure.
    pub fn is_informational(&self) -> bool {
        matches!(self, SimulationError::EmptySelection(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SimulationError::InvalidAmount { .. } => "INVALID_AMOUNT",
            SimulationError::InvalidRate { .. } => "INVALID_RATE",
            SimulationError::UnsupportedIndexer(_) => "UNSUPPORTED_INDEXER",
            SimulationError::EmptySelection(_) => "EMPTY_SELECTION",
        }
    }
}

/// Errors raised while loading a snapshot into the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("missing column '{0}' in snapshot header")]
    MissingColumn(&'static str),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("csv error")]
    Csv(#[from] csv::Error),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application-level operations
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = SimulationError::InvalidAmount {
            amount: 99.99,
            minimum: 100.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid amount: R$ 99.99 (minimum investment is R$ 100.00)"
        );
    }

    #[test]
    fn test_empty_selection_is_informational() {
        assert!(SimulationError::EmptySelection(IndexerCategory::PreFixed).is_informational());
        assert!(!SimulationError::UnsupportedIndexer("CDI+".into()).is_informational());
        assert!(!SimulationError::InvalidRate {
            name: "CDI",
            value: -1.0
        }
        .is_informational());
    }

    #[test]
    fn test_anyhow_context_chains_errors() {
        use anyhow::Context;
        let result: Result<()> = Err(CatalogError::MissingColumn("minTax"))
            .context("failed to load snapshot");
        match result {
            Err(e) => {
                assert!(e.to_string().contains("failed to load snapshot"));
                let debug_msg = format!("{:?}", e);
                assert!(debug_msg.contains("minTax"));
            }
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn test_catalog_error_variants() {
        let err = CatalogError::MissingColumn("bank");
        assert!(err.to_string().starts_with("missing column"));

        let parse_err = CatalogError::ParseError("bad date".to_string());
        assert!(parse_err.to_string().starts_with("parse error"));
    }
}
