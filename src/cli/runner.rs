use anyhow::{bail, Result};

use crate::cli::FilterArgs;
use crate::filter::{BankFilter, FilterCriteria, MaturityWindow, Selection};

impl FilterArgs {
    /// Convert command-line filters into engine criteria.
    ///
    /// An absent flag means "everything in the catalog". A custom day range
    /// may be open on either side.
    pub fn to_criteria(&self) -> Result<FilterCriteria> {
        let banks = if !self.banks.is_empty() {
            BankFilter::include(self.banks.iter().cloned())
        } else {
            BankFilter::exclude(self.exclude_banks.iter().cloned())
        };

        let maturity = match (self.maturity, self.min_days, self.max_days) {
            (Some(preset), _, _) => preset.window(),
            (None, None, None) => MaturityWindow::unbounded(),
            (None, min, max) => {
                let window = MaturityWindow::new(min.unwrap_or(i64::MIN), max.unwrap_or(i64::MAX));
                if window.min_days > window.max_days {
                    bail!(
                        "--min-days ({}) must not exceed --max-days ({})",
                        window.min_days,
                        window.max_days
                    );
                }
                window
            }
        };

        Ok(FilterCriteria {
            banks,
            indexers: selection(&self.indexers),
            ratings: selection(&self.ratings),
            maturity,
        })
    }
}

fn selection(values: &[String]) -> Selection {
    if values.is_empty() {
        Selection::All
    } else {
        Selection::only(values.iter().cloned())
    }
}
