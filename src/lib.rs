//! CDBs - Brazilian bank certificate of deposit comparator
//!
//! This library loads daily snapshots of CDB offers, filters them, picks the
//! best offer per indexer and simulates the after-tax return of an investment.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod reports;
pub mod selector;
pub mod simulation;
pub mod tax;
