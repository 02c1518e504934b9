//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of filtering and simulation from presentation. Amounts are
//! rounded here and nowhere else.

use chrono::NaiveDate;
use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::catalog::{Catalog, IndexerCategory};
use crate::error::SimulationError;
use crate::filter::{FilteredRecord, FilteredView};
use crate::reports::AveragesReport;
use crate::simulation::SimulationResult;

const BAR_WIDTH: f64 = 40.0;

/// Round an amount to cents for display.
///
/// `None` when the amount has no decimal representation (NaN, infinite or
/// beyond `Decimal::MAX`).
pub fn money(value: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(value).map(|amount| amount.round_dp(2))
}

fn brl(value: f64) -> String {
    match money(value) {
        Some(amount) => format!("R$ {:.2}", amount),
        None => "R$ (out of range)".to_string(),
    }
}

fn pct(value: f64) -> String {
    format!("{:.2}%", value)
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// "Data updated on" line for the snapshot
pub fn format_snapshot_banner(snapshot_date: Option<NaiveDate>) -> String {
    let date = snapshot_date
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "unknown date".to_string());
    format!("{} Data updated on {}\n", "📅".cyan(), date.bold())
}

pub fn format_facets(catalog: &Catalog) -> String {
    let mut output = format!("\n{} Snapshot facets\n", "🔎".cyan().bold());
    for (title, values) in [
        ("Banks", catalog.banks()),
        ("Indexers", catalog.indexers()),
        ("Ratings", catalog.ratings()),
    ] {
        output.push_str(&format!("\n{} ({})\n", title.bold(), values.len()));
        for value in values {
            output.push_str(&format!("  {}\n", value));
        }
    }
    output
}

pub fn format_facets_json(catalog: &Catalog) -> String {
    to_json(&serde_json::json!({
        "snapshot_date": catalog.snapshot_date(),
        "banks": catalog.banks(),
        "indexers": catalog.indexers(),
        "ratings": catalog.ratings(),
    }))
}

/// Filtered offers as a table, in catalog order
pub fn format_offers_table(view: &FilteredView<'_>) -> String {
    if view.is_empty() {
        return format_empty_view();
    }

    #[derive(Tabled)]
    struct OfferRow {
        #[tabled(rename = "Bank")]
        bank: String,
        #[tabled(rename = "Maturity")]
        maturity: String,
        #[tabled(rename = "Product")]
        product: String,
        #[tabled(rename = "Indexer")]
        indexer: String,
        #[tabled(rename = "Rating")]
        rating: String,
        #[tabled(rename = "Risk")]
        risk: String,
        #[tabled(rename = "Rate (% p.a.)")]
        rate: String,
        #[tabled(rename = "Min. application")]
        min_value: String,
        #[tabled(rename = "Available")]
        quantity: String,
    }

    let rows: Vec<OfferRow> = view
        .rows()
        .iter()
        .map(|row| {
            let r = row.record;
            OfferRow {
                bank: r.bank.clone(),
                maturity: r.maturity_date.format("%d/%m/%Y").to_string(),
                product: r.product.clone(),
                indexer: r.indexer.clone(),
                rating: r.rating_name.clone(),
                risk: format!("{}", r.risk_score),
                rate: format!("{:.2}", r.min_tax),
                min_value: brl(r.pu_min_value),
                quantity: format!("{}", r.quantity_available),
            }
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(5..), Alignment::right());

    format!(
        "\n{} CDB offers ({})\n\n{}\n",
        "📋".cyan().bold(),
        view.len(),
        table
    )
}

pub fn format_offers_json(view: &FilteredView<'_>) -> String {
    to_json(&serde_json::json!({
        "reference_date": view.reference_date(),
        "offers": view.rows(),
    }))
}

/// One card per category with the best offer, or a note when there is none
pub fn format_best_offers(best: &[(IndexerCategory, Option<&FilteredRecord<'_>>)]) -> String {
    let mut output = format!("\n{} Best CDBs of the day\n", "🏆".yellow().bold());

    for (category, offer) in best {
        output.push_str(&format!("\n  {} {}\n", "📌".cyan(), category.title().bold()));
        match offer {
            Some(row) => {
                let r = row.record;
                output.push_str(&format!("    Bank:     {}\n", r.bank));
                output.push_str(&format!(
                    "    Rate:     {}\n",
                    format!("{:.2}% p.a.", r.min_tax).blue()
                ));
                output.push_str(&format!(
                    "    Maturity: {}\n",
                    r.maturity_date.format("%B/%Y")
                ));
            }
            None => {
                output.push_str(&format!(
                    "    {} No offer available for this category\n",
                    "ℹ".blue().bold()
                ));
            }
        }
    }

    output
}

pub fn format_best_offers_json(best: &[(IndexerCategory, Option<&FilteredRecord<'_>>)]) -> String {
    #[derive(Serialize)]
    struct BestOfferJson<'r, 'a> {
        category: IndexerCategory,
        title: &'static str,
        offer: Option<&'r FilteredRecord<'a>>,
    }

    let cards: Vec<BestOfferJson> = best
        .iter()
        .map(|(category, offer)| BestOfferJson {
            category: *category,
            title: category.title(),
            offer: *offer,
        })
        .collect();

    to_json(&cards)
}

/// Average rate per indexer with a proportional bar scaled to the chart axis
pub fn format_averages(report: &AveragesReport) -> String {
    if report.is_empty() {
        return format!(
            "\n{} No data available for the chart\n",
            "ℹ".blue().bold()
        );
    }

    #[derive(Tabled)]
    struct AverageRow {
        #[tabled(rename = "Indexer")]
        indexer: String,
        #[tabled(rename = "Offers")]
        offers: usize,
        #[tabled(rename = "Avg. rate (%)")]
        average: String,
        #[tabled(rename = "")]
        bar: String,
    }

    let rows: Vec<AverageRow> = report
        .rows
        .iter()
        .map(|row| {
            let width = if report.axis_max > 0.0 {
                (row.avg_return / report.axis_max * BAR_WIDTH).round().max(0.0) as usize
            } else {
                0
            };
            AverageRow {
                indexer: row.indexer.clone(),
                offers: row.offers,
                average: format!("{:.2}", row.avg_return),
                bar: "█".repeat(width).blue().to_string(),
            }
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..3), Alignment::right());

    format!(
        "\n{} Average return by indexer (axis 0-{})\n\n{}\n",
        "📈".cyan().bold(),
        report.axis_max,
        table
    )
}

pub fn format_averages_json(report: &AveragesReport) -> String {
    to_json(report)
}

/// Corrective prompt for input that cannot be simulated at all
pub fn format_simulation_prompt(err: &SimulationError) -> String {
    let hint = match err {
        SimulationError::InvalidAmount { minimum, .. } => {
            format!("Use --amount with a value of at least {}", brl(*minimum))
        }
        SimulationError::InvalidRate { .. } => {
            "Use --cdi/--ipca with a non-negative percentage".to_string()
        }
        _ => String::new(),
    };
    format!(
        "\n{} {}\n  {}\n",
        "✗".red().bold(),
        err.to_string().red(),
        hint
    )
}

/// Simulator panel: one block per category
pub fn format_simulations(
    outcomes: &[(IndexerCategory, Result<SimulationResult, SimulationError>)],
) -> String {
    let mut output = format!("\n{} Investment simulator\n", "💰".green().bold());

    for (category, outcome) in outcomes {
        output.push_str(&format!("\n  {}\n", category.title().bold()));
        match outcome {
            Ok(result) => output.push_str(&format_simulation_result(result)),
            Err(err) if err.is_informational() => {
                output.push_str(&format!("    {} {}\n", "ℹ".blue().bold(), err));
            }
            Err(err) => {
                output.push_str(&format!("    {} {}\n", "✗".red().bold(), err.to_string().red()));
            }
        }
    }

    output
}

fn format_simulation_result(result: &SimulationResult) -> String {
    let mut output = String::new();
    let mut line = |label: &str, value: String| {
        output.push_str(&format!("    {:<16} {}\n", label, value));
    };

    line("Bank:", format!("{} ({})", result.bank, result.product));
    line(
        "Rate:",
        format!(
            "{:.2}% nominal, {} effective p.a.",
            result.nominal_rate,
            pct(result.effective_rate * 100.0)
        ),
    );
    line(
        "Maturity:",
        format!(
            "{} ({} days, {} business days)",
            result.maturity_date.format("%d/%m/%Y"),
            result.calendar_days,
            result.business_days
        ),
    );
    line("Invested:", brl(result.invested_amount));
    line("Gross return:", brl(result.gross_return).cyan().to_string());
    line(
        "Income tax:",
        format!("{} ({})", brl(result.tax_amount), pct(result.tax_rate * 100.0))
            .red()
            .to_string(),
    );
    line("Net return:", brl(result.net_return).green().to_string());
    line("Final value:", brl(result.final_value).green().bold().to_string());

    output
}

/// Amounts are JSON numbers rounded to cents, like the rates next to them.
/// An amount without a decimal representation is `null`.
#[derive(Serialize)]
struct SimulationResultJson {
    bank: String,
    product: String,
    nominal_rate: f64,
    effective_rate: f64,
    maturity_date: NaiveDate,
    calendar_days: i64,
    business_days: i64,
    #[serde(with = "rust_decimal::serde::float_option")]
    invested_amount: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    gross_return: Option<Decimal>,
    tax_rate: f64,
    #[serde(with = "rust_decimal::serde::float_option")]
    tax_amount: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    net_return: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    final_value: Option<Decimal>,
}

impl From<&SimulationResult> for SimulationResultJson {
    fn from(r: &SimulationResult) -> Self {
        Self {
            bank: r.bank.clone(),
            product: r.product.clone(),
            nominal_rate: r.nominal_rate,
            effective_rate: r.effective_rate,
            maturity_date: r.maturity_date,
            calendar_days: r.calendar_days,
            business_days: r.business_days,
            invested_amount: money(r.invested_amount),
            gross_return: money(r.gross_return),
            tax_rate: r.tax_rate,
            tax_amount: money(r.tax_amount),
            net_return: money(r.net_return),
            final_value: money(r.final_value),
        }
    }
}

#[derive(Serialize)]
struct SimulationErrorJson {
    kind: &'static str,
    message: String,
    informational: bool,
}

impl From<&SimulationError> for SimulationErrorJson {
    fn from(err: &SimulationError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            informational: err.is_informational(),
        }
    }
}

#[derive(Serialize)]
struct SimulationOutcomeJson {
    category: IndexerCategory,
    title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<SimulationResultJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<SimulationErrorJson>,
}

fn simulation_outcomes_json(
    outcomes: &[(IndexerCategory, Result<SimulationResult, SimulationError>)],
) -> Vec<SimulationOutcomeJson> {
    outcomes
        .iter()
        .map(|(category, outcome)| SimulationOutcomeJson {
            category: *category,
            title: category.title(),
            result: outcome.as_ref().ok().map(SimulationResultJson::from),
            error: outcome.as_ref().err().map(SimulationErrorJson::from),
        })
        .collect()
}

pub fn format_simulations_json(
    outcomes: &[(IndexerCategory, Result<SimulationResult, SimulationError>)],
) -> String {
    to_json(&simulation_outcomes_json(outcomes))
}

pub fn format_simulation_prompt_json(err: &SimulationError) -> String {
    to_json(&serde_json::json!({ "error": SimulationErrorJson::from(err) }))
}

/// Everything the dashboard shows, as one JSON document
pub fn format_dashboard_json(
    view: &FilteredView<'_>,
    snapshot_date: Option<NaiveDate>,
    best: &[(IndexerCategory, Option<&FilteredRecord<'_>>)],
    averages: &AveragesReport,
    simulations: Result<&[(IndexerCategory, Result<SimulationResult, SimulationError>)], &SimulationError>,
) -> String {
    let best: Vec<serde_json::Value> = best
        .iter()
        .map(|(category, offer)| {
            serde_json::json!({
                "category": category,
                "title": category.title(),
                "offer": offer,
            })
        })
        .collect();

    let simulations = match simulations {
        Ok(outcomes) => serde_json::json!(simulation_outcomes_json(outcomes)),
        Err(err) => serde_json::json!({ "error": SimulationErrorJson::from(err) }),
    };

    to_json(&serde_json::json!({
        "snapshot_date": snapshot_date,
        "reference_date": view.reference_date(),
        "best_offers": best,
        "averages": averages,
        "simulations": simulations,
        "offers": view.rows(),
    }))
}

/// Format empty view message
pub fn format_empty_view() -> String {
    format!(
        "{} No offers match the current filters\nTry widening the maturity window or removing a filter\n",
        "ℹ".blue().bold()
    )
}
