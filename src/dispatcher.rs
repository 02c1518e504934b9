//! Command dispatcher that routes parsed CLI commands to their handlers.
//!
//! Every handler runs one full evaluation: load the catalog, filter it as of
//! the reference date, then select, aggregate and simulate as the command
//! requires.

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::catalog::{load_catalog, Catalog};
use crate::cli::formatters;
use crate::cli::{Cli, Commands, FilterArgs, SimulationArgs};
use crate::config::{self, Settings};
use crate::filter::{filter, FilterCriteria};
use crate::reports::average_rate_by_indexer;
use crate::selector::best_offers;
use crate::simulation::simulate_all;

/// Shared state for one invocation
struct Context {
    settings: Settings,
    reference_date: NaiveDate,
    json: bool,
}

impl Context {
    fn open_catalog(&self, snapshot: Option<&Path>) -> Result<Catalog> {
        let path: PathBuf = snapshot
            .map(Path::to_path_buf)
            .or_else(|| self.settings.snapshot.clone())
            .ok_or_else(|| {
                anyhow!("No snapshot given. Pass a CSV file or set `snapshot` in the config file")
            })?;
        load_catalog(&path)
    }
}

/// Route a parsed command to its handler
pub fn dispatch_command(cli: &Cli) -> Result<()> {
    let settings = config::load_settings(cli.config.as_deref())?;
    let reference_date = cli.today.unwrap_or_else(|| Local::now().date_naive());
    info!("Evaluating as of {}", reference_date);

    let ctx = Context {
        settings,
        reference_date,
        json: cli.json,
    };

    match &cli.command {
        Commands::Facets { snapshot } => dispatch_facets(&ctx, snapshot.as_deref()),
        Commands::Table { snapshot, filters } => {
            dispatch_table(&ctx, snapshot.as_deref(), filters)
        }
        Commands::Best { snapshot, filters } => dispatch_best(&ctx, snapshot.as_deref(), filters),
        Commands::Averages { snapshot, filters } => {
            dispatch_averages(&ctx, snapshot.as_deref(), filters)
        }
        Commands::Simulate {
            snapshot,
            filters,
            simulation,
        } => dispatch_simulate(&ctx, snapshot.as_deref(), filters, simulation),
        Commands::Dashboard {
            snapshot,
            filters,
            simulation,
        } => dispatch_dashboard(&ctx, snapshot.as_deref(), filters, simulation),
    }
}

fn criteria(filters: &FilterArgs) -> Result<FilterCriteria> {
    let criteria = filters.to_criteria()?;
    debug!("Filter criteria: {:?}", criteria);
    Ok(criteria)
}

fn dispatch_facets(ctx: &Context, snapshot: Option<&Path>) -> Result<()> {
    let catalog = ctx.open_catalog(snapshot)?;

    if ctx.json {
        println!("{}", formatters::format_facets_json(&catalog));
    } else {
        print!("{}", formatters::format_snapshot_banner(catalog.snapshot_date()));
        print!("{}", formatters::format_facets(&catalog));
    }
    Ok(())
}

fn dispatch_table(ctx: &Context, snapshot: Option<&Path>, filters: &FilterArgs) -> Result<()> {
    let criteria = criteria(filters)?;
    let catalog = ctx.open_catalog(snapshot)?;
    let view = filter(&catalog, &criteria, ctx.reference_date);

    if ctx.json {
        println!("{}", formatters::format_offers_json(&view));
    } else {
        print!("{}", formatters::format_snapshot_banner(catalog.snapshot_date()));
        print!("{}", formatters::format_offers_table(&view));
    }
    Ok(())
}

fn dispatch_best(ctx: &Context, snapshot: Option<&Path>, filters: &FilterArgs) -> Result<()> {
    let criteria = criteria(filters)?;
    let catalog = ctx.open_catalog(snapshot)?;
    let view = filter(&catalog, &criteria, ctx.reference_date);
    let best = best_offers(&view);

    if ctx.json {
        println!("{}", formatters::format_best_offers_json(&best));
    } else {
        print!("{}", formatters::format_snapshot_banner(catalog.snapshot_date()));
        print!("{}", formatters::format_best_offers(&best));
    }
    Ok(())
}

fn dispatch_averages(ctx: &Context, snapshot: Option<&Path>, filters: &FilterArgs) -> Result<()> {
    let criteria = criteria(filters)?;
    let catalog = ctx.open_catalog(snapshot)?;
    let view = filter(&catalog, &criteria, ctx.reference_date);
    let report = average_rate_by_indexer(&view);

    if ctx.json {
        println!("{}", formatters::format_averages_json(&report));
    } else {
        print!("{}", formatters::format_averages(&report));
    }
    Ok(())
}

/// Invalid input is shown once as a corrective prompt instead of once per category.
fn dispatch_simulate(
    ctx: &Context,
    snapshot: Option<&Path>,
    filters: &FilterArgs,
    simulation: &SimulationArgs,
) -> Result<()> {
    let criteria = criteria(filters)?;
    let request = ctx
        .settings
        .request(simulation.amount, simulation.cdi, simulation.ipca);
    let limits = ctx.settings.limits();

    if let Err(err) = request.validate(&limits) {
        if ctx.json {
            println!("{}", formatters::format_simulation_prompt_json(&err));
        } else {
            print!("{}", formatters::format_simulation_prompt(&err));
        }
        return Ok(());
    }

    let catalog = ctx.open_catalog(snapshot)?;
    let view = filter(&catalog, &criteria, ctx.reference_date);
    let outcomes = simulate_all(&view, &request, &limits);

    if ctx.json {
        println!("{}", formatters::format_simulations_json(&outcomes));
    } else {
        print!("{}", formatters::format_simulations(&outcomes));
    }
    Ok(())
}

fn dispatch_dashboard(
    ctx: &Context,
    snapshot: Option<&Path>,
    filters: &FilterArgs,
    simulation: &SimulationArgs,
) -> Result<()> {
    let criteria = criteria(filters)?;
    let catalog = ctx.open_catalog(snapshot)?;
    let view = filter(&catalog, &criteria, ctx.reference_date);

    let best = best_offers(&view);
    let averages = average_rate_by_indexer(&view);

    let request = ctx
        .settings
        .request(simulation.amount, simulation.cdi, simulation.ipca);
    let limits = ctx.settings.limits();
    let simulations = request
        .validate(&limits)
        .map(|_| simulate_all(&view, &request, &limits));

    if ctx.json {
        println!(
            "{}",
            formatters::format_dashboard_json(
                &view,
                catalog.snapshot_date(),
                &best,
                &averages,
                simulations.as_deref(),
            )
        );
        return Ok(());
    }

    print!("{}", formatters::format_snapshot_banner(catalog.snapshot_date()));
    print!("{}", formatters::format_best_offers(&best));
    print!("{}", formatters::format_averages(&averages));
    match &simulations {
        Ok(outcomes) => print!("{}", formatters::format_simulations(outcomes)),
        Err(err) => print!("{}", formatters::format_simulation_prompt(err)),
    }
    print!("{}", formatters::format_offers_table(&view));
    Ok(())
}
