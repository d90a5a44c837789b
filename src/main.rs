mod api;
mod cli;
mod core;
mod logbook;
mod prelude;
mod quantity;
mod tables;

use chrono::Local;
use clap::{Parser, crate_version};

use crate::{
    api::elpris,
    cli::{Args, Command, FetchArgs, PlanArgs, ReviewArgs},
    core::{planner::Planner, schedule::Schedule, series::PriceSeries, trace::DecisionTrace},
    logbook::{Logbook, RunRecord},
    prelude::*,
    tables::{build_blocks_table, build_pairs_table, build_rates_table},
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_writer(std::io::stderr)
        .init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Plan(args) => plan(&args)?,
        Command::Rates(args) => rates(&args)?,
        Command::Inspect(args) => inspect(&args)?,
    }

    info!("done!");
    Ok(())
}

/// Fetch, solve, print the schedule lines, and append the logbook.
fn plan(args: &PlanArgs) -> Result {
    let started_at = Local::now();
    let tariff = args.tariff.try_into_tariff()?;
    let series = fetch_series(&args.fetch)?;

    let mut decision_trace = DecisionTrace::default();
    let pairs = Planner::builder().series(&series).tariff(&tariff).solve(&mut decision_trace);
    info!(n_pairs = pairs.len(), "planned");

    let schedule = Schedule::from_pairs(&pairs);
    if schedule.is_empty() {
        info!("nothing beats the margin, leaving the battery alone");
    }
    for line in schedule.render_lines(&args.code) {
        println!("{line}");
    }

    if !args.no_log {
        Logbook::new(&args.log_file).append(&RunRecord {
            started_at,
            date: args.fetch.date(),
            zone: args.fetch.zone,
            decision_trace: &decision_trace,
            schedule: &schedule,
            code: &args.code,
        })?;
    }
    Ok(())
}

fn rates(args: &ReviewArgs) -> Result {
    let tariff = args.tariff.try_into_tariff()?;
    let series = fetch_series(&args.fetch)?;
    println!("{}", build_rates_table(&series, &tariff));
    Ok(())
}

fn inspect(args: &ReviewArgs) -> Result {
    let tariff = args.tariff.try_into_tariff()?;
    let series = fetch_series(&args.fetch)?;

    let mut decision_trace = DecisionTrace::default();
    let pairs = Planner::builder().series(&series).tariff(&tariff).solve(&mut decision_trace);

    println!("{}", build_blocks_table(&decision_trace));
    println!("{}", build_pairs_table(&pairs));
    for line in Schedule::from_pairs(&pairs).render_lines("1234567") {
        println!("{line}");
    }
    Ok(())
}

fn fetch_series(args: &FetchArgs) -> Result<PriceSeries> {
    let entries = elpris::Api::new().get_day_ahead(args.date(), args.zone)?;
    info!(n_entries = entries.len(), "fetched energy rates");
    Ok(PriceSeries::try_from_hourly(entries)?)
}
