use std::path::PathBuf;

use chrono::{Local, NaiveDate, TimeDelta};
use clap::{Parser, Subcommand};

use crate::{
    api::elpris::Zone,
    core::tariff::Tariff,
    prelude::*,
    quantity::OrePerKilowattHour,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: fetch the prices, plan the schedule, print it, and
    /// append the decision trace to the logbook.
    Plan(PlanArgs),

    /// Show the day's rates with the effective charge cost and discharge
    /// benefit per hour.
    Rates(ReviewArgs),

    /// Plan the schedule and show every decision as tables, without logging.
    Inspect(ReviewArgs),
}

#[derive(Copy, Clone, Parser)]
pub struct FetchArgs {
    /// Bidding zone to fetch prices for.
    #[clap(long, value_enum, default_value = "se3", env = "PRICE_ZONE")]
    pub zone: Zone,

    /// Delivery date; defaults to tomorrow.
    #[clap(long)]
    pub date: Option<NaiveDate>,
}

impl FetchArgs {
    pub fn date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive() + TimeDelta::days(1))
    }
}

#[derive(Copy, Clone, Parser)]
pub struct TariffArgs {
    /// Grid transfer cost in öre/kWh, paid in both directions.
    #[clap(long = "grid-cost", default_value = "86.375", env = "GRID_COST")]
    pub grid_cost: OrePerKilowattHour,

    /// Round-trip battery efficiency, within (0, 1].
    #[clap(
        long = "round-trip-efficiency",
        default_value = "0.857",
        env = "ROUND_TRIP_EFFICIENCY"
    )]
    pub round_trip_efficiency: f64,

    /// Supplier margin as a fraction of the grid-inclusive price.
    #[clap(long = "supplier-addon-rate", default_value = "0.10", env = "SUPPLIER_ADDON_RATE")]
    pub supplier_addon_rate: f64,

    /// VAT as a fraction, applied after the supplier add-on.
    #[clap(long = "vat-rate", default_value = "0.25", env = "VAT_RATE")]
    pub vat_rate: f64,

    /// Net profit in öre/kWh a pair must strictly exceed to be committed.
    #[clap(long = "min-profit-margin", default_value = "25", env = "MIN_PROFIT_MARGIN")]
    pub min_profit_margin: OrePerKilowattHour,

    /// Shortest charge block considered, in hours.
    #[clap(long = "min-block-hours", default_value = "1", env = "MIN_BLOCK_HOURS")]
    pub min_block_hours: u8,

    /// Longest charge block considered, in hours.
    #[clap(long = "max-block-hours", default_value = "3", env = "MAX_BLOCK_HOURS")]
    pub max_block_hours: u8,
}

impl TariffArgs {
    /// Validate into the immutable record the core plans against.
    pub fn try_into_tariff(self) -> Result<Tariff> {
        Ok(Tariff::builder()
            .grid_cost(self.grid_cost)
            .round_trip_efficiency(self.round_trip_efficiency)
            .supplier_addon_rate(self.supplier_addon_rate)
            .vat_rate(self.vat_rate)
            .min_profit_margin(self.min_profit_margin)
            .min_block_hours(self.min_block_hours)
            .max_block_hours(self.max_block_hours)
            .try_build()?)
    }
}

#[derive(Parser)]
pub struct PlanArgs {
    #[clap(flatten)]
    pub fetch: FetchArgs,

    #[clap(flatten)]
    pub tariff: TariffArgs,

    /// Slot code embedded in every rendered schedule line.
    #[clap(long, default_value = "1234567", env = "SLOT_CODE")]
    pub code: String,

    /// Logbook the decision trace is appended to.
    #[clap(long = "log-file", default_value = "magpie.log", env = "LOG_FILE")]
    pub log_file: PathBuf,

    /// Do not append to the logbook (dry run).
    #[clap(long)]
    pub no_log: bool,
}

#[derive(Parser)]
pub struct ReviewArgs {
    #[clap(flatten)]
    pub fetch: FetchArgs,

    #[clap(flatten)]
    pub tariff: TariffArgs,
}
