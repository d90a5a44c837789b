use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;

use crate::{
    core::{
        planner::Pair,
        series::PriceSeries,
        span::HourSpan,
        tariff::Tariff,
        trace::{DecisionTrace, Rejection},
    },
    quantity::OrePerKilowattHour,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

#[must_use]
pub fn build_rates_table(series: &PriceSeries, tariff: &Tariff) -> Table {
    let median = median_rate(series);
    let mut table = new_table();
    table.set_header(vec!["Hour", "Spot", "Charge cost", "Discharge benefit"]);
    for (hour, rate) in series.iter() {
        #[expect(clippy::cast_possible_truncation)]
        let span = HourSpan::new(hour as u8, hour as u8 + 1);
        table.add_row(vec![
            Cell::new(span),
            Cell::new(rate)
                .set_alignment(CellAlignment::Right)
                .fg(if rate >= median { Color::Red } else { Color::Green }),
            Cell::new(tariff.charge_cost(rate)).set_alignment(CellAlignment::Right),
            Cell::new(tariff.discharge_benefit(rate)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

fn median_rate(series: &PriceSeries) -> OrePerKilowattHour {
    let sorted: Vec<_> = series.iter().map(|(_, rate)| rate).sorted().collect();
    sorted[sorted.len() / 2]
}

#[must_use]
pub fn build_blocks_table(decision_trace: &DecisionTrace) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Block", "Avg rate", "Windows", "Outcome"]);
    for (block, n_windows) in decision_trace.discovered() {
        let (outcome, color) = if decision_trace.is_committed(block.span) {
            ("committed".to_string(), Color::Green)
        } else {
            match decision_trace.rejection_of(block.span) {
                Some(rejection @ Rejection::BelowMargin { .. }) => {
                    (rejection.to_string(), Color::DarkYellow)
                }
                Some(rejection) => (rejection.to_string(), Color::Reset),
                None => ("not evaluated".to_string(), Color::Reset),
            }
        };
        table.add_row(vec![
            Cell::new(block.span),
            Cell::new(block.average_rate).set_alignment(CellAlignment::Right),
            Cell::new(n_windows).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
            Cell::new(outcome).fg(color),
        ]);
    }
    table
}

#[must_use]
pub fn build_pairs_table(pairs: &[Pair]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Charge", "Avg", "Discharge", "Avg", "Net profit"]);
    for pair in pairs {
        table.add_row(vec![
            Cell::new(pair.charge.span).fg(Color::Green),
            Cell::new(pair.charge.average_rate).set_alignment(CellAlignment::Right),
            Cell::new(pair.discharge.span).fg(Color::Red),
            Cell::new(pair.discharge.average_rate).set_alignment(CellAlignment::Right),
            Cell::new(pair.net_profit).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
