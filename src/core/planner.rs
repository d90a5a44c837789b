use std::cmp::Reverse;

use bon::Builder;
use itertools::Itertools;

use crate::{
    core::{
        block::{ChargeBlock, DischargeWindow, find_charge_blocks},
        series::PriceSeries,
        span::HourSpan,
        tariff::Tariff,
        trace::{Rejection, TraceEvent, TraceSink},
    },
    prelude::*,
    quantity::OrePerKilowattHour,
};

/// A committed charge/discharge cycle.
#[derive(Copy, Clone, Debug)]
pub struct Pair {
    pub charge: ChargeBlock,
    pub discharge: DischargeWindow,

    /// Öre per kWh of charged energy, after efficiency, fees and VAT.
    pub net_profit: OrePerKilowattHour,
}

/// Greedy chronological pair selection.
///
/// Charge blocks are visited grouped by start hour, earliest first; each
/// group commits at most one block, matched with the discharge window that
/// maximizes net profit among the spans that do not touch anything already
/// committed. This is a heuristic: a true optimum would also explore
/// non-chronological exchanges between cycles, which this planner does not.
#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Planner<'a> {
    series: &'a PriceSeries,
    tariff: &'a Tariff,
}

impl<S: planner_builder::IsComplete> PlannerBuilder<'_, S> {
    pub fn solve(self, sink: &mut impl TraceSink) -> Vec<Pair> {
        self.build().solve(sink)
    }
}

impl Planner<'_> {
    #[instrument(skip_all)]
    fn solve(self, sink: &mut impl TraceSink) -> Vec<Pair> {
        let blocks = find_charge_blocks(
            self.series,
            self.tariff.min_block_hours,
            self.tariff.max_block_hours,
        );
        for block in &blocks {
            sink.append(TraceEvent::BlockDiscovered {
                block: *block,
                n_windows: windows_downstream_of(block.span.end),
            });
        }

        let mut committed: Vec<HourSpan> = Vec::new();
        let mut pairs: Vec<Pair> = Vec::new();

        for (_, group) in &blocks.iter().chunk_by(|block| block.span.start) {
            let mut candidates: Vec<(ChargeBlock, DischargeWindow, OrePerKilowattHour)> =
                Vec::new();
            for &block in group {
                if committed.iter().any(|span| span.overlaps(block.span)) {
                    sink.append(TraceEvent::BlockRejected {
                        block,
                        reason: Rejection::OverlapsCommitted,
                    });
                } else if let Some((window, profit)) = self.best_window(block, &committed) {
                    candidates.push((block, window, profit));
                } else {
                    sink.append(TraceEvent::BlockRejected {
                        block,
                        reason: Rejection::NoFeasibleWindow,
                    });
                }
            }

            // On equal profit the longer block stores more energy.
            let Some(&(charge, discharge, net_profit)) = candidates
                .iter()
                .max_by_key(|(block, _, profit)| (*profit, block.span.duration_hours()))
            else {
                continue;
            };

            if net_profit > self.tariff.min_profit_margin {
                debug!(
                    charge = %charge.span,
                    discharge = %discharge.span,
                    %net_profit,
                    "committed",
                );
                let pair = Pair { charge, discharge, net_profit };
                committed.push(charge.span);
                committed.push(discharge.span);
                pairs.push(pair);
                sink.append(TraceEvent::PairCommitted { pair });
                for &(block, _, _) in
                    candidates.iter().filter(|(block, _, _)| block.span != charge.span)
                {
                    sink.append(TraceEvent::BlockRejected {
                        block,
                        reason: Rejection::OverlapsCommitted,
                    });
                }
            } else {
                for &(block, _, best_profit) in &candidates {
                    sink.append(TraceEvent::BlockRejected {
                        block,
                        reason: Rejection::BelowMargin { best_profit },
                    });
                }
            }
        }

        pairs
    }

    /// The most profitable discharge window strictly after the block.
    ///
    /// Ties break towards the earliest start (earlier realization of the
    /// benefit), then towards the longer window (more energy dispatched).
    fn best_window(
        &self,
        block: ChargeBlock,
        committed: &[HourSpan],
    ) -> Option<(DischargeWindow, OrePerKilowattHour)> {
        (block.span.end..24)
            .flat_map(|start| ((start + 1)..=24).map(move |end| HourSpan::new(start, end)))
            .filter(|span| !committed.iter().any(|other| other.overlaps(*span)))
            .map(|span| {
                let average_rate = self.series.average(span);
                let window = DischargeWindow { span, average_rate };
                (window, self.tariff.net_profit(block.average_rate, average_rate))
            })
            .max_by_key(|(window, profit)| {
                (*profit, Reverse(window.span.start), window.span.duration_hours())
            })
    }
}

/// Contiguous spans available between the block's end and the end of day.
const fn windows_downstream_of(end: u8) -> usize {
    let free = (24 - end) as usize;
    free * (free + 1) / 2
}
