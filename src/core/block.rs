use crate::{
    core::{series::PriceSeries, span::HourSpan},
    quantity::OrePerKilowattHour,
};

/// A candidate window for buying energy into the battery.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ChargeBlock {
    pub span: HourSpan,
    pub average_rate: OrePerKilowattHour,
}

/// A candidate window for selling energy back out of the battery.
///
/// Unlike charge blocks, discharge windows are not length-limited: any
/// contiguous run of hours after a charge block qualifies.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DischargeWindow {
    pub span: HourSpan,
    pub average_rate: OrePerKilowattHour,
}

/// Enumerate every charge block of the configured lengths.
///
/// No price filtering happens here: the planner has the full profitability
/// context and decides which blocks are worth anything. Output is
/// chronological by start hour, then by increasing duration.
pub fn find_charge_blocks(
    series: &PriceSeries,
    min_block_hours: u8,
    max_block_hours: u8,
) -> Vec<ChargeBlock> {
    let mut blocks = Vec::new();
    for start in 0..24 {
        for duration in min_block_hours..=max_block_hours {
            let end = start + duration;
            if end > 24 {
                break;
            }
            let span = HourSpan::new(start, end);
            blocks.push(ChargeBlock { span, average_rate: series.average(span) });
        }
    }
    blocks
}
