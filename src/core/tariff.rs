use bon::Builder;

use crate::quantity::OrePerKilowattHour;

/// The immutable pricing configuration a run is planned against.
///
/// Built once from the CLI surface and passed by reference into every pure
/// function; the core performs no defaulting or parsing of its own.
#[derive(Builder, Copy, Clone, Debug)]
#[builder(finish_fn(vis = ""))]
pub struct Tariff {
    /// Grid transfer cost, öre per kWh, paid in both directions.
    pub grid_cost: OrePerKilowattHour,

    /// Fraction of charged energy recoverable at discharge, in `(0, 1]`.
    pub round_trip_efficiency: f64,

    /// Supplier margin as a fraction of the grid-inclusive price.
    pub supplier_addon_rate: f64,

    /// VAT as a fraction, applied after the supplier add-on.
    pub vat_rate: f64,

    /// A pair below or at this margin is not worth cycling the battery for.
    pub min_profit_margin: OrePerKilowattHour,

    #[builder(default = 1)]
    pub min_block_hours: u8,

    #[builder(default = 3)]
    pub max_block_hours: u8,
}

#[derive(Debug, PartialEq, derive_more::Display, derive_more::Error)]
pub enum TariffError {
    #[display("round-trip efficiency {value} is outside (0, 1]")]
    EfficiencyOutOfRange { value: f64 },

    #[display("{name} must not be negative")]
    NegativeComponent { name: &'static str },

    #[display("block hours {min}..={max} are not within 1..=24")]
    BlockHoursOutOfRange { min: u8, max: u8 },
}

impl<S: tariff_builder::IsComplete> TariffBuilder<S> {
    /// Finish the builder, rejecting out-of-range configuration.
    pub fn try_build(self) -> Result<Tariff, TariffError> {
        let tariff = self.build();
        if !(tariff.round_trip_efficiency > 0.0 && tariff.round_trip_efficiency <= 1.0) {
            return Err(TariffError::EfficiencyOutOfRange {
                value: tariff.round_trip_efficiency,
            });
        }
        for (name, value) in [
            ("supplier add-on rate", tariff.supplier_addon_rate),
            ("VAT rate", tariff.vat_rate),
        ] {
            if value < 0.0 {
                return Err(TariffError::NegativeComponent { name });
            }
        }
        if tariff.grid_cost < OrePerKilowattHour::ZERO {
            return Err(TariffError::NegativeComponent { name: "grid cost" });
        }
        if !(1 <= tariff.min_block_hours
            && tariff.min_block_hours <= tariff.max_block_hours
            && tariff.max_block_hours <= 24)
        {
            return Err(TariffError::BlockHoursOutOfRange {
                min: tariff.min_block_hours,
                max: tariff.max_block_hours,
            });
        }
        Ok(tariff)
    }
}

impl Tariff {
    fn fee_stacking(&self) -> f64 {
        (1.0 + self.supplier_addon_rate) * (1.0 + self.vat_rate)
    }

    /// Effective öre paid per kWh drawn from the grid at the given spot rate.
    pub fn charge_cost(&self, rate: OrePerKilowattHour) -> OrePerKilowattHour {
        (rate + self.grid_cost) * self.fee_stacking()
    }

    /// Effective öre earned per kWh delivered at the given spot rate, with
    /// the same fee and VAT stacking netted on the revenue side.
    pub fn discharge_benefit(&self, rate: OrePerKilowattHour) -> OrePerKilowattHour {
        (rate - self.grid_cost) * self.fee_stacking()
    }

    /// Net öre per kWh of charged energy for a charge/discharge rate pair.
    ///
    /// The charged energy is scaled down by the round-trip efficiency before
    /// being valued at the discharge rate.
    pub fn net_profit(
        &self,
        charge_rate: OrePerKilowattHour,
        discharge_rate: OrePerKilowattHour,
    ) -> OrePerKilowattHour {
        self.discharge_benefit(discharge_rate) * self.round_trip_efficiency
            - self.charge_cost(charge_rate)
    }
}

#[cfg(test)]
pub(crate) fn test_tariff() -> Tariff {
    // Deep-trough reference figures: grid 5, add-on 10 %, VAT 25 %,
    // round trip 85.7 %, margin 5.
    Tariff::builder()
        .grid_cost(5.0.into())
        .round_trip_efficiency(0.857)
        .supplier_addon_rate(0.10)
        .vat_rate(0.25)
        .min_profit_margin(5.0.into())
        .try_build()
        .unwrap()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_charge_cost_stacks_fees() {
        let tariff = test_tariff();
        assert_abs_diff_eq!(tariff.charge_cost(10.0.into()).0.0, 20.625, epsilon = 1e-9);
    }

    #[test]
    fn test_discharge_benefit_nets_fees() {
        let tariff = test_tariff();
        assert_abs_diff_eq!(
            tariff.discharge_benefit(80.0.into()).0.0,
            103.125,
            epsilon = 1e-9,
        );
    }

    #[test]
    fn test_net_profit() {
        let tariff = test_tariff();
        assert_abs_diff_eq!(
            tariff.net_profit(10.0.into(), 80.0.into()).0.0,
            0.857 * 103.125 - 20.625,
            epsilon = 1e-9,
        );
    }

    #[test]
    fn test_net_profit_strictly_decreases_with_grid_cost() {
        let mut previous = None;
        for grid_cost in [0.0, 2.5, 5.0, 10.0, 25.0] {
            let tariff = Tariff::builder()
                .grid_cost(grid_cost.into())
                .round_trip_efficiency(0.857)
                .supplier_addon_rate(0.10)
                .vat_rate(0.25)
                .min_profit_margin(5.0.into())
                .try_build()
                .unwrap();
            let profit = tariff.net_profit(10.0.into(), 80.0.into());
            if let Some(previous) = previous {
                assert!(profit < previous);
            }
            previous = Some(profit);
        }
    }

    #[test]
    fn test_zero_efficiency_is_rejected() {
        let result = Tariff::builder()
            .grid_cost(5.0.into())
            .round_trip_efficiency(0.0)
            .supplier_addon_rate(0.10)
            .vat_rate(0.25)
            .min_profit_margin(5.0.into())
            .try_build();
        assert_eq!(result.err(), Some(TariffError::EfficiencyOutOfRange { value: 0.0 }));
    }

    #[test]
    fn test_overunity_efficiency_is_rejected() {
        let result = Tariff::builder()
            .grid_cost(5.0.into())
            .round_trip_efficiency(1.2)
            .supplier_addon_rate(0.10)
            .vat_rate(0.25)
            .min_profit_margin(5.0.into())
            .try_build();
        assert_eq!(result.err(), Some(TariffError::EfficiencyOutOfRange { value: 1.2 }));
    }

    #[test]
    fn test_negative_grid_cost_is_rejected() {
        let result = Tariff::builder()
            .grid_cost((-1.0).into())
            .round_trip_efficiency(0.857)
            .supplier_addon_rate(0.10)
            .vat_rate(0.25)
            .min_profit_margin(5.0.into())
            .try_build();
        assert_eq!(result.err(), Some(TariffError::NegativeComponent { name: "grid cost" }));
    }

    #[test]
    fn test_inverted_block_hours_are_rejected() {
        let result = Tariff::builder()
            .grid_cost(5.0.into())
            .round_trip_efficiency(0.857)
            .supplier_addon_rate(0.10)
            .vat_rate(0.25)
            .min_profit_margin(5.0.into())
            .min_block_hours(4)
            .max_block_hours(2)
            .try_build();
        assert_eq!(result.err(), Some(TariffError::BlockHoursOutOfRange { min: 4, max: 2 }));
    }
}
