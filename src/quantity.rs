use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::Mul;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Öre per kilowatt-hour.
///
/// All monetary arithmetic happens in the minor currency unit per energy
/// unit. The inner [`OrderedFloat`] makes the rate totally ordered, so
/// candidate selection can run through `max_by_key` directly.
#[derive(
    Clone,
    Copy,
    Deserialize,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
)]
#[from(f64, OrderedFloat<f64>)]
#[must_use]
pub struct OrePerKilowattHour(pub OrderedFloat<f64>);

impl OrePerKilowattHour {
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    /// Convert an SEK/kWh spot quote into öre/kWh.
    pub fn from_sek(sek_per_kilowatt_hour: f64) -> Self {
        Self(OrderedFloat(sek_per_kilowatt_hour * 100.0))
    }
}

impl Mul<f64> for OrePerKilowattHour {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for OrePerKilowattHour {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, rate| acc + rate)
    }
}

impl Display for OrePerKilowattHour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} öre/kWh", self.0)
    }
}

impl Debug for OrePerKilowattHour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}öre/kWh", self.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_from_sek() {
        assert_abs_diff_eq!(OrePerKilowattHour::from_sek(0.25).0.0, 25.0);
    }

    #[test]
    fn test_sum() {
        let total: OrePerKilowattHour =
            [OrePerKilowattHour::from(10.0), OrePerKilowattHour::from(32.5)].into_iter().sum();
        assert_eq!(total, OrePerKilowattHour::from(42.5));
    }

    #[test]
    fn test_ordering() {
        assert!(OrePerKilowattHour::from(10.0) < OrePerKilowattHour::from(80.0));
    }
}
