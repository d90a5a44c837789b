use crate::{core::span::HourSpan, quantity::OrePerKilowattHour};

/// Validated day-ahead price vector: one rate per hour of a single day.
///
/// Immutable after construction; everything downstream derives from it.
pub struct PriceSeries([OrePerKilowattHour; 24]);

#[derive(Debug, Eq, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SeriesError {
    #[display("expected 24 hourly rates, got {n_entries}")]
    MissingHours { n_entries: usize },

    #[display("hour {hour} appears more than once")]
    DuplicateHour { hour: u32 },

    #[display("hour index {hour} is outside the day")]
    UnknownHour { hour: u32 },

    #[display("negative rate {rate} at hour {hour}")]
    NegativeRate { hour: u32, rate: OrePerKilowattHour },
}

impl PriceSeries {
    /// Build the series from `(hour, rate)` entries, in any order.
    ///
    /// Fails fast on a short day, a repeated or out-of-range hour index, or
    /// a negative rate. No scheduling happens on a rejected series.
    pub fn try_from_hourly(
        entries: impl IntoIterator<Item = (u32, OrePerKilowattHour)>,
    ) -> Result<Self, SeriesError> {
        let mut rates = [None; 24];
        let mut n_entries = 0_usize;
        for (hour, rate) in entries {
            let slot =
                rates.get_mut(hour as usize).ok_or(SeriesError::UnknownHour { hour })?;
            if slot.is_some() {
                return Err(SeriesError::DuplicateHour { hour });
            }
            if rate < OrePerKilowattHour::ZERO {
                return Err(SeriesError::NegativeRate { hour, rate });
            }
            *slot = Some(rate);
            n_entries += 1;
        }
        if n_entries < rates.len() {
            return Err(SeriesError::MissingHours { n_entries });
        }
        Ok(Self(rates.map(|rate| rate.unwrap_or(OrePerKilowattHour::ZERO))))
    }

    /// Arithmetic mean over the covered hours.
    pub fn average(&self, span: HourSpan) -> OrePerKilowattHour {
        let total: OrePerKilowattHour = self.0[span.hours()].iter().copied().sum();
        OrePerKilowattHour(total.0 / f64::from(span.duration_hours()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, OrePerKilowattHour)> {
        self.0.into_iter().enumerate()
    }
}

#[cfg(test)]
pub(crate) fn series_of(rates: [f64; 24]) -> PriceSeries {
    PriceSeries::try_from_hourly(
        rates.into_iter().enumerate().map(|(hour, rate)| (hour as u32, rate.into())),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_try_from_hourly_ok() {
        let series = series_of([10.0; 24]);
        let entries: Vec<_> = series.iter().collect();
        assert_eq!(entries.len(), 24);
        assert_eq!(entries[0], (0, OrePerKilowattHour::from(10.0)));
        assert_eq!(entries[23], (23, OrePerKilowattHour::from(10.0)));
    }

    #[test]
    fn test_short_day_is_rejected() {
        let result =
            PriceSeries::try_from_hourly((0..23).map(|hour| (hour, 10.0.into())));
        assert_eq!(result.err(), Some(SeriesError::MissingHours { n_entries: 23 }));
    }

    #[test]
    fn test_duplicate_hour_is_rejected() {
        let result = PriceSeries::try_from_hourly(
            (0..23).map(|hour| (hour, 10.0.into())).chain([(22, 10.0.into())]),
        );
        assert_eq!(result.err(), Some(SeriesError::DuplicateHour { hour: 22 }));
    }

    #[test]
    fn test_unknown_hour_is_rejected() {
        let result =
            PriceSeries::try_from_hourly((1..25).map(|hour| (hour, 10.0.into())));
        assert_eq!(result.err(), Some(SeriesError::UnknownHour { hour: 24 }));
    }

    #[test]
    fn test_negative_rate_is_rejected() {
        let result = PriceSeries::try_from_hourly((0..24).map(|hour| {
            let rate = if hour == 3 { -1.0 } else { 10.0 };
            (hour, rate.into())
        }));
        assert!(matches!(result.err(), Some(SeriesError::NegativeRate { hour: 3, .. })));
    }

    #[test]
    fn test_average() {
        let mut rates = [10.0; 24];
        rates[2] = 20.0;
        rates[3] = 40.0;
        let series = series_of(rates);
        assert_abs_diff_eq!(series.average(HourSpan::new(2, 4)).0.0, 30.0);
        assert_abs_diff_eq!(series.average(HourSpan::new(2, 5)).0.0, 70.0 / 3.0);
    }
}
