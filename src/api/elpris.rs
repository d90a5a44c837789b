//! [elprisetjustnu.se](https://www.elprisetjustnu.se/elpris-api) day-ahead price client.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use serde::Deserialize;
use ureq::Agent;

use crate::{prelude::*, quantity::OrePerKilowattHour};

/// Swedish bidding zone.
#[derive(Copy, Clone, Debug, clap::ValueEnum, derive_more::Display)]
pub enum Zone {
    /// Luleå.
    #[display("SE1")]
    Se1,

    /// Sundsvall.
    #[display("SE2")]
    Se2,

    /// Stockholm.
    #[display("SE3")]
    Se3,

    /// Malmö.
    #[display("SE4")]
    Se4,
}

pub struct Api {
    client: Agent,
}

impl Api {
    pub fn new() -> Self {
        let client =
            Agent::config_builder().timeout_global(Some(Duration::from_secs(10))).build().into();
        Self { client }
    }

    /// Fetch the day's spot quotes as `(hour, öre/kWh)` entries.
    ///
    /// Fees and VAT are not applied here; the tariff model stacks them.
    #[instrument(fields(on = %on, zone = %zone), skip_all)]
    pub fn get_day_ahead(
        &self,
        on: NaiveDate,
        zone: Zone,
    ) -> Result<Vec<(u32, OrePerKilowattHour)>> {
        info!("fetching…");
        let url = format!(
            "https://www.elprisetjustnu.se/api/v1/prices/{}/{}_{zone}.json",
            on.format("%Y"),
            on.format("%m-%d"),
        );
        let quotes = self
            .client
            .get(&url)
            .call()
            .context("failed to fetch the prices")?
            .body_mut()
            .read_json::<Vec<HourlyQuote>>()
            .context("failed to deserialize the prices")?;
        Ok(quotes.into_iter().map(HourlyQuote::into_hourly_rate).collect())
    }
}

#[derive(Deserialize)]
struct HourlyQuote {
    #[serde(rename = "SEK_per_kWh")]
    sek_per_kilowatt_hour: f64,

    /// Start of the delivery hour, in the zone's local offset.
    time_start: DateTime<FixedOffset>,
}

impl HourlyQuote {
    fn into_hourly_rate(self) -> (u32, OrePerKilowattHour) {
        (self.time_start.hour(), OrePerKilowattHour::from_sek(self.sek_per_kilowatt_hour))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_deserialize_quote() {
        let quote: HourlyQuote = serde_json::from_str(
            r#"{
                "SEK_per_kWh": 0.26673,
                "EUR_per_kWh": 0.02328,
                "EXR": 11.457573,
                "time_start": "2025-01-06T14:00:00+01:00",
                "time_end": "2025-01-06T15:00:00+01:00"
            }"#,
        )
        .unwrap();
        let (hour, rate) = quote.into_hourly_rate();
        assert_eq!(hour, 14);
        assert_abs_diff_eq!(rate.0.0, 26.673, epsilon = 1e-9);
    }

    #[test]
    #[ignore = "makes the API request"]
    fn test_get_day_ahead_ok() -> Result {
        let entries =
            Api::new().get_day_ahead(chrono::Local::now().date_naive(), Zone::Se3)?;
        assert_eq!(entries.len(), 24);
        assert!(entries.iter().all(|(hour, _)| *hour < 24));
        Ok(())
    }
}
