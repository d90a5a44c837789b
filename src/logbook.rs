use std::{fs::OpenOptions, io::Write, path::PathBuf};

use chrono::{DateTime, Local, NaiveDate};

use crate::{
    api::elpris::Zone,
    core::{schedule::Schedule, trace::DecisionTrace},
    prelude::*,
};

/// The append-only, human-readable record of every run's decisions.
pub struct Logbook(PathBuf);

impl Logbook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn append(&self, record: &RunRecord<'_>) -> Result {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.0)
            .with_context(|| format!("failed to open the logbook at `{}`", self.0.display()))?;
        file.write_all(record.render().as_bytes())
            .with_context(|| format!("failed to append to the logbook at `{}`", self.0.display()))
    }
}

/// Everything one run decided, ready to be rendered as text.
///
/// The planner hands over structured events only; this is the single place
/// they become formatted lines.
pub struct RunRecord<'a> {
    pub started_at: DateTime<Local>,
    pub date: NaiveDate,
    pub zone: Zone,
    pub decision_trace: &'a DecisionTrace,
    pub schedule: &'a Schedule,
    pub code: &'a str,
}

impl RunRecord<'_> {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "=== {} plan for {} ({}) ===",
            self.started_at.format("%Y-%m-%d %H:%M:%S"),
            self.date,
            self.zone,
        )];

        lines.push("charge blocks:".to_string());
        for (block, n_windows) in self.decision_trace.discovered() {
            let outcome = if self.decision_trace.is_committed(block.span) {
                "committed".to_string()
            } else {
                match self.decision_trace.rejection_of(block.span) {
                    Some(rejection) => rejection.to_string(),
                    None => "not evaluated".to_string(),
                }
            };
            lines.push(format!(
                "  {} avg {}, {} windows downstream: {}",
                block.span, block.average_rate, n_windows, outcome,
            ));
        }

        lines.push("pairs:".to_string());
        let mut any_pair = false;
        for pair in self.decision_trace.pairs() {
            any_pair = true;
            lines.push(format!(
                "  charge {} (avg {}) -> discharge {} (avg {}), net {}",
                pair.charge.span,
                pair.charge.average_rate,
                pair.discharge.span,
                pair.discharge.average_rate,
                pair.net_profit,
            ));
        }
        if !any_pair {
            lines.push("  (none: no pair strictly beats the margin)".to_string());
        }

        lines.push("schedule:".to_string());
        if self.schedule.is_empty() {
            lines.push("  (empty)".to_string());
        }
        for line in self.schedule.render_lines(self.code) {
            lines.push(format!("  {line}"));
        }

        lines.push(String::new());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        planner::Planner,
        series::series_of,
        tariff::test_tariff,
    };

    #[test]
    fn test_append_accumulates_runs() -> Result {
        let mut rates = [40.0; 24];
        rates[0] = 150.0;
        rates[1] = 150.0;
        for hour in 2..5 {
            rates[hour] = 10.0;
        }
        for hour in 18..22 {
            rates[hour] = 80.0;
        }
        let series = series_of(rates);
        let tariff = test_tariff();
        let mut decision_trace = DecisionTrace::default();
        let pairs =
            Planner::builder().series(&series).tariff(&tariff).solve(&mut decision_trace);
        let schedule = Schedule::from_pairs(&pairs);
        let record = RunRecord {
            started_at: Local::now(),
            date: NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
            zone: Zone::Se3,
            decision_trace: &decision_trace,
            schedule: &schedule,
            code: "1234567",
        };

        let path = std::env::temp_dir()
            .join(format!("magpie-logbook-test-{}.log", std::process::id()));
        let logbook = Logbook::new(&path);
        logbook.append(&record)?;
        logbook.append(&record)?;

        let contents = std::fs::read_to_string(&path)?;
        std::fs::remove_file(&path)?;
        assert_eq!(contents.matches("=== ").count(), 2);
        assert_eq!(contents.matches("charge blocks:").count(), 2);
        assert!(contents.contains("02:00-05:00/1234567/+"));
        assert!(contents.contains("18:00-22:00/1234567/-"));
        Ok(())
    }

    #[test]
    fn test_empty_schedule_is_a_decision_not_a_failure() {
        let schedule = Schedule::from_pairs(&[]);
        let decision_trace = DecisionTrace::default();
        let record = RunRecord {
            started_at: Local::now(),
            date: NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
            zone: Zone::Se3,
            decision_trace: &decision_trace,
            schedule: &schedule,
            code: "1234567",
        };
        let rendered = record.render();
        assert!(rendered.contains("(none: no pair strictly beats the margin)"));
        assert!(rendered.contains("(empty)"));
    }
}
