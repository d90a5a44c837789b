use crate::{core::planner::Pair, core::span::HourSpan, prelude::*};

#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum Action {
    #[display("+")]
    Charge,

    #[display("-")]
    Discharge,
}

/// One contiguous run of hours doing a single thing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Segment {
    pub span: HourSpan,
    pub action: Action,
}

impl Segment {
    pub fn render(&self, code: &str) -> String {
        format!("{}/{code}/{}", self.span, self.action)
    }
}

#[cfg(test)]
impl Segment {
    /// Parse a rendered line back into its segment, ignoring the slot code.
    pub fn parse_line(line: &str) -> Result<Self> {
        let (times, rest) = line.split_once('/').context("expected a slot code")?;
        let (_code, action) = rest.rsplit_once('/').context("expected an action")?;
        let (start, end) = times.split_once('-').context("expected a time range")?;

        let start = parse_boundary(start)?;
        let end = parse_boundary(end)?;
        ensure!(start < end && end <= 24, "invalid hour range {start}..{end}");

        let action = match action {
            "+" => Action::Charge,
            "-" => Action::Discharge,
            other => bail!("unknown action {other:?}"),
        };
        Ok(Self { span: HourSpan::new(start, end), action })
    }
}

/// The final plan: ordered, disjoint segments covering part of the day.
#[derive(Debug, Eq, PartialEq)]
pub struct Schedule {
    pub segments: Vec<Segment>,
}

impl Schedule {
    /// Merge the committed pairs into ordered segments.
    ///
    /// Segments touching at a boundary with the same action collapse into
    /// one, so back-to-back cycles render as single lines per direction.
    pub fn from_pairs(pairs: &[Pair]) -> Self {
        let mut segments: Vec<Segment> = pairs
            .iter()
            .flat_map(|pair| {
                [
                    Segment { span: pair.charge.span, action: Action::Charge },
                    Segment { span: pair.discharge.span, action: Action::Discharge },
                ]
            })
            .collect();
        segments.sort_by_key(|segment| segment.span);

        let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
        for segment in segments {
            match merged.last_mut() {
                Some(last)
                    if last.action == segment.action
                        && last.span.end == segment.span.start =>
                {
                    last.span.end = segment.span.end;
                }
                _ => merged.push(segment),
            }
        }
        Self { segments: merged }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// One line per segment, chronological.
    pub fn render_lines(&self, code: &str) -> Vec<String> {
        self.segments.iter().map(|segment| segment.render(code)).collect()
    }
}

/// A wall-clock boundary label; `23:59` stands in for the end of the day.
#[cfg(test)]
fn parse_boundary(label: &str) -> Result<u8> {
    if label == "23:59" {
        return Ok(24);
    }
    let (hour, minute) = label.split_once(':').context("expected HH:MM")?;
    ensure!(minute == "00", "unexpected minute in {label:?}");
    let hour: u8 = hour.parse().context("bad hour")?;
    ensure!(hour < 24, "hour {hour} is outside the day");
    Ok(hour)
}
