use crate::{
    core::{block::ChargeBlock, planner::Pair, span::HourSpan},
    quantity::OrePerKilowattHour,
};

/// One structured planning decision.
///
/// The planner only ever emits these as data; turning them into text is the
/// logbook's (or the table renderer's) job.
#[derive(Copy, Clone, Debug)]
pub enum TraceEvent {
    /// A candidate block, with the number of discharge windows that existed
    /// downstream of it before anything was committed.
    BlockDiscovered { block: ChargeBlock, n_windows: usize },

    BlockRejected { block: ChargeBlock, reason: Rejection },

    PairCommitted { pair: Pair },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum Rejection {
    /// No discharge window exists after the block.
    #[display("no feasible discharge window")]
    NoFeasibleWindow,

    /// The best reachable pair did not strictly exceed the margin.
    #[display("below margin (best {best_profit})")]
    BelowMargin { best_profit: OrePerKilowattHour },

    /// The block intersects an interval that was already committed.
    #[display("overlaps a committed interval")]
    OverlapsCommitted,
}

/// Where the planner appends its decisions.
pub trait TraceSink {
    fn append(&mut self, event: TraceEvent);
}

/// Collecting sink; the one record a run keeps.
#[derive(Default)]
pub struct DecisionTrace {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for DecisionTrace {
    fn append(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Discards everything, for callers that only want the pairs.
impl TraceSink for () {
    fn append(&mut self, _event: TraceEvent) {}
}

impl DecisionTrace {
    pub fn discovered(&self) -> impl Iterator<Item = (&ChargeBlock, usize)> {
        self.events.iter().filter_map(|event| match event {
            TraceEvent::BlockDiscovered { block, n_windows } => Some((block, *n_windows)),
            _ => None,
        })
    }

    pub fn pairs(&self) -> impl Iterator<Item = &Pair> {
        self.events.iter().filter_map(|event| match event {
            TraceEvent::PairCommitted { pair } => Some(pair),
            _ => None,
        })
    }

    pub fn rejection_of(&self, span: HourSpan) -> Option<Rejection> {
        self.events.iter().find_map(|event| match event {
            TraceEvent::BlockRejected { block, reason } if block.span == span => Some(*reason),
            _ => None,
        })
    }

    pub fn is_committed(&self, span: HourSpan) -> bool {
        self.pairs().any(|pair| pair.charge.span == span)
    }
}
