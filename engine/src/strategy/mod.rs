//! Counter-target strategies.
//!
//! Exact search over counter systems blows up with the number of counters and
//! buttons, so the optimizer races a fixed catalog of heuristics and keeps the
//! fewest presses any of them finds:
//!
//! ```text
//! Strategy
//! ├── Greedy(GreedyRule)          deterministic score-then-press
//! ├── Randomized { rule, .. }     probabilistic selection, repeated attempts
//! └── Deepening { max_depth }     depth-bounded exhaustive fallback
//! ```
//!
//! Every attempt works on its own clone of the system, so attempts never see
//! each other's counters or press history.

mod deepening;
mod greedy;
mod randomized;
mod scoring;

use std::fmt;

use rand::prelude::*;
use switchyard_types::CounterSystem;

use crate::config::SolverConfig;

pub use greedy::GreedyRule;
pub use randomized::RandomizedRule;

/// One entry of the strategy catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Greedy(GreedyRule),
    /// Repeats `rule` up to `attempts` times and keeps the best run.
    Randomized { rule: RandomizedRule, attempts: u32 },
    /// Iterative deepening up to `max_depth` presses.
    Deepening { max_depth: usize },
}

impl Strategy {
    /// Attempt a solve of `system`. The system itself is never mutated.
    pub fn run(self, system: &CounterSystem, ctx: &mut SearchContext<'_>) -> StrategyOutcome {
        match self {
            Strategy::Greedy(rule) => greedy::run(system, rule, ctx),
            Strategy::Randomized { rule, attempts } => {
                randomized::run(system, rule, attempts, ctx)
            }
            Strategy::Deepening { max_depth } => deepening::run(system, max_depth, ctx),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Greedy(rule) => write!(f, "greedy/{}", rule.as_str()),
            Strategy::Randomized { rule, attempts } => {
                write!(f, "randomized/{} x{attempts}", rule.as_str())
            }
            Strategy::Deepening { max_depth } => write!(f, "deepening<={max_depth}"),
        }
    }
}

/// What a single strategy produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    /// Button indices in press order; replaying them from zero reaches the
    /// targets exactly.
    Solved(Vec<usize>),
    Failed(FailureReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Nothing could be pressed from the starting state.
    NoUsefulButton,
    IterationCap,
    /// Every run was abandoned once it could no longer beat the best known
    /// count.
    ExceededBest,
    /// At least one depth ran out of time and no deeper level succeeded.
    DeadlineExpired,
    /// Every depth up to the bound was searched without a match.
    DepthExhausted,
    /// Some counter with a positive target is touched by no button.
    Infeasible,
}

impl FailureReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoUsefulButton => "no useful button",
            Self::IterationCap => "iteration cap reached",
            Self::ExceededBest => "could not beat best known count",
            Self::DeadlineExpired => "deadline expired",
            Self::DepthExhausted => "depth bound exhausted",
            Self::Infeasible => "infeasible",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State shared by the strategies of one solve: the configuration, the
/// random source, and the best press count found so far.
pub struct SearchContext<'a> {
    pub config: &'a SolverConfig,
    pub rng: StdRng,
    best: Option<usize>,
}

impl<'a> SearchContext<'a> {
    #[must_use]
    pub fn new(config: &'a SolverConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            best: None,
        }
    }

    /// Fewest presses of any solution recorded so far.
    #[must_use]
    pub fn best(&self) -> Option<usize> {
        self.best
    }

    pub fn record(&mut self, presses: usize) {
        if self.best.is_none_or(|best| presses < best) {
            self.best = Some(presses);
        }
    }

    /// Whether a run that already made `presses` presses and still needs at
    /// least one more can no longer beat the best count.
    #[must_use]
    pub fn cannot_improve(&self, presses: usize) -> bool {
        self.best.is_some_and(|best| presses >= best)
    }
}
