//! Counter-target optimization.
//!
//! [`TargetOptimizer::solve`] runs the strategy catalog in escalating passes
//! and keeps the fewest presses any strategy found:
//!
//! 1. every deterministic greedy rule;
//! 2. if still unsolved (or `refine` is set), the randomized rules in rounds
//!    with a growing attempt budget;
//! 3. if still unsolved, an intensive pass of every randomized rule with a
//!    large budget, then iterative deepening.

use std::fmt;

use switchyard_types::CounterSystem;

use crate::config::SolverConfig;
use crate::strategy::{
    FailureReason, GreedyRule, RandomizedRule, SearchContext, Strategy, StrategyOutcome,
};

/// A replayable solution and the strategy that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Button indices in press order.
    pub presses: Vec<usize>,
    pub strategy: Strategy,
}

impl Solution {
    #[must_use]
    pub fn count(&self) -> usize {
        self.presses.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterOutcome {
    Solved(Solution),
    /// No strategy succeeded. Carries the reason reported by the last
    /// strategy that ran.
    Unsolved(FailureReason),
}

impl CounterOutcome {
    #[must_use]
    pub fn presses(&self) -> Option<usize> {
        match self {
            Self::Solved(solution) => Some(solution.count()),
            Self::Unsolved(_) => None,
        }
    }
}

impl fmt::Display for CounterOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solved(solution) => {
                write!(f, "{} presses ({})", solution.count(), solution.strategy)
            }
            Self::Unsolved(reason) => write!(f, "unsolved ({reason})"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TargetOptimizer {
    config: SolverConfig,
}

impl TargetOptimizer {
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Fewest presses found for `system`. The system is only read; every
    /// attempt works on its own clone.
    pub fn solve(&self, system: &CounterSystem) -> CounterOutcome {
        if let Some(counter) = uncovered_counter(system) {
            tracing::warn!(counter, "counter has a target but no button touches it");
            return CounterOutcome::Unsolved(FailureReason::Infeasible);
        }

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut ctx = SearchContext::new(&self.config, seed);
        let mut race = Race::default();

        for rule in GreedyRule::ALL {
            race.run(Strategy::Greedy(rule), system, &mut ctx);
        }

        let settings = &self.config.randomized;
        if race.best.is_none() || self.config.refine {
            let mut attempts = settings.attempts.max(1);
            for round in 0..settings.escalation_rounds.max(1) {
                tracing::info!(round, attempts, "escalating to randomized strategies");
                for rule in RandomizedRule::ALL {
                    race.run(Strategy::Randomized { rule, attempts }, system, &mut ctx);
                }
                if race.best.is_some() && !self.config.refine {
                    break;
                }
                attempts = attempts.saturating_mul(settings.escalation_factor.max(1));
            }
        }

        if race.best.is_none() {
            tracing::info!(
                attempts = settings.intensive_attempts,
                "escalating to intensive pass"
            );
            for rule in RandomizedRule::ALL {
                let attempts = settings.intensive_attempts.max(1);
                race.run(Strategy::Randomized { rule, attempts }, system, &mut ctx);
            }
            let total = usize::try_from(system.target_total()).unwrap_or(usize::MAX);
            let max_depth = self.config.deepening.max_depth.min(total);
            race.run(Strategy::Deepening { max_depth }, system, &mut ctx);
        }

        match race.best {
            Some(solution) => {
                tracing::debug!(
                    presses = solution.count(),
                    strategy = %solution.strategy,
                    seed,
                    "counter system solved"
                );
                CounterOutcome::Solved(solution)
            }
            None => CounterOutcome::Unsolved(race.failure.unwrap_or(FailureReason::IterationCap)),
        }
    }
}

/// Best solution over every strategy run so far.
#[derive(Default)]
struct Race {
    best: Option<Solution>,
    failure: Option<FailureReason>,
}

impl Race {
    fn run(&mut self, strategy: Strategy, system: &CounterSystem, ctx: &mut SearchContext<'_>) {
        match strategy.run(system, ctx) {
            StrategyOutcome::Solved(presses) => {
                tracing::debug!(%strategy, presses = presses.len(), "strategy solved");
                ctx.record(presses.len());
                if self.best.as_ref().is_none_or(|b| presses.len() < b.count()) {
                    self.best = Some(Solution { presses, strategy });
                }
            }
            StrategyOutcome::Failed(reason) => {
                tracing::debug!(%strategy, %reason, "strategy failed");
                self.failure = Some(reason);
            }
        }
    }
}

/// First counter with a positive target that no button touches.
fn uncovered_counter(system: &CounterSystem) -> Option<usize> {
    system
        .targets()
        .iter()
        .enumerate()
        .find(|&(c, &target)| target > 0 && !system.buttons().iter().any(|b| b.touches(c)))
        .map(|(c, _)| c)
}
