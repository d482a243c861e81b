//! Deterministic greedy rules.
//!
//! Each iteration scores every useful button by a fixed formula over the
//! remaining needs and presses the top scorer. Dead ends are escaped by
//! retracting a random earlier press, and the retracted button is skipped on
//! the very next selection so the run cannot fall straight back into the same
//! dead end. The generator is seeded, so runs are reproducible.

use switchyard_types::{CounterSystem, JoltStatus};

use super::scoring::{argmax, is_useful, penalty};
use super::{FailureReason, SearchContext, StrategyOutcome};
use crate::config::ScoreWeights;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreedyRule {
    /// Total need covered by the button.
    Efficiency,
    /// Smallest need among touched counters, times the number touched.
    Bottleneck,
    /// Need weighted by the fraction of each counter's target still missing.
    Ratio,
    /// Only buttons touching the counter with the largest need; efficiency
    /// among those.
    LargestFirst,
}

impl GreedyRule {
    pub const ALL: [GreedyRule; 4] = [
        GreedyRule::Efficiency,
        GreedyRule::Bottleneck,
        GreedyRule::Ratio,
        GreedyRule::LargestFirst,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Efficiency => "efficiency",
            Self::Bottleneck => "bottleneck",
            Self::Ratio => "ratio",
            Self::LargestFirst => "largest-first",
        }
    }

    /// Score of pressing `button`, which must be useful under `needs`.
    pub(crate) fn score(
        self,
        system: &CounterSystem,
        needs: &[i64],
        button: usize,
        weights: &ScoreWeights,
    ) -> f64 {
        let touched = system.buttons()[button].indices();
        let raw = match self {
            Self::Efficiency | Self::LargestFirst => {
                touched.iter().map(|&c| needs[c] as f64).sum()
            }
            Self::Bottleneck => {
                let tightest = touched.iter().map(|&c| needs[c]).min().unwrap_or(0);
                (tightest as f64) * touched.len() as f64
            }
            Self::Ratio => touched
                .iter()
                .map(|&c| {
                    let need = needs[c] as f64;
                    let fraction = need / f64::from(system.targets()[c]);
                    need * fraction.powf(weights.ratio_exponent)
                })
                .sum(),
        };
        raw - penalty(system, needs, button, weights)
    }

    /// The button this rule presses next, or `None` at a dead end. `banned`
    /// is excluded from the candidates.
    pub(crate) fn select(
        self,
        system: &CounterSystem,
        needs: &[i64],
        weights: &ScoreWeights,
        banned: Option<usize>,
    ) -> Option<usize> {
        let focus = match self {
            Self::LargestFirst => Some(
                needs
                    .iter()
                    .enumerate()
                    .max_by_key(|&(c, &need)| (need, std::cmp::Reverse(c)))
                    .map(|(c, _)| c)?,
            ),
            _ => None,
        };

        let candidates: Vec<usize> = system
            .buttons()
            .iter()
            .enumerate()
            .filter(|&(i, _)| banned != Some(i))
            .filter(|(_, b)| is_useful(b, needs))
            .filter(|(_, b)| focus.is_none_or(|c| b.touches(c)))
            .map(|(i, _)| i)
            .collect();
        let scores: Vec<f64> = candidates
            .iter()
            .map(|&b| self.score(system, needs, b, weights))
            .collect();
        argmax(&scores).map(|i| candidates[i])
    }
}

pub(crate) fn run(
    template: &CounterSystem,
    rule: GreedyRule,
    ctx: &mut SearchContext<'_>,
) -> StrategyOutcome {
    let config = ctx.config;
    let mut system = template.clone();
    system.reset();
    let cap = config.greedy.iteration_cap(system.target_total());
    let mut banned = None;

    for _ in 0..cap {
        match system.check() {
            JoltStatus::Equal => return StrategyOutcome::Solved(system.presses().to_vec()),
            JoltStatus::TooHigh => {
                banned = Some(system.unpress(&mut ctx.rng));
            }
            JoltStatus::TooLow => {
                if ctx.cannot_improve(system.press_count()) {
                    return StrategyOutcome::Failed(FailureReason::ExceededBest);
                }
                let needs = system.needs();
                let choice = match banned.take() {
                    Some(button) => rule
                        .select(&system, &needs, &config.weights, Some(button))
                        .or_else(|| rule.select(&system, &needs, &config.weights, None)),
                    None => rule.select(&system, &needs, &config.weights, None),
                };
                match choice {
                    Some(button) => system.press_button(button),
                    None if system.presses().is_empty() => {
                        return StrategyOutcome::Failed(FailureReason::NoUsefulButton);
                    }
                    None => {
                        banned = Some(system.unpress(&mut ctx.rng));
                    }
                }
            }
        }
    }

    StrategyOutcome::Failed(FailureReason::IterationCap)
}
