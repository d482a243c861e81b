//! Randomized greedy rules.
//!
//! Same score-then-press loop as the deterministic rules, using the
//! efficiency score, but the choice among candidates is probabilistic. A rule
//! is repeated for a number of attempts and the shortest successful run is
//! kept. Attempts stop as soon as they can no longer beat the best count
//! known to the solve.

use rand::prelude::*;
use switchyard_types::{CounterSystem, JoltStatus};

use super::greedy::GreedyRule;
use super::scoring::{argmax, useful_buttons};
use super::{FailureReason, SearchContext, StrategyOutcome};
use crate::config::SolverConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomizedRule {
    /// Pick with probability proportional to the (shifted) score.
    WeightedRandom,
    /// Add uniform noise to every score, then take the best.
    Noisy,
    /// Usually the best; with probability epsilon any non-empty button, even
    /// one that overshoots.
    EpsilonGreedy,
    /// Best score, but periodically retract several presses at a dead end.
    Backtracking,
    /// Boltzmann selection over scores with a cooling temperature.
    Annealing,
    /// Epsilon-greedy that starts over from a short random prefix when a run
    /// stalls.
    Restart,
}

impl RandomizedRule {
    pub const ALL: [RandomizedRule; 6] = [
        RandomizedRule::WeightedRandom,
        RandomizedRule::Noisy,
        RandomizedRule::EpsilonGreedy,
        RandomizedRule::Backtracking,
        RandomizedRule::Annealing,
        RandomizedRule::Restart,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WeightedRandom => "weighted",
            Self::Noisy => "noisy",
            Self::EpsilonGreedy => "epsilon",
            Self::Backtracking => "backtracking",
            Self::Annealing => "annealing",
            Self::Restart => "restart",
        }
    }

    fn pick(
        self,
        system: &CounterSystem,
        needs: &[i64],
        useful: &[usize],
        temperature: &mut f64,
        config: &SolverConfig,
        rng: &mut StdRng,
    ) -> usize {
        let settings = &config.randomized;
        let scores: Vec<f64> = useful
            .iter()
            .map(|&b| GreedyRule::Efficiency.score(system, needs, b, &config.weights))
            .collect();
        let top = argmax(&scores).unwrap_or(0);
        let greedy = useful[top];

        match self {
            Self::WeightedRandom => {
                let floor = scores.iter().copied().fold(f64::INFINITY, f64::min);
                weighted(useful, &scores, |s| s - floor + 1.0, rng).unwrap_or(greedy)
            }
            Self::Noisy => {
                let scale = settings.noise * scores[top].abs().max(1.0);
                let noisy: Vec<f64> = scores
                    .iter()
                    .map(|s| s + rng.random::<f64>() * scale)
                    .collect();
                argmax(&noisy).map_or(greedy, |i| useful[i])
            }
            Self::EpsilonGreedy => {
                if rng.random_bool(settings.epsilon.clamp(0.0, 1.0)) {
                    let pressable: Vec<usize> = system
                        .buttons()
                        .iter()
                        .enumerate()
                        .filter(|(_, b)| !b.is_empty())
                        .map(|(i, _)| i)
                        .collect();
                    pressable.choose(rng).copied().unwrap_or(greedy)
                } else {
                    greedy
                }
            }
            Self::Restart => {
                if rng.random_bool(settings.epsilon.clamp(0.0, 1.0)) {
                    useful.choose(rng).copied().unwrap_or(greedy)
                } else {
                    greedy
                }
            }
            Self::Backtracking => greedy,
            Self::Annealing => {
                let t = *temperature;
                *temperature = (t * settings.cooling).max(settings.min_temperature);
                let best = scores[top];
                weighted(useful, &scores, |s| ((s - best) / t).exp(), rng).unwrap_or(greedy)
            }
        }
    }
}

/// Sample one of `items` with weight `weight(score)`. `None` when the weights
/// are unusable (all zero or not finite).
fn weighted(
    items: &[usize],
    scores: &[f64],
    weight: impl Fn(f64) -> f64,
    rng: &mut StdRng,
) -> Option<usize> {
    let pairs: Vec<(usize, f64)> = items
        .iter()
        .zip(scores)
        .map(|(&item, &score)| (item, weight(score)))
        .collect();
    pairs
        .choose_weighted(rng, |&(_, w)| w)
        .ok()
        .map(|&(item, _)| item)
}

pub(crate) fn run(
    template: &CounterSystem,
    rule: RandomizedRule,
    attempts: u32,
    ctx: &mut SearchContext<'_>,
) -> StrategyOutcome {
    let mut best: Option<Vec<usize>> = None;
    let mut last_failure = FailureReason::IterationCap;

    for attempt in 0..attempts.max(1) {
        match attempt_once(template, rule, ctx) {
            StrategyOutcome::Solved(presses) => {
                if best.as_ref().is_none_or(|b| presses.len() < b.len()) {
                    tracing::trace!(
                        rule = rule.as_str(),
                        attempt,
                        presses = presses.len(),
                        "attempt improved"
                    );
                    ctx.record(presses.len());
                    best = Some(presses);
                }
            }
            StrategyOutcome::Failed(FailureReason::NoUsefulButton) => {
                // Nothing is pressable from zero; later attempts start from
                // the same place.
                last_failure = FailureReason::NoUsefulButton;
                break;
            }
            StrategyOutcome::Failed(reason) => last_failure = reason,
        }
    }

    best.map_or(StrategyOutcome::Failed(last_failure), StrategyOutcome::Solved)
}

/// Iterations since the remaining need last reached a new low.
#[derive(Debug)]
struct Stall {
    lowest: u64,
    idle: u64,
}

impl Stall {
    fn new() -> Self {
        Self {
            lowest: u64::MAX,
            idle: 0,
        }
    }

    /// Record the remaining need after one iteration and return how many
    /// iterations in a row have failed to lower it.
    fn observe(&mut self, remaining: u64) -> u64 {
        if remaining < self.lowest {
            self.lowest = remaining;
            self.idle = 0;
        } else {
            self.idle += 1;
        }
        self.idle
    }
}

fn remaining_need(needs: &[i64]) -> u64 {
    needs.iter().map(|&n| n.max(0).unsigned_abs()).sum()
}

/// Retract presses after the `dead_ends`-th dead end. The backtracking rule
/// takes back `backtrack_depth` presses every `backtrack_period` dead ends;
/// everything else takes back one. Returns the number retracted.
fn retreat(
    system: &mut CounterSystem,
    rule: RandomizedRule,
    dead_ends: u32,
    config: &SolverConfig,
    rng: &mut StdRng,
) -> u32 {
    let settings = &config.randomized;
    let depth = if rule == RandomizedRule::Backtracking
        && dead_ends % settings.backtrack_period.max(1) == 0
    {
        settings.backtrack_depth.max(1)
    } else {
        1
    };
    let mut retracted = 0;
    while retracted < depth && !system.presses().is_empty() {
        system.unpress(rng);
        retracted += 1;
    }
    retracted
}

/// Zero the system and make up to `prefix` random useful presses.
fn restart(system: &mut CounterSystem, prefix: u32, rng: &mut StdRng) {
    system.reset();
    for _ in 0..prefix {
        let useful = useful_buttons(system, &system.needs());
        match useful.choose(rng) {
            Some(&button) => system.press_button(button),
            None => break,
        }
    }
}

fn attempt_once(
    template: &CounterSystem,
    rule: RandomizedRule,
    ctx: &mut SearchContext<'_>,
) -> StrategyOutcome {
    let config = ctx.config;
    let settings = &config.randomized;
    let mut system = template.clone();
    system.reset();
    let cap = config.greedy.iteration_cap(system.target_total());

    let mut temperature = settings.initial_temperature.max(f64::MIN_POSITIVE);
    let mut dead_ends = 0u32;
    let mut stall = Stall::new();

    for _ in 0..cap {
        match system.check() {
            JoltStatus::Equal => return StrategyOutcome::Solved(system.presses().to_vec()),
            JoltStatus::TooHigh => {
                system.unpress(&mut ctx.rng);
                continue;
            }
            JoltStatus::TooLow => {}
        }
        if ctx.cannot_improve(system.press_count()) {
            return StrategyOutcome::Failed(FailureReason::ExceededBest);
        }

        let needs = system.needs();
        let remaining = remaining_need(&needs);
        let idle = stall.observe(remaining);
        if rule == RandomizedRule::Restart && idle >= settings.restart_window.max(1) {
            tracing::trace!(idle, remaining, "restarting attempt");
            restart(&mut system, settings.restart_prefix, &mut ctx.rng);
            stall = Stall::new();
            continue;
        }

        let useful = useful_buttons(&system, &needs);
        if useful.is_empty() {
            if system.presses().is_empty() {
                return StrategyOutcome::Failed(FailureReason::NoUsefulButton);
            }
            dead_ends += 1;
            retreat(&mut system, rule, dead_ends, config, &mut ctx.rng);
            continue;
        }

        let button = rule.pick(
            &system,
            &needs,
            &useful,
            &mut temperature,
            config,
            &mut ctx.rng,
        );
        system.press_button(button);
    }

    StrategyOutcome::Failed(FailureReason::IterationCap)
}
