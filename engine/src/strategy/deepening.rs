//! Depth-bounded exhaustive search.
//!
//! Press order never changes the counters, so only multisets of buttons are
//! enumerated, in non-decreasing button order. Depths are tried shallowest
//! first, which makes the first match a minimum. Each depth gets its own
//! deadline; a depth that runs out of time is skipped and the search moves
//! on, so a result found after a timeout is not proven minimal.

use std::time::Instant;

use switchyard_types::{Button, CounterSystem};

use super::{FailureReason, SearchContext, StrategyOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Found,
    Exhausted,
    Expired,
}

pub(crate) fn run(
    template: &CounterSystem,
    max_depth: usize,
    ctx: &mut SearchContext<'_>,
) -> StrategyOutcome {
    let settings = &ctx.config.deepening;
    let targets = template.targets();
    if targets.iter().all(|&t| t == 0) {
        return StrategyOutcome::Solved(Vec::new());
    }

    // Positions into `template.buttons()` of the buttons worth pressing.
    let pressable: Vec<usize> = template
        .buttons()
        .iter()
        .enumerate()
        .filter(|(_, b)| !b.is_empty())
        .map(|(i, _)| i)
        .collect();
    let buttons: Vec<&Button> = pressable.iter().map(|&i| &template.buttons()[i]).collect();
    let Some(widest) = buttons.iter().map(|b| b.len()).max() else {
        return StrategyOutcome::Failed(FailureReason::Infeasible);
    };

    let total = usize::try_from(template.target_total()).unwrap_or(usize::MAX);
    let tallest = targets.iter().copied().max().unwrap_or(0) as usize;
    let lower = tallest.max(total.div_ceil(widest));
    let upper = match ctx.best() {
        Some(best) => max_depth.min(best.saturating_sub(1)),
        None => max_depth,
    };

    let mut search = Deepening {
        buttons,
        widest,
        needs: targets.iter().map(|&t| i64::from(t)).collect(),
        path: Vec::new(),
        deadline: Instant::now(),
        poll_interval: settings.poll_interval.max(1),
        nodes: 0,
    };
    let mut expired = false;

    for depth in lower..=upper {
        search.deadline = Instant::now() + settings.per_depth_timeout();
        search.nodes = 0;
        match search.probe(0, depth) {
            Probe::Found => {
                if expired {
                    tracing::warn!(depth, "deepening found a solution after a skipped depth");
                }
                let presses = search.path.iter().map(|&k| pressable[k]).collect();
                return StrategyOutcome::Solved(presses);
            }
            Probe::Expired => {
                tracing::debug!(depth, nodes = search.nodes, "depth timed out");
                expired = true;
            }
            Probe::Exhausted => {
                tracing::trace!(depth, nodes = search.nodes, "depth exhausted");
            }
        }
    }

    if expired {
        StrategyOutcome::Failed(FailureReason::DeadlineExpired)
    } else {
        StrategyOutcome::Failed(FailureReason::DepthExhausted)
    }
}

struct Deepening<'a> {
    buttons: Vec<&'a Button>,
    widest: usize,
    needs: Vec<i64>,
    /// Positions into `buttons`, non-decreasing.
    path: Vec<usize>,
    deadline: Instant,
    poll_interval: u64,
    nodes: u64,
}

impl Deepening<'_> {
    /// Look for exactly `remaining` more presses, each of a button at
    /// position `from` or later, that bring every need to zero. On
    /// `Found` the presses are left on `path`.
    fn probe(&mut self, from: usize, remaining: usize) -> Probe {
        self.nodes += 1;
        if self.nodes % self.poll_interval == 0 && Instant::now() >= self.deadline {
            return Probe::Expired;
        }

        let largest = self.needs.iter().copied().max().unwrap_or(0);
        if remaining == 0 {
            return if largest == 0 {
                Probe::Found
            } else {
                Probe::Exhausted
            };
        }
        // Every press raises at least one counter, so a finished system
        // cannot absorb more presses.
        if largest == 0 || largest as usize > remaining {
            return Probe::Exhausted;
        }
        let outstanding: i64 = self.needs.iter().sum();
        if outstanding as usize > remaining * self.widest {
            return Probe::Exhausted;
        }
        let uncovered = self.needs.iter().enumerate().any(|(c, &need)| {
            need > 0 && !self.buttons[from..].iter().any(|b| b.touches(c))
        });
        if uncovered {
            return Probe::Exhausted;
        }

        for k in from..self.buttons.len() {
            let button = self.buttons[k];
            if button.indices().iter().any(|&c| self.needs[c] == 0) {
                continue;
            }
            for &c in button.indices() {
                self.needs[c] -= 1;
            }
            self.path.push(k);

            let probe = self.probe(k, remaining - 1);
            if probe == Probe::Found {
                return Probe::Found;
            }

            self.path.pop();
            for &c in self.buttons[k].indices() {
                self.needs[c] += 1;
            }
            if probe == Probe::Expired {
                return Probe::Expired;
            }
        }
        Probe::Exhausted
    }
}
