//! Minimum-press search over toggle systems.
//!
//! Depth-first over "press one unused switch, recurse". At each node every
//! available switch is tried once before any child is expanded, so a match at
//! the current level ends that branch at the shallowest depth it can reach.
//! The best finishing depth found anywhere bounds the remaining branches.
//!
//! Nodes are not memoized: the same (state, used switches) pair reached by two
//! press orders is expanded twice.

use switchyard_types::{Bits, SwitchSet, ToggleSystem};

/// Result of a toggle search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The target is reached by pressing each switch in `switches` once.
    Solved { presses: usize, switches: SwitchSet },
    /// No subset of the switches produces the target.
    Unreachable,
}

impl ToggleOutcome {
    #[must_use]
    pub fn presses(self) -> Option<usize> {
        match self {
            Self::Solved { presses, .. } => Some(presses),
            Self::Unreachable => None,
        }
    }
}

/// Exhaustive minimum-press solver for [`ToggleSystem`]s. Holds no state
/// between solves.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReachabilitySearcher;

impl ReachabilitySearcher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    pub fn solve(&self, system: &ToggleSystem) -> ToggleOutcome {
        if system.state() == system.target() {
            return ToggleOutcome::Solved {
                presses: 0,
                switches: SwitchSet::EMPTY,
            };
        }
        if !system.can_reach_target() {
            tracing::debug!(%system, "target outside switch span");
            return ToggleOutcome::Unreachable;
        }

        let mut search = Search {
            system,
            best: None,
            nodes: 0,
        };
        search.descend(system.state(), SwitchSet::EMPTY, 0);
        tracing::debug!(
            nodes = search.nodes,
            best = ?search.best.map(|(depth, _)| depth),
            "toggle search finished"
        );

        match search.best {
            Some((presses, switches)) => ToggleOutcome::Solved { presses, switches },
            None => ToggleOutcome::Unreachable,
        }
    }
}

struct Search<'a> {
    system: &'a ToggleSystem,
    best: Option<(usize, SwitchSet)>,
    nodes: u64,
}

impl Search<'_> {
    fn bound(&self) -> usize {
        self.best.map_or(usize::MAX, |(depth, _)| depth)
    }

    fn descend(&mut self, state: Bits, used: SwitchSet, depth: usize) {
        self.nodes += 1;
        let target = self.system.target();
        let count = self.system.switches().len();

        for i in (0..count).filter(|&i| !used.contains(i)) {
            if self.system.apply(state, i) == target {
                if depth + 1 < self.bound() {
                    self.best = Some((depth + 1, used.with(i)));
                }
                return;
            }
        }

        // Children finish no earlier than depth + 2.
        if depth + 2 >= self.bound() {
            return;
        }
        for i in (0..count).filter(|&i| !used.contains(i)) {
            if depth + 2 >= self.bound() {
                return;
            }
            let next = self.system.apply(state, i);
            self.descend(next, used.with(i), depth + 1);
        }
    }
}
