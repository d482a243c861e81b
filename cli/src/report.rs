//! Per-machine results and per-mode sums.

use std::io::{self, Write};

use switchyard_engine::{
    CounterOutcome, Machine, ReachabilitySearcher, TargetOptimizer, ToggleOutcome,
};

/// Which engines a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Toggle,
    Counter,
    Both,
}

impl Mode {
    fn toggle(self) -> bool {
        matches!(self, Mode::Toggle | Mode::Both)
    }

    fn counter(self) -> bool {
        matches!(self, Mode::Counter | Mode::Both)
    }
}

/// Totals for one mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    /// Sum of press counts over solved machines.
    pub presses: u64,
    pub solved: usize,
    /// Machines with no answer: unreachable toggles, unsolved counters.
    pub failed: usize,
    /// Machines without counter targets (counter mode only).
    pub skipped: usize,
}

impl Tally {
    fn add(&mut self, presses: usize) {
        self.presses += presses as u64;
        self.solved += 1;
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub toggle: Option<Tally>,
    pub counter: Option<Tally>,
}

/// Solve every machine in the requested modes, writing one line per machine
/// and a sum line per mode to `out`.
pub fn run(
    machines: &[Machine],
    mode: Mode,
    optimizer: &TargetOptimizer,
    out: &mut impl Write,
) -> io::Result<Summary> {
    let mut summary = Summary::default();

    if mode.toggle() {
        writeln!(out, "== toggle ==")?;
        let searcher = ReachabilitySearcher::new();
        let mut tally = Tally::default();
        for (n, machine) in machines.iter().enumerate() {
            let outcome = searcher.solve(&machine.toggle);
            match outcome {
                ToggleOutcome::Solved { presses, switches } => {
                    tracing::debug!(
                        machine = n + 1,
                        presses,
                        switches = ?switches.iter().collect::<Vec<_>>(),
                        "toggle solved"
                    );
                    writeln!(out, "machine {}: {presses} presses", n + 1)?;
                    tally.add(presses);
                }
                ToggleOutcome::Unreachable => {
                    writeln!(out, "machine {}: unreachable", n + 1)?;
                    tally.failed += 1;
                }
            }
        }
        write_sum(out, &tally, "unreachable")?;
        summary.toggle = Some(tally);
    }

    if mode.counter() {
        writeln!(out, "== counter ==")?;
        let mut tally = Tally::default();
        for (n, machine) in machines.iter().enumerate() {
            let Some(system) = &machine.counter else {
                writeln!(out, "machine {}: no targets", n + 1)?;
                tally.skipped += 1;
                continue;
            };
            match optimizer.solve(system) {
                CounterOutcome::Solved(solution) => {
                    tracing::debug!(
                        machine = n + 1,
                        strategy = %solution.strategy,
                        presses = ?solution.presses,
                        "counter solved"
                    );
                    writeln!(out, "machine {}: {} presses", n + 1, solution.count())?;
                    tally.add(solution.count());
                }
                CounterOutcome::Unsolved(reason) => {
                    tracing::info!(machine = n + 1, %reason, "counter unsolved");
                    writeln!(out, "machine {}: unsolved", n + 1)?;
                    tally.failed += 1;
                }
            }
        }
        write_sum(out, &tally, "unsolved")?;
        summary.counter = Some(tally);
    }

    Ok(summary)
}

fn write_sum(out: &mut impl Write, tally: &Tally, failed_label: &str) -> io::Result<()> {
    write!(out, "sum: {} ({} solved", tally.presses, tally.solved)?;
    if tally.failed > 0 {
        write!(out, ", {} {failed_label}", tally.failed)?;
    }
    if tally.skipped > 0 {
        write!(out, ", {} without targets", tally.skipped)?;
    }
    writeln!(out, ")")
}
