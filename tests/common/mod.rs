//! Shared test utilities and fixtures
//!
//! Brute-force reference solvers and random system generators for the
//! integration suite.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::io::Write;

use rand::prelude::*;
use switchyard_engine::{Bits, Button, CounterSystem, JoltStatus, SolverConfig, ToggleSystem};
use tempfile::NamedTempFile;

/// The three-machine sample manual; toggle minimums 2, 3, 2 and counter
/// minimums 10, 12, 11.
pub const SAMPLE_MANUAL: &str = "\
[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}
[...#.] (0,2,3,4) (2,3) (0,4) (0,1,2) (1,2,3,4) {7,5,12,7,2}
[.###.#] (0,1,2,3,4) (0,3,4) (0,1,2,4,5) (1,2) {10,11,11,5,10,5}
";

/// Fewest switches whose XOR turns the start state into the target, by
/// trying every subset.
pub fn toggle_minimum(system: &ToggleSystem) -> Option<usize> {
    let switches = system.switches();
    assert!(switches.len() <= 16, "too many switches for brute force");
    (0u32..1 << switches.len())
        .filter(|subset| {
            let state = switches
                .iter()
                .enumerate()
                .filter(|(i, _)| subset & (1 << i) != 0)
                .fold(system.state(), |state, (_, &mask)| state ^ mask);
            state == system.target()
        })
        .map(|subset| subset.count_ones() as usize)
        .min()
}

/// Fewest presses to reach every target exactly, by breadth-first search
/// over counter vectors that never exceed a target.
pub fn counter_minimum(system: &CounterSystem) -> Option<usize> {
    let targets: Vec<u32> = system.targets().to_vec();
    let start = vec![0u32; targets.len()];
    let mut seen = HashSet::from([start.clone()]);
    let mut queue = VecDeque::from([(start, 0usize)]);

    while let Some((counters, depth)) = queue.pop_front() {
        if counters == targets {
            return Some(depth);
        }
        for button in system.buttons().iter().filter(|b| !b.is_empty()) {
            let mut next = counters.clone();
            for &c in button.indices() {
                next[c] += 1;
            }
            if next.iter().zip(&targets).any(|(n, t)| n > t) {
                continue;
            }
            if seen.insert(next.clone()) {
                queue.push_back((next, depth + 1));
            }
        }
    }
    None
}

pub fn random_toggle(rng: &mut StdRng) -> ToggleSystem {
    let lamps = rng.random_range(1..=8usize);
    let count = rng.random_range(0..=10usize);
    let limit = 1u64 << lamps;
    let switches = (0..count)
        .map(|_| Bits::new(rng.random_range(0..limit)))
        .collect();
    let target = Bits::new(rng.random_range(0..limit));
    let system = ToggleSystem::new(lamps, target, switches).unwrap();
    if rng.random_bool(0.25) {
        let state = Bits::new(rng.random_range(0..limit));
        system.with_state(state).unwrap()
    } else {
        system
    }
}

pub fn random_counter(rng: &mut StdRng) -> CounterSystem {
    let counters = rng.random_range(1..=4usize);
    let targets = (0..counters).map(|_| rng.random_range(0..=4u32)).collect();
    let buttons = (0..rng.random_range(1..=5usize))
        .map(|_| Button::new((0..counters).filter(|_| rng.random_bool(0.5))))
        .collect();
    CounterSystem::new(targets, buttons).unwrap()
}

/// Replay `presses` from zero on a copy of `system`.
pub fn replay(system: &CounterSystem, presses: &[usize]) -> JoltStatus {
    let mut system = system.clone();
    system.reset();
    for &b in presses {
        system.press_button(b);
    }
    system.check()
}

/// A fixed seed and small budgets, so infeasible systems fail fast and the
/// deepening fallback gets exercised.
pub fn quick_config(seed: u64) -> SolverConfig {
    let mut config = SolverConfig {
        seed: Some(seed),
        ..SolverConfig::default()
    };
    config.greedy.iteration_base = 200;
    config.greedy.iteration_per_unit = 10;
    config.randomized.attempts = 2;
    config.randomized.intensive_attempts = 2;
    config
}

pub fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
