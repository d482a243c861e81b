//! Toggle reachability tests

use rand::prelude::*;
use switchyard_engine::{Bits, ReachabilitySearcher, ToggleOutcome, ToggleSystem, parse_manual};

use crate::common::{SAMPLE_MANUAL, random_toggle, toggle_minimum};

#[test]
fn sample_manual_toggle_minimums() {
    let machines = parse_manual(SAMPLE_MANUAL).unwrap();
    let searcher = ReachabilitySearcher::new();
    let presses: Vec<_> = machines
        .iter()
        .map(|m| searcher.solve(&m.toggle).presses())
        .collect();
    assert_eq!(presses, vec![Some(2), Some(3), Some(2)]);
}

#[test]
fn matches_brute_force_on_random_systems() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let searcher = ReachabilitySearcher::new();
    for _ in 0..300 {
        let system = random_toggle(&mut rng);
        let outcome = searcher.solve(&system);
        assert_eq!(outcome.presses(), toggle_minimum(&system), "{system}");
        if let ToggleOutcome::Solved { presses, switches } = outcome {
            assert_eq!(switches.len(), presses);
            assert_eq!(system.apply_all(switches), system.target(), "{system}");
        }
    }
}

#[test]
fn answer_is_bounded_by_switch_count() {
    let mut rng = StdRng::seed_from_u64(7);
    let searcher = ReachabilitySearcher::new();
    for _ in 0..100 {
        let system = random_toggle(&mut rng);
        if let Some(presses) = searcher.solve(&system).presses() {
            assert!(presses <= system.switches().len());
        }
    }
}

#[test]
fn duplicate_switches_are_each_usable_once() {
    // Two identical switches cancel out; the target needs the third.
    let system = ToggleSystem::new(
        3,
        Bits::new(0b110),
        vec![Bits::new(0b011), Bits::new(0b011), Bits::new(0b101)],
    )
    .unwrap();
    assert_eq!(ReachabilitySearcher::new().solve(&system).presses(), Some(2));
}

#[test]
fn wide_system_is_solved_quickly() {
    // Sixteen unit switches plus one that covers the target alone.
    let mut switches: Vec<Bits> = (0..16).map(|i| Bits::new(1 << i)).collect();
    switches.push(Bits::new(0xffff));
    let system = ToggleSystem::new(16, Bits::new(0xffff), switches).unwrap();
    assert_eq!(ReachabilitySearcher::new().solve(&system).presses(), Some(1));
}
