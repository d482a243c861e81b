//! Counter optimizer tests

use rand::prelude::*;
use switchyard_engine::{
    Button, CounterOutcome, CounterSystem, FailureReason, JoltStatus, TargetOptimizer,
    parse_manual,
};

use crate::common::{
    SAMPLE_MANUAL, counter_minimum, quick_config, random_counter, replay,
};

#[test]
fn sample_manual_counters_are_solved() {
    let machines = parse_manual(SAMPLE_MANUAL).unwrap();
    let optimizer = TargetOptimizer::new(quick_config(1));
    for (machine, minimum) in machines.iter().zip([10, 12, 11]) {
        let system = machine.counter.as_ref().unwrap();
        let CounterOutcome::Solved(solution) = optimizer.solve(system) else {
            panic!("unsolved: {system}");
        };
        assert_eq!(replay(system, &solution.presses), JoltStatus::Equal);
        assert!(solution.count() >= minimum);
    }
}

#[test]
fn solves_exactly_the_feasible_random_systems() {
    let mut rng = StdRng::seed_from_u64(0xc0de);
    let optimizer = TargetOptimizer::new(quick_config(2));
    for _ in 0..150 {
        let system = random_counter(&mut rng);
        let minimum = counter_minimum(&system);
        match optimizer.solve(&system) {
            CounterOutcome::Solved(solution) => {
                let minimum = minimum.unwrap_or_else(|| panic!("infeasible but solved: {system}"));
                assert!(solution.count() >= minimum, "{system}");
                assert_eq!(replay(&system, &solution.presses), JoltStatus::Equal);
            }
            CounterOutcome::Unsolved(reason) => {
                assert_eq!(minimum, None, "feasible but unsolved ({reason}): {system}");
            }
        }
    }
}

#[test]
fn button_touching_nothing_never_yields_a_count() {
    let system = CounterSystem::new(vec![1], vec![Button::new([])]).unwrap();
    let outcome = TargetOptimizer::new(quick_config(3)).solve(&system);
    assert_eq!(outcome, CounterOutcome::Unsolved(FailureReason::Infeasible));
    assert_eq!(outcome.presses(), None);
}

#[test]
fn solve_leaves_the_input_untouched() {
    let machines = parse_manual(SAMPLE_MANUAL).unwrap();
    let system = machines[0].counter.clone().unwrap();
    let before = system.clone();
    TargetOptimizer::new(quick_config(4)).solve(&system);
    assert_eq!(system, before);
}

#[test]
fn unpress_is_a_left_inverse_of_press() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut system = CounterSystem::new(
        vec![5, 5, 5],
        vec![Button::new([0, 1]), Button::new([2]), Button::new([1, 2])],
    )
    .unwrap();
    system.press_button(0);
    system.press_button(2);
    let counters = system.counters().to_vec();
    let presses = system.presses().to_vec();

    system.press_button(1);
    assert_eq!(system.retract(system.press_count() - 1), 1);
    assert_eq!(system.counters(), counters.as_slice());
    assert_eq!(system.presses(), presses.as_slice());

    let retracted = system.unpress(&mut rng);
    assert!(presses.contains(&retracted));
    assert_eq!(system.press_count(), 1);
}

#[test]
fn seeded_solves_are_reproducible() {
    let machines = parse_manual(SAMPLE_MANUAL).unwrap();
    let system = machines[2].counter.as_ref().unwrap();
    let first = TargetOptimizer::new(quick_config(42)).solve(system);
    let second = TargetOptimizer::new(quick_config(42)).solve(system);
    assert_eq!(first, second);
}
