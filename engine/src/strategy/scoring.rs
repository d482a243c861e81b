//! Button usefulness and the penalty terms shared by every scoring rule.

use switchyard_types::{Button, CounterSystem};

use crate::config::ScoreWeights;

/// A button is useful when it touches at least one counter and every counter
/// it touches still has positive need, so pressing it cannot overshoot.
pub(crate) fn is_useful(button: &Button, needs: &[i64]) -> bool {
    !button.is_empty() && button.indices().iter().all(|&c| needs[c] > 0)
}

pub(crate) fn useful_buttons(system: &CounterSystem, needs: &[i64]) -> Vec<usize> {
    system
        .buttons()
        .iter()
        .enumerate()
        .filter(|(_, b)| is_useful(b, needs))
        .map(|(i, _)| i)
        .collect()
}

/// Counters that would still need presses but have no useful button left
/// once `button` is pressed.
pub(crate) fn stranded_after(system: &CounterSystem, needs: &[i64], button: usize) -> usize {
    let mut after = needs.to_vec();
    for &c in system.buttons()[button].indices() {
        after[c] -= 1;
    }

    let mut covered = vec![false; after.len()];
    for b in system.buttons().iter().filter(|b| is_useful(b, &after)) {
        for &c in b.indices() {
            covered[c] = true;
        }
    }

    after
        .iter()
        .zip(covered)
        .filter(|&(&need, covered)| need > 0 && !covered)
        .count()
}

/// Penalty terms subtracted from every rule's raw score.
///
/// A counter is closed "tightly" when the press brings its need to zero while
/// a wider useful button also touches it; closing it with the narrow button
/// locks the wider one out.
pub(crate) fn penalty(
    system: &CounterSystem,
    needs: &[i64],
    button: usize,
    weights: &ScoreWeights,
) -> f64 {
    let width = system.buttons()[button].len();
    let tight = system.buttons()[button]
        .indices()
        .iter()
        .filter(|&&c| needs[c] == 1)
        .filter(|&&c| {
            system
                .buttons()
                .iter()
                .any(|b| b.len() > width && b.touches(c) && is_useful(b, needs))
        })
        .count();
    let stranded = stranded_after(system, needs, button);
    weights.tight_penalty * tight as f64 + weights.strand_penalty * stranded as f64
}

/// Position of the highest score, lowest position on ties.
pub(crate) fn argmax(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}
