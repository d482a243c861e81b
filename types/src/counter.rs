use std::fmt;
use std::sync::Arc;

use rand::prelude::*;

use crate::SystemError;

/// Indices of the counters one button increments. Sorted, no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Button(Box<[usize]>);

impl Button {
    #[must_use]
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        Self(indices.into_boxed_slice())
    }

    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A button that touches no counter can never make progress.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn touches(&self, counter: usize) -> bool {
        self.0.binary_search(&counter).is_ok()
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{index}")?;
        }
        f.write_str(")")
    }
}

/// Where a counter system stands relative to its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoltStatus {
    /// Some counter is above its target; a press must be retracted before the
    /// next press is legal.
    TooHigh,
    /// Every counter equals its target.
    Equal,
    /// No counter is above target and at least one is below.
    TooLow,
}

/// Counters, their targets, the buttons that drive them, and the history of
/// presses applied so far.
///
/// Targets and buttons are fixed for the system's lifetime and shared between
/// clones, so a strategy attempt clones the system and owns its counters and
/// press history outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSystem {
    targets: Arc<[u32]>,
    buttons: Arc<[Button]>,
    counters: Vec<u32>,
    presses: Vec<usize>,
}

impl CounterSystem {
    pub fn new(targets: Vec<u32>, buttons: Vec<Button>) -> Result<Self, SystemError> {
        for (button, b) in buttons.iter().enumerate() {
            if let Some(&index) = b.indices().iter().find(|&&i| i >= targets.len()) {
                return Err(SystemError::ButtonOutOfRange {
                    button,
                    index,
                    counters: targets.len(),
                });
            }
        }
        Ok(Self {
            counters: vec![0; targets.len()],
            targets: targets.into(),
            buttons: buttons.into(),
            presses: Vec::new(),
        })
    }

    #[must_use]
    pub fn targets(&self) -> &[u32] {
        &self.targets
    }

    #[must_use]
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    #[must_use]
    pub fn counters(&self) -> &[u32] {
        &self.counters
    }

    /// Button indices in the order they were pressed.
    #[must_use]
    pub fn presses(&self) -> &[usize] {
        &self.presses
    }

    #[must_use]
    pub fn press_count(&self) -> usize {
        self.presses.len()
    }

    /// Sum of all targets. No solution can use more presses than this, since
    /// every useful press raises at least one counter.
    #[must_use]
    pub fn target_total(&self) -> u64 {
        self.targets.iter().map(|&t| u64::from(t)).sum()
    }

    /// Remaining need of `counter`: target minus current value. Negative when
    /// the counter has overshot.
    #[must_use]
    pub fn need(&self, counter: usize) -> i64 {
        i64::from(self.targets[counter]) - i64::from(self.counters[counter])
    }

    /// Remaining need of every counter, in counter order.
    #[must_use]
    pub fn needs(&self) -> Vec<i64> {
        (0..self.counters.len()).map(|c| self.need(c)).collect()
    }

    /// Zero all counters and forget every press.
    pub fn reset(&mut self) {
        self.counters.iter_mut().for_each(|c| *c = 0);
        self.presses.clear();
    }

    #[must_use]
    pub fn check(&self) -> JoltStatus {
        let mut equal = true;
        for (&current, &target) in self.counters.iter().zip(self.targets.iter()) {
            if current > target {
                return JoltStatus::TooHigh;
            }
            if current < target {
                equal = false;
            }
        }
        if equal {
            JoltStatus::Equal
        } else {
            JoltStatus::TooLow
        }
    }

    /// Increment every counter that `button` touches and record the press.
    ///
    /// Legality is not checked here; the next [`check`](Self::check) reports
    /// an overshoot. Panics if `button` does not exist.
    pub fn press_button(&mut self, button: usize) {
        assert!(
            button < self.buttons.len(),
            "button {button} out of range ({} buttons)",
            self.buttons.len()
        );
        for &counter in self.buttons[button].indices() {
            self.counters[counter] += 1;
        }
        self.presses.push(button);
    }

    /// Remove the press at `position` in the history and undo its increments.
    /// Returns the button that was retracted.
    ///
    /// Panics if `position` is outside the press history.
    pub fn retract(&mut self, position: usize) -> usize {
        assert!(
            position < self.presses.len(),
            "cannot retract press {position} of {}",
            self.presses.len()
        );
        let button = self.presses.remove(position);
        for &counter in self.buttons[button].indices() {
            self.counters[counter] -= 1;
        }
        button
    }

    /// Retract one press chosen uniformly at random from the history.
    /// Returns the button that was retracted.
    ///
    /// Panics on an empty history.
    pub fn unpress<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        assert!(!self.presses.is_empty(), "unpress with no presses recorded");
        let position = rng.random_range(0..self.presses.len());
        self.retract(position)
    }
}

impl fmt::Display for CounterSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "targets: {:?}, buttons: [", self.targets)?;
        for (i, button) in self.buttons.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{button}")?;
        }
        write!(f, "], counters: {:?}", self.counters)
    }
}
