//! Core domain types for Switchyard.
//!
//! This crate contains the two machine models with no IO and no search logic:
//!
//! - [`ToggleSystem`]: a row of lamps and a pool of single-use XOR switches.
//! - [`CounterSystem`]: a vector of counters and a pool of reusable buttons,
//!   each adding 1 to a fixed subset of counters.
//!
//! Everything here can be used from any layer of the application. The solvers
//! live in `switchyard-engine`.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod bits;
mod counter;
pub mod parse;
mod toggle;

pub use bits::{Bits, SwitchSet};
pub use counter::{Button, CounterSystem, JoltStatus};
pub use parse::{Machine, ParseError, parse_machine, parse_manual};
pub use toggle::ToggleSystem;

use thiserror::Error;

/// A system that cannot be represented by the solvers.
///
/// Returned by the [`ToggleSystem`] and [`CounterSystem`] constructors, so an
/// instance that exists is always within the bit and index ranges the engines
/// assume.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SystemError {
    #[error("can only handle {max} lamps, but found {lamps}", max = Bits::WIDTH)]
    TooManyLamps { lamps: usize },
    #[error("can only handle {max} switches, but found {switches}", max = SwitchSet::CAPACITY)]
    TooManySwitches { switches: usize },
    #[error("bit index {index} does not fit in a {max}-bit mask", max = Bits::WIDTH)]
    BitOutOfRange { index: usize },
    #[error("switch {switch} ({mask}) touches lamps beyond the {lamp_count}-lamp row")]
    SwitchOutOfRange {
        switch: usize,
        mask: Bits,
        lamp_count: usize,
    },
    #[error("pattern {mask} is wider than the {lamp_count}-lamp row")]
    PatternOutOfRange { mask: Bits, lamp_count: usize },
    #[error("button {button} references counter {index}, but there are only {counters} counters")]
    ButtonOutOfRange {
        button: usize,
        index: usize,
        counters: usize,
    },
}
