//! Solvers for Switchyard machines.
//!
//! Two independent engines over the models in `switchyard-types`:
//!
//! - [`ReachabilitySearcher`] finds the fewest single-use switch presses that
//!   turn a [`ToggleSystem`] into its target pattern, or proves none exist.
//! - [`TargetOptimizer`] races a catalog of heuristic [`Strategy`]s over a
//!   [`CounterSystem`] and keeps the fewest presses found.
//!
//! Neither engine does IO; configuration is passed in by the caller.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

// Re-export from crates for public API
pub use switchyard_types::{
    Bits, Button, CounterSystem, JoltStatus, Machine, ParseError, SwitchSet, SystemError,
    ToggleSystem, parse_machine, parse_manual,
};

// Config types - passed in from caller
mod config;
pub use config::{
    ConfigError, DeepeningConfig, GreedyConfig, RandomizedConfig, SEED_ENV, ScoreWeights,
    SolverConfig, config_path,
};

mod optimizer;
mod reachability;
mod strategy;

pub use optimizer::{CounterOutcome, Solution, TargetOptimizer};
pub use reachability::{ReachabilitySearcher, ToggleOutcome};
pub use strategy::{
    FailureReason, GreedyRule, RandomizedRule, SearchContext, Strategy, StrategyOutcome,
};
