//! Integration test modules

mod cli;
mod counter;
mod parse;
mod toggle;
