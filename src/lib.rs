//! Contest scoreboard state engine.
//!
//! Ingests a totally ordered stream of [`event::ContestUpdate`]s, folds it
//! into immutable contest state, and maintains ranked scoreboards at three
//! optimism levels, with freeze handling, award assignment and
//! time-compressed replay of recorded feeds.

pub mod adapters;
pub mod broadcast;
pub mod config;
pub mod engine;
pub mod errors;
pub mod event;
pub mod feed;
pub mod model;
pub mod scoreboard;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
