//! Genetic training of the placement heuristic's weight vector.
//!
//! A [`Population`] of weight vectors is scored by playing headless
//! games (total lines cleared is the fitness), then evolved with
//! tournament selection, averaging or spherical-interpolation crossover,
//! and bounded Gaussian mutation. The [`Trainer`] drives the generation
//! loop, decaying the mutation parameters over time, stretching the
//! per-game placement budget while fitness stagnates, and partially
//! reseeding the population when it stagnates too long.

pub use self::{genetic::*, simulation::*, stats::*};

mod genetic;
mod simulation;
mod stats;
mod weights_ops;
