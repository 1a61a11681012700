//! Iteration-observability hook invoked by [`crate::driver::solve`] after each sweep
//! (grounded on `copters::callback`, generalized from that crate's full IPM/NLP
//! `SolverState` snapshot down to what this engine actually has each sweep: an
//! iteration count and the current candidate assignment).

use crate::engine::HeuristicEngine;

/// Hook invoked once per outer-loop sweep, after `step()` but before the next one.
pub trait Callback {
    /// Called with the sweep index just completed and the engine's state afterward.
    fn call(&mut self, iteration: usize, engine: &dyn HeuristicEngine);
}

/// A callback that does nothing. Use when no per-iteration output is needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpCallback;

impl Callback for NoOpCallback {
    fn call(&mut self, _iteration: usize, _engine: &dyn HeuristicEngine) {}
}

/// Prints the sweep index and the number of variables currently set to 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConvergenceOutput;

impl Callback for ConvergenceOutput {
    fn call(&mut self, iteration: usize, engine: &dyn HeuristicEngine) {
        let ones = engine.assignment().iter().filter(|&&xj| xj).count();
        println!(
            "| {:4} | ones={:<6} | n={:<6} |",
            iteration,
            ones,
            engine.assignment().len()
        );
    }
}
