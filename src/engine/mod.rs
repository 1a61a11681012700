//! The Wedelin-heuristic engines (spec sections 4.3 and 4.4).
//!
//! Both variants share the same outer shape — construct from a validated problem,
//! seed a greedy `x`, then repeatedly call [`HeuristicEngine::step`] — so that shape
//! is pulled out into a trait here, the same way `copters::Solver` gives the IPM/QP/NLP
//! solvers a single `solve` entry point regardless of which augmented-system or
//! line-search strategy backs them.

pub mod equality;
pub mod signed;

use crate::error::SolverError;
use crate::E;

/// How the equality-variant dual update (spec section 4.2, step 5) combines the two
/// ranking boundary scores. The source computes `r+ + r-/2`; the natural reading of
/// the published heuristic is `(r+ + r-)/2`. Spec section 9 flags this explicitly as
/// an open question rather than a typo to silently fix, so both are available and the
/// default is the corrected form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DualUpdateRule {
    #[default]
    Corrected,
    SourceVerbatim,
}

/// Which rows the signed variant's sweep invokes `update` on (spec section 4.4/9).
/// The equality variant always updates rows that are **not yet** feasible — that
/// reading is unambiguous and not flagged as an open question. The signed variant's
/// predicate is the one spec section 9 calls out: the source invokes `update` on
/// rows that **are** inside their interval already, which is "either a bug or an
/// intentional asymmetry." `Corrected` updates rows that are outside their interval
/// (the reading that actually drives an infeasible row toward feasibility);
/// `SourceVerbatim` reproduces the source's literal inverted predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowUpdatePolarity {
    #[default]
    Corrected,
    SourceVerbatim,
}

/// The three fixed hyperparameters (spec section 3: kappa, ell, theta), plus the
/// two open-question knobs above. Parameters are constant for the duration of a
/// solve — there is no adaptive tuning (spec section 4.5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineParams {
    pub kappa: E,
    pub ell: E,
    pub theta: E,
    pub dual_update: DualUpdateRule,
    pub row_update_polarity: RowUpdatePolarity,
}

impl EngineParams {
    pub fn new(kappa: E, ell: E, theta: E) -> Result<Self, SolverError> {
        Self::validate(kappa, ell, theta)?;
        Ok(Self {
            kappa,
            ell,
            theta,
            dual_update: DualUpdateRule::default(),
            row_update_polarity: RowUpdatePolarity::default(),
        })
    }

    pub fn with_dual_update(mut self, rule: DualUpdateRule) -> Self {
        self.dual_update = rule;
        self
    }

    pub fn with_row_update_polarity(mut self, polarity: RowUpdatePolarity) -> Self {
        self.row_update_polarity = polarity;
        self
    }

    fn validate(kappa: E, ell: E, theta: E) -> Result<(), SolverError> {
        if !(kappa >= 0.0 && kappa < 1.0) {
            return Err(SolverError::InvalidParameter(format!(
                "kappa must be in [0, 1), got {kappa}"
            )));
        }
        if !(ell >= 0.0) {
            return Err(SolverError::InvalidParameter(format!(
                "ell (delta) must be in [0, +inf), got {ell}"
            )));
        }
        if !(theta >= 0.0 && theta <= 1.0) {
            return Err(SolverError::InvalidParameter(format!(
                "theta must be in [0, 1], got {theta}"
            )));
        }
        Ok(())
    }
}

/// Common contract for the two engine variants (spec sections 4.3/4.4).
pub trait HeuristicEngine {
    /// Sweeps every infeasible row in ascending index order and applies its update.
    /// Returns whatever this variant considers global feasibility after the sweep.
    fn step(&mut self) -> bool;

    /// The current candidate assignment.
    fn assignment(&self) -> &[bool];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_kappa_out_of_range() {
        assert!(matches!(
            EngineParams::new(1.0, 0.0, 0.0),
            Err(SolverError::InvalidParameter(_))
        ));
        assert!(matches!(
            EngineParams::new(-0.1, 0.0, 0.0),
            Err(SolverError::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_negative_ell() {
        assert!(matches!(
            EngineParams::new(0.1, -0.01, 0.0),
            Err(SolverError::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_theta_out_of_range() {
        assert!(matches!(
            EngineParams::new(0.1, 0.0, -0.01),
            Err(SolverError::InvalidParameter(_))
        ));
        assert!(matches!(
            EngineParams::new(0.1, 0.0, 1.01),
            Err(SolverError::InvalidParameter(_))
        ));
    }

    #[test]
    fn accepts_boundary_values() {
        assert!(EngineParams::new(0.0, 0.0, 0.0).is_ok());
        assert!(EngineParams::new(0.999, 10.0, 1.0).is_ok());
    }
}
