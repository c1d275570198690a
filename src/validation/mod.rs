// src/validation/mod.rs

//! Provides functions to validate `StateVector`s produced by the simulator.

use crate::core::{EccError, StateVector};

/// Tolerance on |⟨ψ|ψ⟩ - 1| used by the simulator after every collapse.
pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Checks that the state's squared norm is 1 within `tolerance`.
///
/// # Errors
/// `SimulationError` carrying the measured norm.
pub fn check_normalization(state: &StateVector, tolerance: f64) -> Result<(), EccError> {
    let norm_sq: f64 = state.amplitudes().iter().map(|c| c.norm_sqr()).sum();
    if (norm_sq - 1.0).abs() > tolerance {
        return Err(EccError::SimulationError {
            message: format!("State vector norm deviated from 1: {}", norm_sq),
        });
    }
    Ok(())
}

/// Probability that `qubit` reads `value`, checked to lie in [0, 1].
pub fn outcome_probability(state: &StateVector, qubit: usize, value: bool) -> Result<f64, EccError> {
    if qubit >= state.dim().trailing_zeros() as usize {
        return Err(EccError::ReferenceViolation {
            message: format!("qubit {} is outside a state of dimension {}", qubit, state.dim()),
        });
    }
    let p_one = state.probability_one(qubit);
    let p = if value { p_one } else { 1.0 - p_one };
    Ok(p.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn normalized_state_passes() {
        let state = StateVector::from_amplitudes(vec![
            Complex::new(FRAC_1_SQRT_2, 0.0),
            Complex::new(0.0, FRAC_1_SQRT_2),
        ]);
        assert!(check_normalization(&state, DEFAULT_NORM_TOLERANCE).is_ok());
        let p = outcome_probability(&state, 0, true).expect("qubit 0 exists");
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn unnormalized_state_fails() {
        let state = StateVector::from_amplitudes(vec![Complex::new(1.0, 0.0), Complex::new(1.0, 0.0)]);
        assert!(matches!(
            check_normalization(&state, DEFAULT_NORM_TOLERANCE),
            Err(EccError::SimulationError { .. })
        ));
    }

    #[test]
    fn probability_of_missing_qubit_is_rejected() {
        let state = StateVector::zero(2);
        assert!(outcome_probability(&state, 2, true).is_err());
        assert!(outcome_probability(&state, 1, true).is_ok());
    }
}
