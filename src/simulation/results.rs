// src/simulation/results.rs
use crate::core::{ClassicalWindow, EccError, StateVector};
use crate::validation::outcome_probability;
use std::fmt;

/// Outcome of one simulated shot: the classical bits and the final state.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    clbits: Vec<bool>,
    final_state: StateVector,
}

impl SimulationResult {
    pub(crate) fn new(final_state: StateVector, clbits: Vec<bool>) -> Self {
        Self { clbits, final_state }
    }

    /// Value of classical bit `bit`, if the circuit has it.
    pub fn bit(&self, bit: usize) -> Option<bool> {
        self.clbits.get(bit).copied()
    }

    /// All classical bits in index order.
    pub fn clbits(&self) -> &[bool] {
        &self.clbits
    }

    /// Little-endian value of a classical window.
    pub fn value(&self, window: ClassicalWindow) -> u64 {
        window.value_in(&self.clbits)
    }

    /// State after the last operation.
    pub fn final_state(&self) -> &StateVector {
        &self.final_state
    }

    /// Probability that `qubit` would read `value` in the final state.
    pub fn probability(&self, qubit: usize, value: bool) -> Result<f64, EccError> {
        outcome_probability(&self.final_state, qubit, value)
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Results:")?;
        if self.clbits.is_empty() {
            writeln!(f, "  No classical bits.")?;
        } else {
            let bits: String = self.clbits.iter().map(|b| if *b { '1' } else { '0' }).collect();
            writeln!(f, "  Classical bits (c0 first): {}", bits)?;
        }
        Ok(())
    }
}
