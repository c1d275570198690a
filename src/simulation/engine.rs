// src/simulation/engine.rs
use crate::core::{Control, EccError, StateVector};
use crate::operations::{GateKind, Operation};
use crate::validation::{check_normalization, DEFAULT_NORM_TOLERANCE};
use num_complex::Complex;
use num_traits::{One, Zero};
use rand::Rng;
use std::f64::consts::FRAC_1_SQRT_2;

/// Largest register the dense state vector is allowed to hold.
pub(crate) const MAX_SIMULATED_QUBITS: usize = 24;

type Matrix2 = [[Complex<f64>; 2]; 2];

/// Dense state-vector engine executing one circuit shot.
/// (Internal visibility)
#[derive(Debug)]
pub(crate) struct SimulationEngine {
    state: StateVector,
    clbits: Vec<bool>,
}

impl SimulationEngine {
    /// Initializes |0...0⟩ with every classical bit cleared.
    pub(crate) fn init(num_qubits: usize, num_clbits: usize) -> Result<Self, EccError> {
        if num_qubits > MAX_SIMULATED_QUBITS {
            return Err(EccError::SimulationError {
                message: format!(
                    "{} qubits exceed the simulator limit of {}",
                    num_qubits, MAX_SIMULATED_QUBITS
                ),
            });
        }
        Ok(Self {
            state: StateVector::zero(num_qubits),
            clbits: vec![false; num_clbits],
        })
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: StateVector) -> Result<(), EccError> {
        if state.dim() != self.state.dim() {
            Err(EccError::SimulationError {
                message: format!(
                    "Cannot set state: provided dimension {} does not match engine dimension {}",
                    state.dim(),
                    self.state.dim()
                ),
            })
        } else {
            self.state = state;
            Ok(())
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &StateVector {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn clbits(&self) -> &[bool] {
        &self.clbits
    }

    pub(crate) fn into_parts(self) -> (StateVector, Vec<bool>) {
        (self.state, self.clbits)
    }

    /// Applies a single operation, sampling outcomes from `rng`.
    pub(crate) fn apply_operation<R: Rng>(&mut self, op: &Operation, rng: &mut R) -> Result<(), EccError> {
        match op {
            Operation::Unitary { kind, target, controls } => {
                self.apply_gate(target.index(), controls, &gate_matrix(*kind));
            }
            Operation::Measure { qubit, bit } => {
                let outcome = self.measure(qubit.index(), rng)?;
                let slot = self.clbits.get_mut(*bit).ok_or_else(|| EccError::ReferenceViolation {
                    message: format!("classical bit {} not allocated", bit),
                })?;
                *slot = outcome;
            }
            Operation::Reset { qubit } => {
                if self.measure(qubit.index(), rng)? {
                    self.apply_gate(qubit.index(), &[], &gate_matrix(GateKind::X));
                }
            }
            Operation::ClassicControlled { kind, target, window, expected } => {
                if window.value_in(&self.clbits) == *expected {
                    self.apply_gate(target.index(), &[], &gate_matrix(*kind));
                }
            }
            Operation::Barrier { .. } => {}
        }
        Ok(())
    }

    /// Applies a 2x2 matrix to `target` on the basis states where every
    /// control is satisfied.
    fn apply_gate(&mut self, target: usize, controls: &[Control], matrix: &Matrix2) {
        let t_mask = 1usize << target;
        let amplitudes = self.state.amplitudes_mut();
        for k in 0..amplitudes.len() {
            if k & t_mask != 0 {
                continue;
            }
            let fires = controls
                .iter()
                .all(|c| c.is_satisfied_by((k >> c.qubit.index()) & 1 == 1));
            if !fires {
                continue;
            }
            let k1 = k | t_mask;
            let (psi_0, psi_1) = (amplitudes[k], amplitudes[k1]);
            amplitudes[k] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            amplitudes[k1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
    }

    /// Projective Z measurement of `qubit`; collapses and renormalizes.
    fn measure<R: Rng>(&mut self, qubit: usize, rng: &mut R) -> Result<bool, EccError> {
        let p_one = self.state.probability_one(qubit);
        let outcome = rng.random::<f64>() < p_one;
        let p_outcome = if outcome { p_one } else { 1.0 - p_one };
        if p_outcome < 1e-12 {
            return Err(EccError::SimulationError {
                message: format!("measurement of qubit {} selected an outcome of probability {:.3e}", qubit, p_outcome),
            });
        }

        let scale = 1.0 / p_outcome.sqrt();
        let mask = 1usize << qubit;
        for (k, amp) in self.state.amplitudes_mut().iter_mut().enumerate() {
            if ((k & mask) != 0) == outcome {
                *amp *= scale;
            } else {
                *amp = Complex::zero();
            }
        }
        check_normalization(&self.state, DEFAULT_NORM_TOLERANCE)?;
        Ok(outcome)
    }
}

/// Matrix of a single-qubit gate in the {|0⟩, |1⟩} basis.
pub(crate) fn gate_matrix(kind: GateKind) -> Matrix2 {
    let zero = Complex::zero();
    let one = Complex::one();
    let i = Complex::i();
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    let phase = |theta: f64| Complex::new(theta.cos(), theta.sin());
    match kind {
        GateKind::I => [[one, zero], [zero, one]],
        GateKind::H => [[h, h], [h, -h]],
        GateKind::X => [[zero, one], [one, zero]],
        GateKind::Y => [[zero, -i], [i, zero]],
        GateKind::Z => [[one, zero], [zero, -one]],
        GateKind::S => [[one, zero], [zero, i]],
        GateKind::Sdg => [[one, zero], [zero, -i]],
        GateKind::T => [[one, zero], [zero, phase(std::f64::consts::FRAC_PI_4)]],
        GateKind::Tdg => [[one, zero], [zero, phase(-std::f64::consts::FRAC_PI_4)]],
    }
}
