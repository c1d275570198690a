// src/simulation/mod.rs

//! Dense state-vector simulation of `qecc::circuits::Circuit`.
//! This module contains the `Simulator` entry point and the internal
//! `SimulationEngine` that evolves the state one operation at a time.

mod results;
pub(crate) mod engine;

pub use results::SimulationResult;

use crate::circuits::Circuit;
use crate::core::{ClassicalWindow, EccError};
use engine::SimulationEngine;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::debug;

/// Seed used by [`Simulator::new`].
pub const DEFAULT_SEED: u64 = 0x5eed;

/// Runs circuits shot by shot with a seeded random source, so repeated
/// runs of the same simulator give the same outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Simulator {
    seed: u64,
}

impl Default for Simulator {
    fn default() -> Self {
        Self { seed: DEFAULT_SEED }
    }
}

impl Simulator {
    /// Creates a new Simulator seeded with [`DEFAULT_SEED`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs one shot of `circuit` from |0...0⟩.
    ///
    /// # Errors
    /// `SimulationError` when the circuit is wider than the simulator limit
    /// or a collapse leaves the state unnormalized.
    pub fn run(&self, circuit: &Circuit) -> Result<SimulationResult, EccError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        Self::run_shot(circuit, &mut rng)
    }

    /// Runs `shots` independent shots and tallies the value of `window`.
    pub fn counts(
        &self,
        circuit: &Circuit,
        window: ClassicalWindow,
        shots: usize,
    ) -> Result<BTreeMap<u64, usize>, EccError> {
        if window.end() > circuit.num_clbits() {
            return Err(EccError::ReferenceViolation {
                message: format!(
                    "window {}..{} is outside the {} classical bits of the circuit",
                    window.start,
                    window.end(),
                    circuit.num_clbits()
                ),
            });
        }
        debug!(qubits = circuit.num_qubits(), operations = circuit.len(), shots, "sampling circuit");

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut counts = BTreeMap::new();
        for _ in 0..shots {
            let result = Self::run_shot(circuit, &mut rng)?;
            *counts.entry(result.value(window)).or_insert(0) += 1;
        }
        Ok(counts)
    }

    fn run_shot(circuit: &Circuit, rng: &mut StdRng) -> Result<SimulationResult, EccError> {
        let mut engine = SimulationEngine::init(circuit.num_qubits(), circuit.num_clbits())?;
        for op in circuit.operations() {
            engine.apply_operation(op, rng)?;
        }
        let (state, clbits) = engine.into_parts();
        Ok(SimulationResult::new(state, clbits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::engine::{gate_matrix, SimulationEngine, MAX_SIMULATED_QUBITS};
    use crate::circuits::CircuitBuilder;
    use crate::core::{Control, QubitId, StateVector};
    use crate::operations::{GateKind, Operation};
    use num_complex::Complex;
    use std::f64::consts::FRAC_1_SQRT_2;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn q(i: usize) -> QubitId {
        QubitId(i)
    }

    fn assert_complex_vec_approx_equal(actual: &[Complex<f64>], expected: &[Complex<f64>], context: &str) {
        assert_eq!(actual.len(), expected.len(), "Vector length mismatch - {}", context);
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            let dist_sq = (a - e).norm_sqr();
            assert!(
                dist_sq < TEST_TOLERANCE * TEST_TOLERANCE,
                "Vector mismatch at index {} - Actual: {}, Expected: {}, Context: {}",
                i, a, e, context
            );
        }
    }

    #[test]
    fn hadamard_then_cx_prepares_bell_state() -> Result<(), EccError> {
        let mut engine = SimulationEngine::init(2, 0)?;
        let mut rng = StdRng::seed_from_u64(1);
        engine.apply_operation(&Operation::gate(GateKind::H, q(0)), &mut rng)?;
        engine.apply_operation(&Operation::controlled(GateKind::X, q(1), vec![Control::pos(q(0))]), &mut rng)?;

        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        let zero = Complex::new(0.0, 0.0);
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &[h, zero, zero, h], "bell state");
        Ok(())
    }

    #[test]
    fn bell_measurements_agree() -> Result<(), EccError> {
        let circuit = CircuitBuilder::new()
            .qubits(2)
            .classical_register("c", 2)
            .h(q(0))
            .cx(q(0), q(1))
            .measure(q(0), 0)
            .measure(q(1), 1)
            .build()?;
        let counts = Simulator::with_seed(7).counts(&circuit, ClassicalWindow::new(0, 2), 200)?;
        assert!(counts.keys().all(|value| *value == 0 || *value == 3));
        assert!(counts.get(&0).copied().unwrap_or(0) > 50);
        assert!(counts.get(&3).copied().unwrap_or(0) > 50);
        Ok(())
    }

    #[test]
    fn negative_control_fires_on_zero() -> Result<(), EccError> {
        let circuit = CircuitBuilder::new()
            .qubits(2)
            .classical_register("c", 1)
            .controlled(GateKind::X, q(1), vec![Control::neg(q(0))])
            .measure(q(1), 0)
            .build()?;
        let result = Simulator::new().run(&circuit)?;
        assert_eq!(result.bit(0), Some(true));
        Ok(())
    }

    #[test]
    fn classic_control_reads_little_endian_window() -> Result<(), EccError> {
        let window = ClassicalWindow::new(0, 2);
        let circuit = CircuitBuilder::new()
            .qubits(3)
            .classical_register("c", 3)
            .x(q(1))
            .measure(q(0), 0)
            .measure(q(1), 1)
            .classic_controlled(GateKind::X, q(2), window, 2)
            .measure(q(2), 2)
            .build()?;
        let result = Simulator::new().run(&circuit)?;
        assert_eq!(result.value(window), 2);
        assert_eq!(result.bit(2), Some(true));
        Ok(())
    }

    #[test]
    fn reset_returns_qubit_to_zero() -> Result<(), EccError> {
        let circuit = CircuitBuilder::new()
            .qubits(1)
            .classical_register("c", 1)
            .h(q(0))
            .reset(q(0))
            .measure(q(0), 0)
            .build()?;
        for seed in 0..16 {
            let result = Simulator::with_seed(seed).run(&circuit)?;
            assert_eq!(result.bit(0), Some(false));
            assert!(result.probability(0, false)? > 1.0 - TEST_TOLERANCE);
        }
        Ok(())
    }

    #[test]
    fn same_seed_same_outcomes() -> Result<(), EccError> {
        let circuit = CircuitBuilder::new()
            .qubits(4)
            .classical_register("c", 4)
            .h(q(0))
            .h(q(1))
            .h(q(2))
            .h(q(3))
            .measure(q(0), 0)
            .measure(q(1), 1)
            .measure(q(2), 2)
            .measure(q(3), 3)
            .build()?;
        let sim = Simulator::with_seed(42);
        assert_eq!(sim.run(&circuit)?, sim.run(&circuit)?);
        Ok(())
    }

    #[test]
    fn collapse_keeps_state_normalized() -> Result<(), EccError> {
        let mut engine = SimulationEngine::init(1, 1)?;
        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        engine.set_state(StateVector::from_amplitudes(vec![h, h]))?;
        let mut rng = StdRng::seed_from_u64(3);
        engine.apply_operation(&Operation::Measure { qubit: q(0), bit: 0 }, &mut rng)?;
        let outcome = engine.clbits()[0];
        let p = engine.state().probability_one(0);
        assert!((p - if outcome { 1.0 } else { 0.0 }).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn oversized_circuit_is_rejected() {
        assert!(matches!(
            SimulationEngine::init(MAX_SIMULATED_QUBITS + 1, 0),
            Err(EccError::SimulationError { .. })
        ));
    }

    #[test]
    fn y_matrix_is_i_times_xz() {
        let y = gate_matrix(GateKind::Y);
        assert_eq!(y[0][1], Complex::new(0.0, -1.0));
        assert_eq!(y[1][0], Complex::new(0.0, 1.0));
    }

    #[test]
    fn counts_reject_window_outside_circuit() -> Result<(), EccError> {
        let circuit = CircuitBuilder::new().qubits(1).classical_register("c", 1).build()?;
        assert!(Simulator::new().counts(&circuit, ClassicalWindow::new(0, 2), 1).is_err());
        Ok(())
    }
}
