// src/core/state.rs

use num_complex::Complex;
use std::fmt;

/// Amplitudes of an n-qubit register in the computational basis.
///
/// Qubit `q` is bit `q` of the basis index, so qubit 0 is the least
/// significant bit.
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct StateVector {
    amplitudes: Vec<Complex<f64>>,
}

impl StateVector {
    /// The all-zero basis state |0...0⟩ over `num_qubits` qubits.
    pub(crate) fn zero(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex::new(0.0, 0.0); 1usize << num_qubits];
        amplitudes[0] = Complex::new(1.0, 0.0);
        Self { amplitudes }
    }

    #[cfg(test)]
    pub(crate) fn from_amplitudes(amplitudes: Vec<Complex<f64>>) -> Self {
        Self { amplitudes }
    }

    /// Provides read-only access to the amplitudes.
    pub fn amplitudes(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.amplitudes
    }

    /// Number of basis states (2^n).
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Probability of reading |1⟩ on `qubit`.
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = 1usize << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(k, _)| k & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[")?;
        let mut first = true;
        for (k, c) in self.amplitudes.iter().enumerate() {
            if c.norm_sqr() < 1e-12 {
                continue;
            }
            write!(f, "{}{:.4}|{:b}⟩", if first { "" } else { ", " }, c, k)?;
            first = false;
        }
        write!(f, "]")
    }
}
