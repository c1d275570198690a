//! Error handling logic

use std::fmt;

/// Index of a qubit inside a circuit.
///
/// In a mapped circuit the index addresses a physical qubit; in the input
/// circuit it addresses a logical one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub usize);

impl QubitId {
    /// Raw index of the qubit.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Failures raised while building circuits, injecting a code or simulating.
///
/// None of them are retryable: each one describes a structural mismatch
/// between the input and what the selected code or simulator can express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EccError {
    /// The active code has no transversal realization for a gate.
    UnsupportedGate {
        /// Name of the code that rejected the gate.
        code: String,
        /// Gate name as rendered by the operation.
        gate: String,
        /// Logical qubit the gate targets, when it has one.
        qubit: Option<QubitId>,
    },

    /// An operation does not have the shape its variant requires
    /// (e.g. a control that is also the target).
    MalformedGate {
        /// MalformedGate failure message
        message: String,
    },

    /// Invalid transform configuration, rejected before any gate is mapped.
    Configuration {
        /// Configuration failure message
        message: String,
    },

    /// A qubit, classical bit or register outside the circuit's declared range.
    ReferenceViolation {
        /// ReferenceViolation failure message
        message: String,
    },

    /// General error encountered during the simulation process itself.
    SimulationError {
        /// SimulationError failure message
        message: String,
    },
}

impl fmt::Display for EccError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EccError::UnsupportedGate { code, gate, qubit: Some(q) } => {
                write!(f, "Gate not available: {} on {} is not supported by {}", gate, q, code)
            }
            EccError::UnsupportedGate { code, gate, qubit: None } => {
                write!(f, "Gate not available: {} is not supported by {}", gate, code)
            }
            EccError::MalformedGate { message } => write!(f, "Malformed Gate: {}", message),
            EccError::Configuration { message } => write!(f, "Configuration Error: {}", message),
            EccError::ReferenceViolation { message } => write!(f, "Reference Violation: {}", message),
            EccError::SimulationError { message } => write!(f, "Simulation Process Error: {}", message),
        }
    }
}

impl std::error::Error for EccError {}
