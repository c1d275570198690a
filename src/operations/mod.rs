// src/operations/mod.rs

//! Defines the gate-level operations a circuit is made of.
//!
//! Each `Operation` variant carries only the fields that make sense for it,
//! so a measurement's classical bit or a classically controlled gate's
//! trigger value can never be read off the wrong kind of operation.

use crate::core::{ClassicalWindow, Control, QubitId};
use std::fmt;

/// The single-qubit unitaries an operation can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GateKind {
    /// Identity.
    I,
    /// Hadamard.
    H,
    /// Pauli X (bit flip).
    X,
    /// Pauli Y.
    Y,
    /// Pauli Z (phase flip).
    Z,
    /// Phase gate, diag(1, i).
    S,
    /// Inverse phase gate, diag(1, -i).
    Sdg,
    /// π/8 gate, diag(1, e^(iπ/4)).
    T,
    /// Inverse π/8 gate.
    Tdg,
}

impl GateKind {
    /// Short mnemonic of the gate.
    pub fn name(self) -> &'static str {
        match self {
            GateKind::I => "I",
            GateKind::H => "H",
            GateKind::X => "X",
            GateKind::Y => "Y",
            GateKind::Z => "Z",
            GateKind::S => "S",
            GateKind::Sdg => "Sdg",
            GateKind::T => "T",
            GateKind::Tdg => "Tdg",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One step of a circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// A (possibly controlled) single-target unitary.
    Unitary {
        kind: GateKind,
        target: QubitId,
        /// Control points; qubits are unique and never equal to `target`.
        controls: Vec<Control>,
    },

    /// Computational-basis measurement of `qubit` into classical bit `bit`.
    Measure { qubit: QubitId, bit: usize },

    /// Returns `qubit` to |0⟩.
    Reset { qubit: QubitId },

    /// Applies `kind` to `target` when the value of `window` equals `expected`.
    ClassicControlled {
        kind: GateKind,
        target: QubitId,
        window: ClassicalWindow,
        expected: u64,
    },

    /// Scheduling fence over `qubits`; acts as the identity.
    Barrier { qubits: Vec<QubitId> },
}

impl Operation {
    /// An uncontrolled unitary.
    pub fn gate(kind: GateKind, target: QubitId) -> Self {
        Operation::Unitary { kind, target, controls: Vec::new() }
    }

    /// A unitary with the given control points.
    pub fn controlled(kind: GateKind, target: QubitId, controls: Vec<Control>) -> Self {
        Operation::Unitary { kind, target, controls }
    }

    /// Gate name used in diagnostics, e.g. `X`, `cX`, `measure`.
    pub fn name(&self) -> String {
        match self {
            Operation::Unitary { kind, controls, .. } => {
                format!("{}{}", "c".repeat(controls.len()), kind)
            }
            Operation::Measure { .. } => "measure".to_string(),
            Operation::Reset { .. } => "reset".to_string(),
            Operation::ClassicControlled { kind, .. } => format!("classic-controlled {}", kind),
            Operation::Barrier { .. } => "barrier".to_string(),
        }
    }

    /// Primary qubit the operation acts on, if it has exactly one.
    pub fn target(&self) -> Option<QubitId> {
        match self {
            Operation::Unitary { target, .. } | Operation::ClassicControlled { target, .. } => Some(*target),
            Operation::Measure { qubit, .. } | Operation::Reset { qubit } => Some(*qubit),
            Operation::Barrier { .. } => None,
        }
    }

    /// Returns every qubit mentioned by the operation.
    pub fn involved_qubits(&self) -> Vec<QubitId> {
        match self {
            Operation::Unitary { target, controls, .. } => {
                controls.iter().map(|c| c.qubit).chain(std::iter::once(*target)).collect()
            }
            Operation::Measure { qubit, .. } | Operation::Reset { qubit } => vec![*qubit],
            Operation::ClassicControlled { target, .. } => vec![*target],
            Operation::Barrier { qubits } => qubits.clone(),
        }
    }

    pub fn is_measurement(&self) -> bool {
        matches!(self, Operation::Measure { .. })
    }

    /// Whether this is an uncontrolled or controlled unitary of `kind`.
    pub fn is_unitary_of(&self, kind: GateKind) -> bool {
        matches!(self, Operation::Unitary { kind: k, .. } if *k == kind)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Unitary { kind, target, controls } if controls.is_empty() => {
                write!(f, "{} {}", kind, target)
            }
            Operation::Unitary { kind, target, controls } => {
                let ctrls: Vec<String> = controls.iter().map(|c| c.to_string()).collect();
                write!(f, "{} {} ctrl[{}]", kind, target, ctrls.join(", "))
            }
            Operation::Measure { qubit, bit } => write!(f, "measure {} -> c{}", qubit, bit),
            Operation::Reset { qubit } => write!(f, "reset {}", qubit),
            Operation::ClassicControlled { kind, target, window, expected } => {
                write!(f, "if {} == {} {} {}", window, expected, kind, target)
            }
            Operation::Barrier { qubits } => {
                let qs: Vec<String> = qubits.iter().map(|q| q.to_string()).collect();
                write!(f, "barrier {}", qs.join(", "))
            }
        }
    }
}
