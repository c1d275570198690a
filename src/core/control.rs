// src/core/control.rs

use super::error::QubitId;
use std::fmt;

/// Which basis value of a control qubit fires the controlled gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Polarity {
    /// Fires when the control is |1⟩.
    Positive,
    /// Fires when the control is |0⟩.
    Negative,
}

/// A control point of a gate: a qubit plus the value it must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Control {
    /// The qubit read by the control.
    pub qubit: QubitId,
    /// The value the qubit must hold for the gate to fire.
    pub polarity: Polarity,
}

impl Control {
    /// A control firing on |1⟩.
    pub fn pos(qubit: QubitId) -> Self {
        Self { qubit, polarity: Polarity::Positive }
    }

    /// A control firing on |0⟩.
    pub fn neg(qubit: QubitId) -> Self {
        Self { qubit, polarity: Polarity::Negative }
    }

    /// Same polarity, different qubit.
    pub fn moved_to(self, qubit: QubitId) -> Self {
        Self { qubit, polarity: self.polarity }
    }

    /// Whether a basis bit value satisfies this control.
    pub fn is_satisfied_by(&self, bit: bool) -> bool {
        match self.polarity {
            Polarity::Positive => bit,
            Polarity::Negative => !bit,
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.polarity {
            Polarity::Positive => write!(f, "{}", self.qubit),
            Polarity::Negative => write!(f, "!{}", self.qubit),
        }
    }
}
