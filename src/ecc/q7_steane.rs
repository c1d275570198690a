// src/ecc/q7_steane.rs

//! Steane's 7-qubit CSS code.
//!
//! Replica `q` sits at Hamming position `q + 1`; check `c` covers the
//! replicas whose position has bit `c` set. Both X-type and Z-type checks
//! use the same three supports, so the two syndromes are extracted by two
//! independent passes with their own registers.

use super::{gate_not_available, write_barrier, write_transversal, Code, CodeDescriptor, Mapping};
use crate::core::{ClassicalWindow, EccError, QubitId};
use crate::operations::{GateKind, Operation};

const DESCRIPTOR: CodeDescriptor = CodeDescriptor {
    name: "Q7Steane",
    redundancy: 7,
    correcting_bits: 3,
    ancillas: 3,
    registers: &[("qecc_x", 3), ("qecc_z", 3)],
};

/// Syndrome value → replica to correct. A single error on replica `q`
/// trips exactly the checks whose bit is set in `q + 1`.
const SYNDROME_CORRECTIONS: [(u64, usize); 7] = [(1, 0), (2, 1), (3, 2), (4, 3), (5, 4), (6, 5), (7, 6)];

/// Replicas receiving the logical bit from replica 0 (positions 2 and 3).
const LOGICAL_X_SUPPORT: [usize; 2] = [1, 2];

/// Stabilizer generators used by the encoder: a pivot replica put in |+⟩
/// and the replicas it fans out to. The pivots are touched by no other
/// generator, and none of them is in the logical-X support.
const ENCODING_FANOUT: [(usize, [usize; 3]); 3] = [(5, [0, 2, 3]), (4, [1, 2, 3]), (6, [0, 1, 3])];

/// Which kind of check a syndrome pass measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Syndrome {
    /// X-type checks; detect phase flips.
    X,
    /// Z-type checks; detect bit flips.
    Z,
}

impl Syndrome {
    /// Gate coupling a check ancilla in |+⟩ to a covered replica.
    fn probe(self) -> GateKind {
        match self {
            Syndrome::X => GateKind::X,
            Syndrome::Z => GateKind::Z,
        }
    }

    /// Gate undoing the error this pass detects.
    fn correction(self) -> GateKind {
        match self {
            Syndrome::X => GateKind::Z,
            Syndrome::Z => GateKind::X,
        }
    }
}

/// Steane's [[7,1,3]] code.
#[derive(Debug, Clone, Copy, Default)]
pub struct Q7Steane;

impl Q7Steane {
    pub fn new() -> Self {
        Self
    }

    fn windows(ctx: &Mapping) -> Result<(ClassicalWindow, ClassicalWindow), EccError> {
        match *ctx.layout().syndrome_windows() {
            [x, z] => Ok((x, z)),
            _ => Err(EccError::ReferenceViolation {
                message: format!("{} expects an X and a Z syndrome register", DESCRIPTOR.name),
            }),
        }
    }

    fn measure_and_correct_single(
        &self,
        ctx: &mut Mapping,
        syndrome: Syndrome,
        window: ClassicalWindow,
    ) -> Result<(), EccError> {
        for i in ctx.layout().logical() {
            let qubits: Vec<QubitId> = ctx.layout().replicas(i).collect();
            let ancillas: Vec<QubitId> = (0..DESCRIPTOR.ancillas).map(|c| ctx.layout().ancilla(c)).collect();

            for &a in &ancillas {
                ctx.reset(a)?;
                ctx.gate(GateKind::H, a)?;
            }
            for (c, &a) in ancillas.iter().enumerate() {
                for (q, &target) in qubits.iter().enumerate() {
                    if (q + 1) & (1 << c) != 0 {
                        ctx.controlled_by(syndrome.probe(), target, a)?;
                    }
                }
            }
            for &a in &ancillas {
                ctx.gate(GateKind::H, a)?;
            }
            for (c, &a) in ancillas.iter().enumerate() {
                ctx.measure(a, window.start + c)?;
            }
            for (value, replica) in SYNDROME_CORRECTIONS {
                ctx.classic_controlled(syndrome.correction(), qubits[replica], window, value)?;
            }
        }
        Ok(())
    }

    fn mapped_kind(&self, op: &Operation, kind: GateKind) -> Result<GateKind, EccError> {
        match kind {
            GateKind::I | GateKind::H | GateKind::X | GateKind::Y | GateKind::Z => Ok(kind),
            // transversal S is the logical inverse phase
            GateKind::S => Ok(GateKind::Sdg),
            GateKind::Sdg => Ok(GateKind::S),
            GateKind::T | GateKind::Tdg => Err(gate_not_available(self, op)),
        }
    }
}

impl Code for Q7Steane {
    fn descriptor(&self) -> &CodeDescriptor {
        &DESCRIPTOR
    }

    fn encode(&self, ctx: &mut Mapping) -> Result<(), EccError> {
        for i in ctx.layout().logical() {
            let q: Vec<QubitId> = ctx.layout().replicas(i).collect();
            for r in LOGICAL_X_SUPPORT {
                ctx.controlled_by(GateKind::X, q[r], q[0])?;
            }
            for (pivot, _) in ENCODING_FANOUT {
                ctx.gate(GateKind::H, q[pivot])?;
            }
            for (pivot, targets) in ENCODING_FANOUT {
                for t in targets {
                    ctx.controlled_by(GateKind::X, q[t], q[pivot])?;
                }
            }
        }
        Ok(())
    }

    fn extract_and_correct(&self, ctx: &mut Mapping) -> Result<(), EccError> {
        let (x_window, z_window) = Self::windows(ctx)?;
        self.measure_and_correct_single(ctx, Syndrome::X, x_window)?;
        self.measure_and_correct_single(ctx, Syndrome::Z, z_window)
    }

    /// The encoder run backwards. Every gate it uses is self-inverse, so
    /// replicas 1..6 return to |0⟩ and replica 0 keeps the logical state.
    fn decode(&self, ctx: &mut Mapping) -> Result<(), EccError> {
        for i in ctx.layout().logical() {
            let q: Vec<QubitId> = ctx.layout().replicas(i).collect();
            for (pivot, targets) in ENCODING_FANOUT.into_iter().rev() {
                for t in targets.into_iter().rev() {
                    ctx.controlled_by(GateKind::X, q[t], q[pivot])?;
                }
            }
            for (pivot, _) in ENCODING_FANOUT.into_iter().rev() {
                ctx.gate(GateKind::H, q[pivot])?;
            }
            for r in LOGICAL_X_SUPPORT.into_iter().rev() {
                ctx.controlled_by(GateKind::X, q[r], q[0])?;
            }
        }
        Ok(())
    }

    fn map_gate(&self, op: &Operation, ctx: &mut Mapping) -> Result<(), EccError> {
        match op {
            Operation::Barrier { qubits } => write_barrier(ctx, qubits),
            Operation::Measure { qubit, bit } => {
                let representative = ctx.layout().physical(*qubit, 0);
                ctx.measure(representative, *bit)
            }
            Operation::Unitary { kind, target, controls } => {
                let mapped = self.mapped_kind(op, *kind)?;
                write_transversal(ctx, mapped, *target, controls, self.control_basis())
            }
            Operation::Reset { .. } | Operation::ClassicControlled { .. } => Err(gate_not_available(self, op)),
        }
    }
}
