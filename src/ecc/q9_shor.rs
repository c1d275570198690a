// src/ecc/q9_shor.rs

//! Shor's 9-qubit code: a phase-flip code over three bit-flip blocks.
//!
//! Replicas `3b, 3b+1, 3b+2` form block `b`; replicas 0, 3 and 6 are the
//! block leaders. Logical X is transversal Z and logical Z is transversal
//! X in this encoding, so the Pauli gates are swapped when mapped.

use super::{gate_not_available, write_barrier, write_transversal, Code, CodeDescriptor, Mapping};
use crate::core::{ClassicalWindow, Control, EccError, QubitId};
use crate::operations::{GateKind, Operation};

const DESCRIPTOR: CodeDescriptor = CodeDescriptor {
    name: "Q9Shor",
    redundancy: 9,
    correcting_bits: 8,
    ancillas: 8,
    registers: &[("qecc", 8)],
};

/// Value of a block's two bit-flip checks → offset of the flipped qubit
/// inside the block. Ancilla `2b` checks offsets {0,1}, ancilla `2b+1`
/// checks {1,2}, and the first ancilla is the low bit.
const BIT_FLIP_CORRECTIONS: [(u64, usize); 3] = [(1, 0), (2, 2), (3, 1)];

/// Value of the two phase checks → leader replica of the block whose sign
/// flipped. Ancilla 6 compares blocks 0 and 1, ancilla 7 blocks 1 and 2.
const PHASE_FLIP_CORRECTIONS: [(u64, usize); 3] = [(1, 0), (2, 6), (3, 3)];

const BLOCKS: usize = 3;

/// Shor's [[9,1,3]] code.
#[derive(Debug, Clone, Copy, Default)]
pub struct Q9Shor;

impl Q9Shor {
    pub fn new() -> Self {
        Self
    }

    fn mapped_kind(&self, op: &Operation, kind: GateKind) -> Result<GateKind, EccError> {
        match kind {
            GateKind::I => Ok(GateKind::I),
            GateKind::X => Ok(GateKind::Z),
            GateKind::Y => Ok(GateKind::Y),
            GateKind::Z => Ok(GateKind::X),
            _ => Err(gate_not_available(self, op)),
        }
    }
}

impl Code for Q9Shor {
    fn descriptor(&self) -> &CodeDescriptor {
        &DESCRIPTOR
    }

    /// Hadamards are left on decoded qubits, where the code then rejects them.
    fn needs_encoding(&self, op: &Operation) -> bool {
        !op.is_measurement() && !op.is_unitary_of(GateKind::H)
    }

    fn encode(&self, ctx: &mut Mapping) -> Result<(), EccError> {
        for i in ctx.layout().logical() {
            let leader = |b: usize| ctx.layout().physical(i, 3 * b);
            let leaders: [QubitId; BLOCKS] = [leader(0), leader(1), leader(2)];

            ctx.controlled_by(GateKind::X, leaders[1], leaders[0])?;
            ctx.controlled_by(GateKind::X, leaders[2], leaders[0])?;
            for (b, &lead) in leaders.iter().enumerate() {
                let first = ctx.layout().physical(i, 3 * b + 1);
                let second = ctx.layout().physical(i, 3 * b + 2);
                ctx.gate(GateKind::H, lead)?;
                ctx.controlled_by(GateKind::X, first, lead)?;
                ctx.controlled_by(GateKind::X, second, lead)?;
            }
        }
        Ok(())
    }

    fn extract_and_correct(&self, ctx: &mut Mapping) -> Result<(), EccError> {
        let [window] = *ctx.layout().syndrome_windows() else {
            return Err(EccError::ReferenceViolation {
                message: format!("{} expects exactly one syndrome register", DESCRIPTOR.name),
            });
        };

        for i in ctx.layout().logical() {
            let qubits: Vec<QubitId> = ctx.layout().replicas(i).collect();
            let ancillas: Vec<QubitId> = (0..DESCRIPTOR.ancillas).map(|j| ctx.layout().ancilla(j)).collect();

            for &a in &ancillas {
                ctx.reset(a)?;
            }
            for &a in &ancillas {
                ctx.gate(GateKind::H, a)?;
            }

            // bit flips, via controlled Z from ancillas in |+>
            for b in 0..BLOCKS {
                ctx.controlled_by(GateKind::Z, qubits[3 * b], ancillas[2 * b])?;
                ctx.controlled_by(GateKind::Z, qubits[3 * b + 1], ancillas[2 * b])?;
                ctx.controlled_by(GateKind::Z, qubits[3 * b + 1], ancillas[2 * b + 1])?;
                ctx.controlled_by(GateKind::Z, qubits[3 * b + 2], ancillas[2 * b + 1])?;
            }

            // phase flips, via controlled X across two blocks at a time
            for j in 0..6 {
                ctx.controlled_by(GateKind::X, qubits[j], ancillas[6])?;
                ctx.controlled_by(GateKind::X, qubits[3 + j], ancillas[7])?;
            }

            for &a in &ancillas {
                ctx.gate(GateKind::H, a)?;
            }
            for (j, &a) in ancillas.iter().enumerate() {
                ctx.measure(a, window.start + j)?;
            }

            for b in 0..BLOCKS {
                let checks = ClassicalWindow::new(window.start + 2 * b, 2);
                for (value, offset) in BIT_FLIP_CORRECTIONS {
                    ctx.classic_controlled(GateKind::X, qubits[3 * b + offset], checks, value)?;
                }
            }
            let checks = ClassicalWindow::new(window.start + 6, 2);
            for (value, replica) in PHASE_FLIP_CORRECTIONS {
                ctx.classic_controlled(GateKind::Z, qubits[replica], checks, value)?;
            }
        }
        Ok(())
    }

    fn decode(&self, ctx: &mut Mapping) -> Result<(), EccError> {
        for i in ctx.layout().logical() {
            let q: Vec<QubitId> = ctx.layout().replicas(i).collect();

            for b in 0..BLOCKS {
                let (lead, first, second) = (q[3 * b], q[3 * b + 1], q[3 * b + 2]);
                ctx.controlled_by(GateKind::X, first, lead)?;
                ctx.controlled_by(GateKind::X, second, lead)?;
                ctx.push(Operation::controlled(
                    GateKind::X,
                    lead,
                    vec![Control::pos(first), Control::pos(second)],
                ))?;
                ctx.gate(GateKind::H, lead)?;
            }

            ctx.controlled_by(GateKind::X, q[3], q[0])?;
            ctx.controlled_by(GateKind::X, q[6], q[0])?;
            ctx.push(Operation::controlled(GateKind::X, q[0], vec![Control::pos(q[3]), Control::pos(q[6])]))?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;
    use crate::ecc::CodeState;

    fn single_qubit_mapping(state: CodeState) -> Result<Mapping, EccError> {
        let original = CircuitBuilder::new().qubits(1).classical_register("c", 1).build()?;
        Mapping::with_state(&original, &DESCRIPTOR, state)
    }

    #[test]
    fn encoding_entangles_leaders_then_blocks() -> Result<(), EccError> {
        let mut ctx = single_qubit_mapping(CodeState::decoded())?;
        Q9Shor.write_encoding(&mut ctx)?;
        let cx = |t: usize, c: usize| Operation::controlled(GateKind::X, QubitId(t), vec![Control::pos(QubitId(c))]);
        let h = |q: usize| Operation::gate(GateKind::H, QubitId(q));
        let expected = vec![
            cx(3, 0), cx(6, 0),
            h(0), cx(1, 0), cx(2, 0),
            h(3), cx(4, 3), cx(5, 3),
            h(6), cx(7, 6), cx(8, 6),
        ];
        assert_eq!(ctx.circuit().operations(), expected.as_slice());
        assert!(ctx.state().is_encoded());
        Ok(())
    }

    #[test]
    fn corrections_use_asymmetric_trigger_order() -> Result<(), EccError> {
        let mut ctx = single_qubit_mapping(CodeState::encoded())?;
        Q9Shor.measure_and_correct(&mut ctx)?;
        let corrections: Vec<(GateKind, usize, usize, u64)> = ctx
            .circuit()
            .operations()
            .iter()
            .filter_map(|op| match op {
                Operation::ClassicControlled { kind, target, window, expected } => {
                    Some((*kind, target.index(), window.start, *expected))
                }
                _ => None,
            })
            .collect();
        // syndrome bits start after the single original bit
        assert_eq!(
            corrections,
            vec![
                (GateKind::X, 0, 1, 1), (GateKind::X, 2, 1, 2), (GateKind::X, 1, 1, 3),
                (GateKind::X, 3, 3, 1), (GateKind::X, 5, 3, 2), (GateKind::X, 4, 3, 3),
                (GateKind::X, 6, 5, 1), (GateKind::X, 8, 5, 2), (GateKind::X, 7, 5, 3),
                (GateKind::Z, 0, 7, 1), (GateKind::Z, 6, 7, 2), (GateKind::Z, 3, 7, 3),
            ]
        );
        Ok(())
    }

    #[test]
    fn pauli_frame_is_swapped() -> Result<(), EccError> {
        for (logical, physical) in [(GateKind::X, GateKind::Z), (GateKind::Y, GateKind::Y), (GateKind::Z, GateKind::X)] {
            let mut ctx = single_qubit_mapping(CodeState::encoded())?;
            Q9Shor.map_gate(&Operation::gate(logical, QubitId(0)), &mut ctx)?;
            let expected: Vec<Operation> = (0..9).map(|q| Operation::gate(physical, QubitId(q))).collect();
            assert_eq!(ctx.circuit().operations(), expected.as_slice());
        }
        Ok(())
    }

    #[test]
    fn hadamard_does_not_force_encoding() {
        assert!(!Q9Shor.needs_encoding(&Operation::gate(GateKind::H, QubitId(0))));
        assert!(!Q9Shor.needs_encoding(&Operation::Measure { qubit: QubitId(0), bit: 0 }));
        assert!(Q9Shor.needs_encoding(&Operation::gate(GateKind::X, QubitId(0))));
    }
}
