// src/ecc/mod.rs

//! Error-correcting code injection.
//!
//! An [`Ecc`] engine walks the gate stream of a logical circuit once and
//! asks a [`Code`] to rewrite it over physical qubits: encode the logical
//! state into codewords, map every gate onto the replicas, periodically
//! extract a syndrome and correct, and decode before measurements and at the
//! end of the stream.
//!
//! Logical qubit `i` of an `N`-qubit circuit occupies the physical qubits
//! `i, i + N, ..., i + (r - 1)N` for a code of redundancy `r`; the code's
//! ancillas follow at `r·N`.

mod config;
mod engine;
mod mapping;
mod q7_steane;
mod q9_shor;

pub use config::{CodeKind, EccConfig, DEFAULT_MEASURE_FREQUENCY};
pub use engine::Ecc;
pub use mapping::{CodeState, Layout, Mapping};
pub use q7_steane::Q7Steane;
pub use q9_shor::Q9Shor;

use crate::core::{Control, EccError, QubitId};
use crate::operations::{GateKind, Operation};
use tracing::trace;

/// Static parameters of a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeDescriptor {
    /// Human-readable code name, also accepted by [`CodeKind`]'s `FromStr`.
    pub name: &'static str,
    /// Physical qubits per logical qubit.
    pub redundancy: usize,
    /// Classical bits written by one syndrome extraction pass.
    pub correcting_bits: usize,
    /// Ancilla qubits shared by all logical qubits.
    pub ancillas: usize,
    /// Classical registers appended after the original circuit's bits.
    pub registers: &'static [(&'static str, usize)],
}

impl CodeDescriptor {
    /// Physical qubits needed to protect `logical_qubits`.
    pub fn output_qubits(&self, logical_qubits: usize) -> usize {
        self.redundancy * logical_qubits + self.ancillas
    }

    /// Classical bits added on top of the original circuit's.
    pub fn syndrome_bits(&self) -> usize {
        self.registers.iter().map(|(_, width)| width).sum()
    }

    /// Checks that every syndrome register holds exactly one pass, i.e. one
    /// bit per ancilla.
    ///
    /// # Errors
    /// `Configuration` naming the code and the first mismatch.
    pub fn validate(&self) -> Result<(), EccError> {
        let mismatch = |message: String| EccError::Configuration {
            message: format!("{}: {}", self.name, message),
        };
        if self.redundancy == 0 {
            return Err(mismatch("redundancy must be positive".to_string()));
        }
        if self.registers.is_empty() {
            return Err(mismatch("no syndrome register".to_string()));
        }
        if self.ancillas != self.correcting_bits {
            return Err(mismatch(format!(
                "{} ancillas cannot fill {} correcting bits",
                self.ancillas, self.correcting_bits
            )));
        }
        if let Some((name, width)) = self.registers.iter().find(|(_, width)| *width != self.correcting_bits) {
            return Err(mismatch(format!(
                "register '{}' has {} bits, one pass writes {}",
                name, width, self.correcting_bits
            )));
        }
        Ok(())
    }
}

/// A quantum error-correcting code that can be injected into a circuit.
///
/// Implementors provide the raw circuit writers (`encode`,
/// `extract_and_correct`, `decode`, `map_gate`) and the per-code policies.
/// The engine only calls the state-guarded `write_encoding`,
/// `measure_and_correct` and `write_decoding`, which turn calls made in the
/// wrong state into no-ops.
pub trait Code {
    fn descriptor(&self) -> &CodeDescriptor;

    /// Whether `op` must see encoded qubits; checked while decoded.
    fn needs_encoding(&self, op: &Operation) -> bool {
        !op.is_measurement()
    }

    /// Whether the encoded state must be corrected and decoded before `op`.
    fn needs_decoding(&self, op: &Operation) -> bool {
        op.is_measurement()
    }

    /// Gate wrapped around every physical control of a mapped controlled gate.
    fn control_basis(&self) -> Option<GateKind> {
        Some(GateKind::H)
    }

    /// Writes the encoding circuit for every logical qubit.
    fn encode(&self, ctx: &mut Mapping) -> Result<(), EccError>;

    /// Writes syndrome extraction and the classically controlled corrections.
    fn extract_and_correct(&self, ctx: &mut Mapping) -> Result<(), EccError>;

    /// Writes the decoding circuit, leaving each logical state on replica 0.
    fn decode(&self, ctx: &mut Mapping) -> Result<(), EccError>;

    /// Writes the physical equivalent of one original operation.
    ///
    /// Measurements are expected to arrive decoded; the engine arranges that.
    fn map_gate(&self, op: &Operation, ctx: &mut Mapping) -> Result<(), EccError>;

    /// Decoded → Encoded. No-op if already encoded.
    fn write_encoding(&self, ctx: &mut Mapping) -> Result<(), EccError> {
        if ctx.state().is_encoded() {
            return Ok(());
        }
        trace!(code = self.descriptor().name, "writing encoding");
        self.encode(ctx)?;
        ctx.set_encoded(true);
        Ok(())
    }

    /// Syndrome extraction and correction. No-op while decoded.
    fn measure_and_correct(&self, ctx: &mut Mapping) -> Result<(), EccError> {
        if ctx.state().is_decoded() {
            return Ok(());
        }
        trace!(code = self.descriptor().name, "extracting syndrome");
        self.extract_and_correct(ctx)
    }

    /// Encoded → Decoded. No-op if already decoded.
    fn write_decoding(&self, ctx: &mut Mapping) -> Result<(), EccError> {
        if ctx.state().is_decoded() {
            return Ok(());
        }
        trace!(code = self.descriptor().name, "writing decoding");
        self.decode(ctx)?;
        ctx.set_encoded(false);
        Ok(())
    }
}

/// The error every code raises for a gate outside its translation table.
pub(crate) fn gate_not_available(code: &dyn Code, op: &Operation) -> EccError {
    EccError::UnsupportedGate {
        code: code.descriptor().name.to_string(),
        gate: op.name(),
        qubit: op.target(),
    }
}

/// Applies `kind` to every replica of `target`, each replica controlled by
/// the matching replicas of `controls` (polarity kept). With a `basis`
/// gate, every physical control is sandwiched by it.
pub(crate) fn write_transversal(
    ctx: &mut Mapping,
    kind: GateKind,
    target: QubitId,
    controls: &[Control],
    basis: Option<GateKind>,
) -> Result<(), EccError> {
    for replica in 0..ctx.layout().redundancy() {
        let physical_target = ctx.layout().physical(target, replica);
        let physical_controls: Vec<Control> = controls
            .iter()
            .map(|c| c.moved_to(ctx.layout().physical(c.qubit, replica)))
            .collect();

        if let Some(basis) = basis {
            for c in &physical_controls {
                ctx.gate(basis, c.qubit)?;
            }
        }
        ctx.push(Operation::controlled(kind, physical_target, physical_controls.clone()))?;
        if let Some(basis) = basis {
            for c in &physical_controls {
                ctx.gate(basis, c.qubit)?;
            }
        }
    }
    Ok(())
}

/// Maps a barrier onto every replica of the qubits it fences.
pub(crate) fn write_barrier(ctx: &mut Mapping, qubits: &[QubitId]) -> Result<(), EccError> {
    let physical: Vec<QubitId> = qubits.iter().flat_map(|q| ctx.layout().replicas(*q)).collect();
    ctx.push(Operation::Barrier { qubits: physical })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;

    #[test]
    fn output_sizes_follow_descriptors() -> Result<(), EccError> {
        let original = CircuitBuilder::new().qubits(2).classical_register("c", 2).build()?;
        for (code, qubits, clbits) in [(&Q9Shor as &dyn Code, 26, 10), (&Q7Steane as &dyn Code, 17, 8)] {
            let descriptor = code.descriptor();
            let ctx = Mapping::new(&original, descriptor)?;
            assert_eq!(ctx.circuit().num_qubits(), qubits);
            assert_eq!(ctx.circuit().num_clbits(), 2 + descriptor.syndrome_bits());
            assert_eq!(ctx.circuit().num_clbits(), clbits);
            assert_eq!(ctx.layout().logical_qubits(), 2);
            assert_eq!(ctx.layout().ancillas(), descriptor.ancillas);
        }
        Ok(())
    }

    #[test]
    fn built_in_descriptors_are_consistent() -> Result<(), EccError> {
        Q9Shor.descriptor().validate()?;
        Q7Steane.descriptor().validate()
    }

    #[test]
    fn register_wider_than_a_pass_is_rejected() -> Result<(), EccError> {
        const LOPSIDED: CodeDescriptor = CodeDescriptor {
            name: "Lopsided",
            redundancy: 3,
            correcting_bits: 2,
            ancillas: 2,
            registers: &[("qecc", 2), ("extra", 3)],
        };
        let original = CircuitBuilder::new().qubits(1).build()?;
        match Mapping::new(&original, &LOPSIDED) {
            Err(EccError::Configuration { message }) => {
                assert!(message.contains("Lopsided"));
                assert!(message.contains("'extra'"));
            }
            other => panic!("expected configuration error, got {:?}", other),
        }

        let starved = CodeDescriptor { ancillas: 1, ..LOPSIDED };
        assert!(matches!(starved.validate(), Err(EccError::Configuration { .. })));
        Ok(())
    }

    #[test]
    fn transversal_keeps_negative_polarity() -> Result<(), EccError> {
        let original = CircuitBuilder::new().qubits(2).build()?;
        let mut ctx = Mapping::new(&original, Q7Steane.descriptor())?;
        write_transversal(&mut ctx, GateKind::X, QubitId(1), &[Control::neg(QubitId(0))], None)?;
        let expected: Vec<Operation> = (0..7)
            .map(|r| Operation::controlled(GateKind::X, QubitId(2 * r + 1), vec![Control::neg(QubitId(2 * r))]))
            .collect();
        assert_eq!(ctx.circuit().operations(), expected.as_slice());
        Ok(())
    }
}
