// src/ecc/engine.rs

use super::config::check_measure_frequency;
use super::{Code, EccConfig, Mapping};
use crate::circuits::Circuit;
use crate::core::EccError;
use crate::operations::Operation;
use tracing::{debug, trace};

/// Injects one code into circuits.
///
/// The engine makes a single forward pass over the original operations.
/// Before each one it asks the code whether the operation needs encoded
/// qubits (then encodes) or decoded ones (then corrects and decodes), maps
/// it, and forces a syndrome extraction every `measure_frequency` mapped
/// operations. Whatever is still encoded at the end is corrected and
/// decoded.
///
/// ```
/// use qecc::{CircuitBuilder, Ecc, EccConfig, CodeKind, QubitId};
///
/// let original = CircuitBuilder::new()
///     .qubits(1)
///     .classical_register("c", 1)
///     .x(QubitId(0))
///     .measure(QubitId(0), 0)
///     .build()?;
///
/// let ecc = Ecc::from_config(&EccConfig::default().with_code(CodeKind::Q9Shor))?;
/// let mapped = ecc.apply(&original)?;
/// assert_eq!(mapped.num_qubits(), 9 + 8);
/// assert_eq!(mapped.num_clbits(), 1 + 8);
/// # Ok::<(), qecc::EccError>(())
/// ```
pub struct Ecc {
    code: Box<dyn Code>,
    measure_frequency: usize,
}

impl Ecc {
    /// Wraps `code`, rejecting a zero `measure_frequency` or an
    /// inconsistent code descriptor.
    pub fn new(code: Box<dyn Code>, measure_frequency: usize) -> Result<Self, EccError> {
        check_measure_frequency(measure_frequency)?;
        code.descriptor().validate()?;
        Ok(Self { code, measure_frequency })
    }

    pub fn from_config(config: &EccConfig) -> Result<Self, EccError> {
        Self::new(config.code.build(), config.measure_frequency)
    }

    pub fn code(&self) -> &dyn Code {
        self.code.as_ref()
    }

    pub fn measure_frequency(&self) -> usize {
        self.measure_frequency
    }

    /// Produces the protected version of `original`.
    ///
    /// # Errors
    /// `UnsupportedGate` if the code cannot express one of the operations;
    /// no partial circuit is returned.
    pub fn apply(&self, original: &Circuit) -> Result<Circuit, EccError> {
        let descriptor = self.code.descriptor();
        debug!(
            code = descriptor.name,
            logical_qubits = original.num_qubits(),
            operations = original.len(),
            measure_frequency = self.measure_frequency,
            "injecting code"
        );

        let mut ctx = Mapping::new(original, descriptor)?;
        let mut since_sync = 0usize;
        for op in original.operations() {
            self.step(op, &mut ctx, &mut since_sync)?;
        }
        self.code.measure_and_correct(&mut ctx)?;
        self.code.write_decoding(&mut ctx)?;

        let mapped = ctx.into_circuit();
        debug!(
            code = descriptor.name,
            physical_qubits = mapped.num_qubits(),
            operations = mapped.len(),
            "code injected"
        );
        Ok(mapped)
    }

    /// Maps one original operation. `since_sync` counts operations mapped
    /// since the last syndrome extraction and never exceeds the frequency.
    fn step(&self, op: &Operation, ctx: &mut Mapping, since_sync: &mut usize) -> Result<(), EccError> {
        trace!(operation = %op, "mapping");
        if ctx.state().is_decoded() && self.code.needs_encoding(op) {
            self.code.write_encoding(ctx)?;
        }
        if ctx.state().is_encoded() && self.code.needs_decoding(op) {
            self.code.measure_and_correct(ctx)?;
            self.code.write_decoding(ctx)?;
            *since_sync = 0;
        }

        self.code.map_gate(op, ctx)?;

        *since_sync += 1;
        if *since_sync >= self.measure_frequency {
            debug!(after = *since_sync, "forcing syndrome extraction");
            self.code.measure_and_correct(ctx)?;
            *since_sync = 0;
        }
        Ok(())
    }
}
