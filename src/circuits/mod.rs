// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! operations (`qecc::operations::Operation`).
//!
//! A `Circuit` owns a fixed number of qubits, a classical bit array split
//! into named registers, and the ordered operation list. Registers are
//! declared up front; once the first operation is appended the circuit's
//! shape is frozen and only appends are possible.

use crate::core::{ClassicalRegister, ClassicalWindow, Control, EccError, QubitId};
use crate::operations::{GateKind, Operation};
use std::collections::HashSet;
use std::fmt;

/// An ordered sequence of operations over a fixed set of qubits and bits.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Circuit {
    num_qubits: usize,
    num_clbits: usize,
    registers: Vec<ClassicalRegister>,
    /// The order is significant and is preserved by every transform.
    operations: Vec<Operation>,
}

impl Circuit {
    /// Creates an empty circuit with no qubits or classical bits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `count` qubits and returns the index of the first new one.
    ///
    /// # Errors
    /// `ReferenceViolation` once operations have been appended.
    pub fn add_qubits(&mut self, count: usize) -> Result<QubitId, EccError> {
        self.ensure_shape_mutable("qubits")?;
        let first = QubitId(self.num_qubits);
        self.num_qubits += count;
        Ok(first)
    }

    /// Appends a named classical register of `width` bits.
    ///
    /// # Errors
    /// `ReferenceViolation` once operations have been appended.
    pub fn add_classical_register(&mut self, name: &str, width: usize) -> Result<ClassicalWindow, EccError> {
        self.ensure_shape_mutable("classical bits")?;
        let window = ClassicalWindow::new(self.num_clbits, width);
        self.num_clbits += width;
        self.registers.push(ClassicalRegister { name: name.to_string(), window });
        Ok(window)
    }

    fn ensure_shape_mutable(&self, what: &str) -> Result<(), EccError> {
        if self.operations.is_empty() {
            Ok(())
        } else {
            Err(EccError::ReferenceViolation {
                message: format!("cannot add {} after {} operations were appended", what, self.operations.len()),
            })
        }
    }

    /// Adds a single operation to the end of the circuit's sequence.
    ///
    /// # Errors
    /// * `ReferenceViolation` if a qubit or classical bit is out of range.
    /// * `MalformedGate` if controls repeat a qubit or include the target,
    ///   or a classical window is empty or too wide.
    pub fn add_operation(&mut self, op: Operation) -> Result<(), EccError> {
        self.validate(&op)?;
        self.operations.push(op);
        Ok(())
    }

    /// Adds multiple operations, stopping at the first invalid one.
    pub fn add_operations<I>(&mut self, ops: I) -> Result<(), EccError>
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self.add_operation(op)?;
        }
        Ok(())
    }

    fn validate(&self, op: &Operation) -> Result<(), EccError> {
        for q in op.involved_qubits() {
            if q.index() >= self.num_qubits {
                return Err(EccError::ReferenceViolation {
                    message: format!("{} in '{}' is outside the circuit's {} qubits", q, op, self.num_qubits),
                });
            }
        }
        match op {
            Operation::Unitary { target, controls, .. } => {
                let mut seen = HashSet::with_capacity(controls.len());
                for c in controls {
                    if c.qubit == *target {
                        return Err(EccError::MalformedGate {
                            message: format!("'{}' uses its target {} as a control", op, target),
                        });
                    }
                    if !seen.insert(c.qubit) {
                        return Err(EccError::MalformedGate {
                            message: format!("'{}' lists control {} twice", op, c.qubit),
                        });
                    }
                }
            }
            Operation::Measure { bit, .. } => {
                if *bit >= self.num_clbits {
                    return Err(EccError::ReferenceViolation {
                        message: format!("classical bit {} is outside the circuit's {} bits", bit, self.num_clbits),
                    });
                }
            }
            Operation::ClassicControlled { window, .. } => {
                if window.width == 0 || window.width > ClassicalWindow::MAX_WIDTH {
                    return Err(EccError::MalformedGate {
                        message: format!("'{}' has a classical window of width {}", op, window.width),
                    });
                }
                if window.end() > self.num_clbits {
                    return Err(EccError::ReferenceViolation {
                        message: format!("{} is outside the circuit's {} bits", window, self.num_clbits),
                    });
                }
            }
            Operation::Reset { .. } | Operation::Barrier { .. } => {}
        }
        Ok(())
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Named classical registers in declaration order.
    pub fn registers(&self) -> &[ClassicalRegister] {
        &self.registers
    }

    /// Looks up a classical register by name.
    pub fn register(&self, name: &str) -> Option<&ClassicalRegister> {
        self.registers.iter().find(|r| r.name == name)
    }

    /// Returns a slice containing the ordered sequence of operations in this circuit.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the total number of operations defined in the circuit.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Replaces the operation at `index`, re-validating it.
    ///
    /// Used to inject faults into an already mapped circuit.
    pub fn replace_operation(&mut self, index: usize, op: Operation) -> Result<(), EccError> {
        if index >= self.operations.len() {
            return Err(EccError::ReferenceViolation {
                message: format!("operation index {} is outside the circuit's {} operations", index, self.operations.len()),
            });
        }
        self.validate(&op)?;
        self.operations[index] = op;
        Ok(())
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `Circuit` instances using method chaining.
///
/// Errors are deferred: the first failing step is remembered and returned by
/// [`CircuitBuilder::build`].
///
/// ```
/// use qecc::{CircuitBuilder, QubitId};
///
/// let circuit = CircuitBuilder::new()
///     .qubits(2)
///     .classical_register("c", 2)
///     .h(QubitId(0))
///     .cx(QubitId(0), QubitId(1))
///     .measure(QubitId(0), 0)
///     .measure(QubitId(1), 1)
///     .build()
///     .expect("valid circuit");
/// assert_eq!(circuit.len(), 4);
/// assert_eq!(circuit.num_clbits(), 2);
/// ```
#[derive(Default)]
pub struct CircuitBuilder {
    circuit: Circuit,
    error: Option<EccError>,
}

impl CircuitBuilder {
    /// Creates a new, empty CircuitBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(mut self, step: impl FnOnce(&mut Circuit) -> Result<(), EccError>) -> Self {
        if self.error.is_none() {
            if let Err(e) = step(&mut self.circuit) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Declares `count` more qubits.
    pub fn qubits(self, count: usize) -> Self {
        self.record(|c| c.add_qubits(count).map(|_| ()))
    }

    /// Declares a named classical register.
    pub fn classical_register(self, name: &str, width: usize) -> Self {
        self.record(|c| c.add_classical_register(name, width).map(|_| ()))
    }

    /// Adds a single operation to the circuit being built.
    pub fn add_op(self, op: Operation) -> Self {
        self.record(|c| c.add_operation(op))
    }

    /// Adds multiple operations from an iterator to the circuit being built.
    pub fn add_ops<I>(self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.record(|c| c.add_operations(ops))
    }

    pub fn i(self, q: QubitId) -> Self {
        self.add_op(Operation::gate(GateKind::I, q))
    }

    pub fn h(self, q: QubitId) -> Self {
        self.add_op(Operation::gate(GateKind::H, q))
    }

    pub fn x(self, q: QubitId) -> Self {
        self.add_op(Operation::gate(GateKind::X, q))
    }

    pub fn y(self, q: QubitId) -> Self {
        self.add_op(Operation::gate(GateKind::Y, q))
    }

    pub fn z(self, q: QubitId) -> Self {
        self.add_op(Operation::gate(GateKind::Z, q))
    }

    pub fn s(self, q: QubitId) -> Self {
        self.add_op(Operation::gate(GateKind::S, q))
    }

    pub fn t(self, q: QubitId) -> Self {
        self.add_op(Operation::gate(GateKind::T, q))
    }

    /// CNOT with a positive control.
    pub fn cx(self, control: QubitId, target: QubitId) -> Self {
        self.add_op(Operation::controlled(GateKind::X, target, vec![Control::pos(control)]))
    }

    /// Any gate kind with arbitrary control points.
    pub fn controlled(self, kind: GateKind, target: QubitId, controls: Vec<Control>) -> Self {
        self.add_op(Operation::controlled(kind, target, controls))
    }

    pub fn measure(self, qubit: QubitId, bit: usize) -> Self {
        self.add_op(Operation::Measure { qubit, bit })
    }

    pub fn reset(self, qubit: QubitId) -> Self {
        self.add_op(Operation::Reset { qubit })
    }

    pub fn barrier(self, qubits: Vec<QubitId>) -> Self {
        self.add_op(Operation::Barrier { qubits })
    }

    pub fn classic_controlled(self, kind: GateKind, target: QubitId, window: ClassicalWindow, expected: u64) -> Self {
        self.add_op(Operation::ClassicControlled { kind, target, window, expected })
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Result<Circuit, EccError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.circuit),
        }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "qecc::Circuit[{} operations on {} qubits, {} classical bits]",
            self.operations.len(),
            self.num_qubits,
            self.num_clbits
        )?;
        if self.operations.is_empty() || self.num_qubits == 0 {
            return Ok(());
        }

        let num_ops = self.operations.len();
        let max_label_width = format!("{}", QubitId(self.num_qubits - 1)).len();
        let label_padding = " ".repeat(max_label_width + 2); // Label + ": "

        const GATE_WIDTH: usize = 7; // e.g., "───H───"
        const WIRE: &str = "───────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time] stores the gate/wire segment string
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_ops]; self.num_qubits];
        // v_connect[row][time] stores the vertical connector char below this row at this time
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_ops]; self.num_qubits];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!("{}{}{}", H_WIRE.to_string().repeat(pre_dashes), symbol, H_WIRE.to_string().repeat(post_dashes))
            }
        }

        for (t, op) in self.operations.iter().enumerate() {
            match op {
                Operation::Unitary { kind, target, controls } => {
                    op_grid[target.index()][t] = format_gate(kind.name());
                    let mut rows = vec![target.index()];
                    for c in controls {
                        let symbol = if c.is_satisfied_by(true) { "@" } else { "○" };
                        op_grid[c.qubit.index()][t] = format_gate(symbol);
                        rows.push(c.qubit.index());
                    }
                    let r_min = rows.iter().copied().min().unwrap_or(0);
                    let r_max = rows.iter().copied().max().unwrap_or(0);
                    for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                        row_vec[t] = V_WIRE;
                    }
                }
                Operation::Measure { qubit, bit } => {
                    op_grid[qubit.index()][t] = format_gate(&format!("M{}", bit));
                }
                Operation::Reset { qubit } => {
                    op_grid[qubit.index()][t] = format_gate("|0>");
                }
                Operation::ClassicControlled { kind, target, expected, .. } => {
                    op_grid[target.index()][t] = format_gate(&format!("{}={}", kind.name(), expected));
                }
                Operation::Barrier { qubits } => {
                    for q in qubits {
                        op_grid[q.index()][t] = format_gate("░");
                    }
                }
            }
        }

        for r in 0..self.num_qubits {
            let label = format!("{}: ", QubitId(r));
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < self.num_qubits - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_ops {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qid(id: usize) -> QubitId {
        QubitId(id)
    }

    #[test]
    fn registers_are_laid_out_in_declaration_order() -> Result<(), EccError> {
        let mut circuit = Circuit::new();
        assert_eq!(circuit.add_qubits(3)?, qid(0));
        assert_eq!(circuit.add_qubits(2)?, qid(3));
        let c = circuit.add_classical_register("c", 2)?;
        let s = circuit.add_classical_register("qecc", 8)?;
        assert_eq!(c, ClassicalWindow::new(0, 2));
        assert_eq!(s, ClassicalWindow::new(2, 8));
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.num_clbits(), 10);
        assert_eq!(circuit.register("qecc").map(|r| r.window), Some(s));
        Ok(())
    }

    #[test]
    fn shape_is_frozen_after_first_operation() -> Result<(), EccError> {
        let mut circuit = Circuit::new();
        circuit.add_qubits(1)?;
        circuit.add_operation(Operation::gate(GateKind::X, qid(0)))?;
        assert!(matches!(circuit.add_qubits(1), Err(EccError::ReferenceViolation { .. })));
        assert!(matches!(circuit.add_classical_register("c", 1), Err(EccError::ReferenceViolation { .. })));
        Ok(())
    }

    #[test]
    fn rejects_control_on_target() {
        let result = CircuitBuilder::new()
            .qubits(2)
            .controlled(GateKind::X, qid(1), vec![Control::pos(qid(1))])
            .build();
        assert!(matches!(result, Err(EccError::MalformedGate { .. })));
    }

    #[test]
    fn rejects_duplicate_controls() {
        let result = CircuitBuilder::new()
            .qubits(3)
            .controlled(GateKind::Z, qid(2), vec![Control::pos(qid(0)), Control::neg(qid(0))])
            .build();
        assert!(matches!(result, Err(EccError::MalformedGate { .. })));
    }

    #[test]
    fn rejects_out_of_range_references() {
        let qubit = CircuitBuilder::new().qubits(1).x(qid(1)).build();
        assert!(matches!(qubit, Err(EccError::ReferenceViolation { .. })));

        let bit = CircuitBuilder::new().qubits(1).classical_register("c", 1).measure(qid(0), 1).build();
        assert!(matches!(bit, Err(EccError::ReferenceViolation { .. })));

        let window = CircuitBuilder::new()
            .qubits(1)
            .classical_register("c", 2)
            .classic_controlled(GateKind::X, qid(0), ClassicalWindow::new(1, 2), 1)
            .build();
        assert!(matches!(window, Err(EccError::ReferenceViolation { .. })));
    }

    #[test]
    fn builder_reports_first_error() {
        let result = CircuitBuilder::new()
            .qubits(1)
            .x(qid(4))
            .controlled(GateKind::X, qid(0), vec![Control::pos(qid(0))])
            .build();
        assert!(matches!(result, Err(EccError::ReferenceViolation { .. })));
    }

    #[test]
    fn display_draws_one_row_per_qubit() -> Result<(), EccError> {
        let circuit = CircuitBuilder::new()
            .qubits(2)
            .classical_register("c", 1)
            .h(qid(0))
            .cx(qid(0), qid(1))
            .measure(qid(1), 0)
            .build()?;
        let rendered = circuit.to_string();
        assert!(rendered.contains("q0: "));
        assert!(rendered.contains("q1: "));
        assert!(rendered.contains("H"));
        assert!(rendered.contains("@"));
        assert!(rendered.contains("M0"));
        Ok(())
    }
}
