// src/ecc/mapping.rs

use super::CodeDescriptor;
use crate::circuits::Circuit;
use crate::core::{ClassicalWindow, Control, EccError, QubitId};
use crate::operations::{GateKind, Operation};

/// Placement of logical qubits, ancillas and syndrome bits in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    logical_qubits: usize,
    redundancy: usize,
    ancillas: usize,
    syndrome: Vec<ClassicalWindow>,
}

impl Layout {
    pub fn logical_qubits(&self) -> usize {
        self.logical_qubits
    }

    pub fn redundancy(&self) -> usize {
        self.redundancy
    }

    /// Iterates the logical qubits of the original circuit.
    pub fn logical(&self) -> impl Iterator<Item = QubitId> + use<> {
        (0..self.logical_qubits).map(QubitId)
    }

    /// Physical qubit holding `replica` of `logical`: `logical + replica·N`.
    pub fn physical(&self, logical: QubitId, replica: usize) -> QubitId {
        QubitId(logical.index() + replica * self.logical_qubits)
    }

    /// All physical qubits of `logical`, replica 0 first.
    pub fn replicas(&self, logical: QubitId) -> impl Iterator<Item = QubitId> + '_ {
        (0..self.redundancy).map(move |replica| self.physical(logical, replica))
    }

    /// The `j`-th ancilla, placed after every data replica.
    pub fn ancilla(&self, j: usize) -> QubitId {
        QubitId(self.redundancy * self.logical_qubits + j)
    }

    pub fn ancillas(&self) -> usize {
        self.ancillas
    }

    /// One window per register of the code's descriptor, in order.
    pub fn syndrome_windows(&self) -> &[ClassicalWindow] {
        &self.syndrome
    }
}

/// Encode/decode status of a code instance during one transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodeState {
    encoded: bool,
    gates_written: bool,
}

impl CodeState {
    /// Nothing written yet: the initial state of every transform.
    pub fn decoded() -> Self {
        Self::default()
    }

    /// Codewords already hold the logical state.
    pub fn encoded() -> Self {
        Self { encoded: true, gates_written: true }
    }

    pub fn is_encoded(&self) -> bool {
        self.encoded
    }

    pub fn is_decoded(&self) -> bool {
        !self.encoded
    }

    /// Whether an encoding has been written at some point, so the data
    /// replicas may no longer be in |0⟩.
    pub fn gates_written(&self) -> bool {
        self.gates_written
    }
}

/// Output side of one transform: the layout, the code state and the
/// append-only mapped circuit.
#[derive(Debug, Clone)]
pub struct Mapping {
    layout: Layout,
    state: CodeState,
    circuit: Circuit,
}

impl Mapping {
    /// Allocates the output circuit for `original` in the decoded state.
    ///
    /// The output keeps the original classical registers first, so original
    /// bit `b` is still bit `b`, and appends the code's registers.
    pub fn new(original: &Circuit, descriptor: &CodeDescriptor) -> Result<Self, EccError> {
        Self::with_state(original, descriptor, CodeState::decoded())
    }

    /// Like [`Mapping::new`] but starting from an explicit code state.
    ///
    /// # Errors
    /// `Configuration` if the descriptor's registers do not match its
    /// correcting bits.
    pub fn with_state(original: &Circuit, descriptor: &CodeDescriptor, state: CodeState) -> Result<Self, EccError> {
        descriptor.validate()?;
        let logical_qubits = original.num_qubits();
        let mut circuit = Circuit::new();
        circuit.add_qubits(descriptor.output_qubits(logical_qubits))?;
        for register in original.registers() {
            circuit.add_classical_register(&register.name, register.window.width)?;
        }
        let syndrome = descriptor
            .registers
            .iter()
            .map(|(name, width)| circuit.add_classical_register(name, *width))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            layout: Layout {
                logical_qubits,
                redundancy: descriptor.redundancy,
                ancillas: descriptor.ancillas,
                syndrome,
            },
            state,
            circuit,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn state(&self) -> CodeState {
        self.state
    }

    pub(crate) fn set_encoded(&mut self, encoded: bool) {
        self.state.encoded = encoded;
        if encoded {
            self.state.gates_written = true;
        }
    }

    /// The circuit written so far.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    pub fn push(&mut self, op: Operation) -> Result<(), EccError> {
        self.circuit.add_operation(op)
    }

    pub fn gate(&mut self, kind: GateKind, target: QubitId) -> Result<(), EccError> {
        self.push(Operation::gate(kind, target))
    }

    /// `kind` on `target` with one positive control.
    pub fn controlled_by(&mut self, kind: GateKind, target: QubitId, control: QubitId) -> Result<(), EccError> {
        self.push(Operation::controlled(kind, target, vec![Control::pos(control)]))
    }

    pub fn measure(&mut self, qubit: QubitId, bit: usize) -> Result<(), EccError> {
        self.push(Operation::Measure { qubit, bit })
    }

    pub fn reset(&mut self, qubit: QubitId) -> Result<(), EccError> {
        self.push(Operation::Reset { qubit })
    }

    pub fn classic_controlled(
        &mut self,
        kind: GateKind,
        target: QubitId,
        window: ClassicalWindow,
        expected: u64,
    ) -> Result<(), EccError> {
        self.push(Operation::ClassicControlled { kind, target, window, expected })
    }
}
