// src/lib.rs

//! `qecc` - quantum error-correcting code injection for gate-level circuits
//!
//! Takes a logical [`Circuit`], walks its operations once and rewrites them
//! onto physical qubits protected by a stabilizer code ([`Q9Shor`] or
//! [`Q7Steane`]), inserting encoding, periodic syndrome extraction with
//! classically controlled corrections, and decoding before measurements.
//! A small seeded state-vector [`Simulator`] is included to run the result.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod ecc;
pub mod simulation;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use core::{ClassicalRegister, ClassicalWindow, Control, EccError, Polarity, QubitId, StateVector};
pub use operations::{GateKind, Operation};
pub use circuits::{Circuit, CircuitBuilder};
pub use ecc::{Code, CodeDescriptor, CodeKind, CodeState, Ecc, EccConfig, Layout, Mapping, Q7Steane, Q9Shor};
pub use simulation::{SimulationResult, Simulator};
pub use validation::{check_normalization, outcome_probability};

// Example: protect a bit flip with Steane's code and read it back.
/// ```
/// use qecc::{CircuitBuilder, CodeKind, Ecc, EccConfig, QubitId, Simulator};
///
/// let original = CircuitBuilder::new()
///     .qubits(1)
///     .classical_register("c", 1)
///     .x(QubitId(0))
///     .measure(QubitId(0), 0)
///     .build()?;
///
/// let ecc = Ecc::from_config(&EccConfig::new().with_code(CodeKind::Q7Steane))?;
/// let protected = ecc.apply(&original)?;
/// println!("{}", protected);
///
/// // 7 data replicas, 3 ancillas; 1 original bit, 6 syndrome bits
/// assert_eq!(protected.num_qubits(), 10);
/// assert_eq!(protected.num_clbits(), 7);
///
/// let result = Simulator::new().run(&protected)?;
/// assert_eq!(result.bit(0), Some(true));
/// # Ok::<(), qecc::EccError>(())
/// ```
#[doc(hidden)]
const _: () = ();
