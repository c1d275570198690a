// src/core/mod.rs

//! Core data structures and types

pub mod control;
pub mod error;
pub mod register;
pub mod state;

// Re-export public types for convenient access via `qecc::core::TypeName`
pub use control::{Control, Polarity};
pub use error::{EccError, QubitId};
pub use register::{ClassicalRegister, ClassicalWindow};
pub use state::StateVector;
