// src/ecc/config.rs

use super::{Code, Q7Steane, Q9Shor};
use crate::core::EccError;
use std::fmt;
use std::str::FromStr;

/// Original gates mapped between two forced syndrome extractions by default.
pub const DEFAULT_MEASURE_FREQUENCY: usize = 100;

/// The codes that can be selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodeKind {
    #[default]
    Q9Shor,
    Q7Steane,
}

impl CodeKind {
    pub const ALL: [CodeKind; 2] = [CodeKind::Q9Shor, CodeKind::Q7Steane];

    pub fn name(self) -> &'static str {
        match self {
            CodeKind::Q9Shor => Q9Shor.descriptor().name,
            CodeKind::Q7Steane => Q7Steane.descriptor().name,
        }
    }

    /// A fresh instance of the selected code.
    pub fn build(self) -> Box<dyn Code> {
        match self {
            CodeKind::Q9Shor => Box::new(Q9Shor::new()),
            CodeKind::Q7Steane => Box::new(Q7Steane::new()),
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CodeKind {
    type Err = EccError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CodeKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<&str> = CodeKind::ALL.iter().map(|k| k.name()).collect();
                EccError::Configuration {
                    message: format!("unknown code '{}', available: {}", s, known.join(", ")),
                }
            })
    }
}

/// Settings of one transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EccConfig {
    /// Code to inject.
    pub code: CodeKind,
    /// Number of original gates after which a syndrome extraction is forced.
    pub measure_frequency: usize,
}

impl Default for EccConfig {
    fn default() -> Self {
        Self {
            code: CodeKind::default(),
            measure_frequency: DEFAULT_MEASURE_FREQUENCY,
        }
    }
}

impl EccConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code(mut self, code: CodeKind) -> Self {
        self.code = code;
        self
    }

    pub fn with_measure_frequency(mut self, measure_frequency: usize) -> Self {
        self.measure_frequency = measure_frequency;
        self
    }

    /// Rejects settings no transform can run with.
    pub fn validate(&self) -> Result<(), EccError> {
        check_measure_frequency(self.measure_frequency)
    }
}

/// The one rule on the syndrome cadence: at least one gate between cycles.
pub(crate) fn check_measure_frequency(measure_frequency: usize) -> Result<(), EccError> {
    if measure_frequency == 0 {
        return Err(EccError::Configuration {
            message: "measure frequency must be positive".to_string(),
        });
    }
    Ok(())
}
