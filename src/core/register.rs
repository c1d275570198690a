// src/core/register.rs

use std::fmt;

/// A contiguous run of classical bits read as one little-endian integer.
///
/// Bit `start` is the least significant bit of the value, so a window
/// holding bits `[1, 0]` (in bit order) has value 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassicalWindow {
    /// First classical bit of the window.
    pub start: usize,
    /// Number of bits in the window.
    pub width: usize,
}

impl ClassicalWindow {
    /// Largest width whose value still fits a `u64` comparison literal.
    pub const MAX_WIDTH: usize = 63;

    pub fn new(start: usize, width: usize) -> Self {
        Self { start, width }
    }

    /// One past the last bit of the window.
    pub fn end(&self) -> usize {
        self.start + self.width
    }

    /// The bit indices covered by the window, least significant first.
    pub fn bits(&self) -> std::ops::Range<usize> {
        self.start..self.end()
    }

    /// Reads the window's value out of a classical bit array.
    pub fn value_in(&self, bits: &[bool]) -> u64 {
        self.bits()
            .enumerate()
            .filter(|(_, b)| bits.get(*b).copied().unwrap_or(false))
            .fold(0u64, |acc, (offset, _)| acc | (1 << offset))
    }
}

impl fmt::Display for ClassicalWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c[{}..{}]", self.start, self.end())
    }
}

/// A named classical register of a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassicalRegister {
    /// Register name, e.g. `qecc`.
    pub name: String,
    /// Bits owned by the register.
    pub window: ClassicalWindow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_value_is_little_endian() {
        let bits = [false, true, false, true, true];
        assert_eq!(ClassicalWindow::new(1, 2).value_in(&bits), 1);
        assert_eq!(ClassicalWindow::new(3, 2).value_in(&bits), 3);
        assert_eq!(ClassicalWindow::new(0, 2).value_in(&bits), 2);
    }
}
