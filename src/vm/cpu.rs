//! Processor state: register file and program counter.

/// Architectural state of a single RV32 hart.
///
/// Thirty-two general-purpose 32-bit registers plus the program counter.
/// Register x0 is hardwired to zero: reads always yield 0 and writes are
/// silently discarded, as the ISA requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cpu {
    /// General-purpose registers x0-x31.
    x: [u32; 32],

    /// Program counter. Always a multiple of 4 on entry to dispatch.
    pub pc: u32,
}

impl Cpu {
    /// Create a CPU with all registers zeroed and PC at 0.
    #[must_use]
    pub fn new() -> Self {
        Cpu { x: [0u32; 32], pc: 0 }
    }

    /// Create a CPU with a specific entry point.
    #[must_use]
    pub fn with_pc(pc: u32) -> Self {
        Cpu { x: [0u32; 32], pc }
    }

    /// Read a register. x0 always returns 0.
    #[inline]
    #[must_use]
    pub fn read_reg(&self, reg: u8) -> u32 {
        if reg == 0 { 0 } else { self.x[reg as usize] }
    }

    /// Write a register. Writes to x0 are ignored.
    #[inline]
    pub fn write_reg(&mut self, reg: u8, value: u32) {
        if reg != 0 {
            self.x[reg as usize] = value;
        }
    }

    /// Borrow the whole register file (for reporting and tests).
    #[must_use]
    pub fn registers(&self) -> &[u32; 32] {
        &self.x
    }

    /// Replace the whole register file (for tests and differential runs).
    /// The x0 invariant is re-imposed on whatever was passed in.
    pub fn set_registers(&mut self, regs: [u32; 32]) {
        self.x = regs;
        self.x[0] = 0;
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
