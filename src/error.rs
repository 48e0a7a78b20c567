//! Error types for the RV32IM simulator core.

use std::fmt;

/// Memory access type for fault reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessType {
    /// Read access (load instructions, string syscalls).
    Read,
    /// Write access (store instructions).
    Write,
    /// Execute access (instruction fetch).
    Execute,
}

/// Causes that end an execution step abnormally.
///
/// None of these are recoverable inside the core. They are returned as
/// values so an embedding host can observe the fault kind instead of the
/// process dying; the CLI maps them to a nonzero exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapCause {
    /// Environment call awaiting syscall dispatch.
    ///
    /// Raised by the executor when it reaches an `ecall`; the [`crate::Vm`]
    /// intercepts it and hands control to its syscall handler. It reaches
    /// the host only from a handler that refuses all syscalls.
    Ecall,
    /// Unrecognized opcode, or an unrecognized funct3/funct7 combination
    /// inside a recognized opcode. Carries the raw instruction word.
    InvalidInstruction(u32),
    /// Out-of-bounds or misaligned data access.
    MemoryFault {
        /// The address that caused the fault.
        addr: u32,
        /// The type of access attempted.
        access: AccessType,
    },
    /// Computed branch or jump target not 4-byte aligned.
    InstructionMisaligned(u32),
    /// Syscall number outside the fixed table.
    UnknownSyscall(u32),
}

impl fmt::Display for TrapCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrapCause::Ecall => write!(f, "unhandled environment call"),
            TrapCause::InvalidInstruction(word) => {
                write!(f, "invalid instruction: {word:#010x}")
            }
            TrapCause::MemoryFault { addr, access } => {
                write!(f, "memory {access:?} fault at {addr:#010x}")
            }
            TrapCause::InstructionMisaligned(target) => {
                write!(f, "control transfer to misaligned address {target:#010x}")
            }
            TrapCause::UnknownSyscall(num) => {
                write!(f, "unknown syscall number {num}")
            }
        }
    }
}

impl std::error::Error for TrapCause {}

/// Result type for execution steps.
pub type VmResult<T> = Result<T, TrapCause>;
