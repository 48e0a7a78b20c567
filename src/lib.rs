// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! minirv: a deterministic RV32IM instruction-set simulator.
//!
//! The core is the execution engine of an RV32I (plus mul/mulh/div/rem)
//! machine: a register file with a hardwired-zero x0, a flat little-endian
//! byte-addressable memory with bounds and alignment checking, and one
//! execution handler per opcode family, dispatched over a decoded
//! instruction value. Every fault (invalid instruction, out-of-bounds or
//! misaligned data access, misaligned control transfer, unknown syscall)
//! is a [`TrapCause`] returned to the embedding host rather than a process
//! exit, so the same core serves the CLI runner and the test harnesses.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     Vm: fetch / decode / step       │
//! ├──────────────┬──────────────────────┤
//! │ isa: execute │ syscall: host table  │
//! ├──────────────┴──────────────────────┤
//! │   Cpu (x0-x31, PC)  ·  Memory       │
//! └─────────────────────────────────────┘
//! ```
//!
//! Execution is single-threaded and synchronous: a step either commits one
//! instruction's architectural effect or reports a fault, deterministically.

pub mod error;
pub mod isa;
pub mod syscall;
pub mod vm;

pub use error::{AccessType, TrapCause, VmResult};
pub use syscall::{HostConsole, NoSyscalls, SyscallHandler, SyscallOutcome};
pub use vm::memory::DEFAULT_MEMORY_SIZE;
pub use vm::{Cpu, Memory, RunOutcome, StepResult, Vm, VmConfig};
