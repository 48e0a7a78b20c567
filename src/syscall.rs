//! Environment-call handling: the fixed host syscall table.

use std::io::{self, Write};

use crate::error::{TrapCause, VmResult};
use crate::vm::cpu::Cpu;
use crate::vm::memory::Memory;

/// Register x10 (a0): holds the syscall number on `ecall`.
pub const SYSCALL_REG: u8 = 10;
/// Register x11 (a1): holds the syscall argument on `ecall`.
pub const ARG_REG: u8 = 11;

/// Syscall numbers recognized by the host console handler.
pub mod syscall {
    /// Print the argument register as a signed decimal integer.
    pub const PRINT_INT: u32 = 1;
    /// Print the NUL-terminated string at the address in the argument
    /// register.
    pub const PRINT_STRING: u32 = 4;
    /// Print a termination notice and end the run successfully.
    pub const EXIT: u32 = 10;
    /// Print the character in the argument register's low 8 bits.
    pub const PRINT_CHAR: u32 = 11;
}

/// What the machine should do after a handled `ecall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallOutcome {
    /// Resume at the next instruction.
    Continue,
    /// End the run with success status; no further instructions execute.
    Exit,
}

/// Dispatches environment calls against processor state and memory.
///
/// Invoked by the [`crate::Vm`] whenever execution reaches an `ecall`.
/// The syscall number is read from x10 and the argument from x11.
pub trait SyscallHandler {
    /// Handle one environment call.
    ///
    /// # Errors
    ///
    /// Returns [`TrapCause::UnknownSyscall`] (or another fault) when the
    /// call cannot be satisfied; the run then terminates abnormally.
    fn handle(&mut self, cpu: &mut Cpu, memory: &mut Memory) -> VmResult<SyscallOutcome>;
}

/// The fixed host syscall table, emitting to any [`Write`] sink.
///
/// Write errors on the sink are ignored, as console emission is
/// best-effort and carries no architectural state.
pub struct HostConsole<W> {
    out: W,
}

impl HostConsole<io::Stdout> {
    /// A console handler writing to the process's stdout.
    #[must_use]
    pub fn stdout() -> Self {
        HostConsole { out: io::stdout() }
    }
}

impl<W: Write> HostConsole<W> {
    /// Wrap an arbitrary sink (a `Vec<u8>` in tests, for example).
    pub fn new(out: W) -> Self {
        HostConsole { out }
    }

    /// Recover the sink, consuming the handler.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W> std::fmt::Debug for HostConsole<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostConsole").finish_non_exhaustive()
    }
}

impl<W: Write> SyscallHandler for HostConsole<W> {
    #[allow(clippy::cast_possible_wrap)]
    #[allow(clippy::cast_possible_truncation)]
    fn handle(&mut self, cpu: &mut Cpu, memory: &mut Memory) -> VmResult<SyscallOutcome> {
        let number = cpu.read_reg(SYSCALL_REG);
        let arg = cpu.read_reg(ARG_REG);

        match number {
            syscall::PRINT_INT => {
                let _ = write!(self.out, "{}", arg as i32);
                Ok(SyscallOutcome::Continue)
            }
            syscall::PRINT_STRING => {
                // Walk bytes from the argument address, stopping at the
                // first NUL or at the memory bound, whichever comes first.
                let mut ptr = arg;
                loop {
                    match memory.load_u8(ptr) {
                        Ok(0) | Err(_) => break,
                        Ok(byte) => {
                            let _ = self.out.write_all(&[byte]);
                            ptr = ptr.wrapping_add(1);
                        }
                    }
                }
                Ok(SyscallOutcome::Continue)
            }
            syscall::EXIT => {
                let _ = writeln!(self.out, "exiting the simulator");
                let _ = self.out.flush();
                Ok(SyscallOutcome::Exit)
            }
            syscall::PRINT_CHAR => {
                let _ = self.out.write_all(&[arg as u8]);
                Ok(SyscallOutcome::Continue)
            }
            other => Err(TrapCause::UnknownSyscall(other)),
        }
    }
}

/// A handler that refuses every environment call.
///
/// Useful for hosts (differential tests, benchmarks) whose programs never
/// legitimately reach an `ecall`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSyscalls;

impl SyscallHandler for NoSyscalls {
    fn handle(&mut self, _cpu: &mut Cpu, _memory: &mut Memory) -> VmResult<SyscallOutcome> {
        Err(TrapCause::Ecall)
    }
}
