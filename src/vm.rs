//! Virtual machine: the fetch/decode/execute loop over one hart.

pub mod cpu;
pub mod memory;

pub use cpu::Cpu;
pub use memory::Memory;

use std::fmt;

use crate::error::{TrapCause, VmResult};
use crate::isa::{self, Instruction, execute_rv32i, execute_rv32m};
use crate::syscall::{SyscallHandler, SyscallOutcome};

/// Execution policy knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct VmConfig {
    /// Enforce natural alignment on data loads and stores. Off by
    /// default; bounds checking applies either way.
    pub enforce_alignment: bool,
}

/// Result of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// The instruction retired; carries the committed next PC.
    Ok(u32),
    /// The exit syscall ran; the machine is done, successfully.
    Exited,
    /// A fatal fault; the machine must not be stepped further.
    Trap(TrapCause),
}

/// How a bounded run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The program requested exit via syscall 10.
    Exited,
    /// A fatal fault occurred.
    Trap(TrapCause),
    /// The step budget ran out before the program terminated.
    StepLimit,
}

/// A complete simulated machine: one hart, flat memory, and a syscall
/// handler for its environment calls.
///
/// Execution is a pure step function: each [`Vm::step`] consumes exactly
/// one instruction at PC and either commits its architectural effect or
/// reports a fault, with no partial state changes on the fault paths that
/// promise none.
pub struct Vm<S> {
    /// Processor state: registers and PC.
    pub cpu: Cpu,
    /// Flat byte-addressable memory.
    pub memory: Memory,
    handler: S,
    config: VmConfig,
    executed: u64,
}

impl<S> fmt::Debug for Vm<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vm")
            .field("cpu", &self.cpu)
            .field("config", &self.config)
            .field("executed", &self.executed)
            .finish_non_exhaustive()
    }
}

impl<S: SyscallHandler> Vm<S> {
    /// Create a machine with `mem_size` bytes of zeroed memory, PC 0, and
    /// the default configuration.
    pub fn new(mem_size: u32, handler: S) -> Self {
        Self::with_config(mem_size, handler, VmConfig::default())
    }

    /// Create a machine with an explicit configuration.
    pub fn with_config(mem_size: u32, handler: S, config: VmConfig) -> Self {
        Vm {
            cpu: Cpu::new(),
            memory: Memory::new(mem_size),
            handler,
            config,
            executed: 0,
        }
    }

    /// Copy a flat program image into memory at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`TrapCause::MemoryFault`] if the image does not fit.
    pub fn load_image(&mut self, addr: u32, image: &[u8]) -> VmResult<()> {
        self.memory.store_bytes(addr, image)
    }

    /// Number of instructions retired so far.
    #[must_use]
    pub fn total_executed(&self) -> u64 {
        self.executed
    }

    /// Borrow the syscall handler.
    #[must_use]
    pub fn handler(&self) -> &S {
        &self.handler
    }

    /// Recover the syscall handler, consuming the machine.
    pub fn into_handler(self) -> S {
        self.handler
    }

    /// Fetch, decode, and execute the instruction at PC.
    ///
    /// Exactly one handler runs per step; it alone decides the next PC
    /// (sequential or a control-transfer target), which is committed here.
    pub fn step(&mut self) -> StepResult {
        let pc = self.cpu.pc;

        let word = match self.memory.fetch(pc) {
            Ok(word) => word,
            Err(fault) => return StepResult::Trap(fault),
        };

        let inst = match isa::decode(word) {
            Ok(inst) => inst,
            Err(word) => return StepResult::Trap(TrapCause::InvalidInstruction(word)),
        };

        let result = match inst {
            Instruction::Mul { .. }
            | Instruction::Mulh { .. }
            | Instruction::Div { .. }
            | Instruction::Rem { .. } => execute_rv32m(inst, &mut self.cpu, pc),
            _ => execute_rv32i(
                inst,
                &mut self.cpu,
                &mut self.memory,
                pc,
                self.config.enforce_alignment,
            ),
        };

        match result {
            Ok(next_pc) => {
                self.cpu.pc = next_pc;
                self.executed += 1;
                StepResult::Ok(next_pc)
            }
            Err(TrapCause::Ecall) => self.dispatch_syscall(pc),
            Err(fault) => StepResult::Trap(fault),
        }
    }

    /// Run until exit, trap, or `max_steps` retired instructions.
    pub fn run(&mut self, max_steps: u64) -> RunOutcome {
        for _ in 0..max_steps {
            match self.step() {
                StepResult::Ok(_) => {}
                StepResult::Exited => return RunOutcome::Exited,
                StepResult::Trap(fault) => return RunOutcome::Trap(fault),
            }
        }
        RunOutcome::StepLimit
    }

    fn dispatch_syscall(&mut self, pc: u32) -> StepResult {
        match self.handler.handle(&mut self.cpu, &mut self.memory) {
            Ok(SyscallOutcome::Continue) => {
                // A non-terminating syscall advances PC like any other
                // sequential instruction.
                self.cpu.pc = pc.wrapping_add(4);
                self.executed += 1;
                StepResult::Ok(self.cpu.pc)
            }
            Ok(SyscallOutcome::Exit) => {
                self.executed += 1;
                StepResult::Exited
            }
            Err(fault) => StepResult::Trap(fault),
        }
    }
}
