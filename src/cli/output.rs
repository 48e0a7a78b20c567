//! Output formatting utilities for CLI.

#![allow(clippy::cast_possible_wrap)]

use minirv::{RunOutcome, SyscallHandler, Vm};
use serde::Serialize;

/// Names of the x registers in the standard ABI order.
const REG_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Serializable summary of a finished run.
#[derive(Debug, Serialize)]
pub(super) struct RunReport {
    /// Termination status: "exited", "trap", or "step-limit".
    status: &'static str,
    /// Fault description (null unless status is "trap").
    trap: Option<String>,
    /// Instructions retired.
    steps: u64,
    /// Program counter at termination.
    pc: u32,
    /// Final register file contents.
    registers: Vec<u32>,
}

impl RunReport {
    /// Capture the final machine state and the run outcome.
    pub(super) fn new<S: SyscallHandler>(vm: &Vm<S>, outcome: RunOutcome) -> Self {
        let (status, trap) = match outcome {
            RunOutcome::Exited => ("exited", None),
            RunOutcome::Trap(cause) => ("trap", Some(cause.to_string())),
            RunOutcome::StepLimit => ("step-limit", None),
        };
        Self {
            status,
            trap,
            steps: vm.total_executed(),
            pc: vm.cpu.pc,
            registers: vm.cpu.registers().to_vec(),
        }
    }

    /// Format the report as human-readable text.
    pub(super) fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Status: {}\n", self.status));
        if let Some(cause) = &self.trap {
            output.push_str(&format!("  Cause: {cause}\n"));
        }
        output.push_str(&format!("  Steps: {}\n", self.steps));
        output.push_str(&format!("  PC:    0x{:08x}\n\n", self.pc));

        output.push_str("Registers:\n");
        for (i, value) in self.registers.iter().enumerate() {
            output.push_str(&format!(
                "  x{i:<2} ({:<4}) = 0x{value:08x} ({})\n",
                REG_NAMES[i], *value as i32
            ));
        }

        output
    }
}
