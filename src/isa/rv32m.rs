//! Multiply/divide subset execution (mul, mulh, div, rem).
//!
//! The cast warnings below are intentionally allowed because the widening
//! multiply and the division edge cases require deliberate signed/unsigned
//! reinterpretation.

#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]

use crate::error::{TrapCause, VmResult};
use crate::isa::Instruction;
use crate::vm::cpu::Cpu;

/// Execute one multiply/divide instruction.
///
/// Division follows the RISC-V convention: dividing by zero yields all
/// ones with the remainder equal to the dividend, and `i32::MIN / -1`
/// yields `i32::MIN` with remainder 0. No instruction in this family
/// faults on its operands.
///
/// # Errors
///
/// Returns [`TrapCause::InvalidInstruction`] for any instruction outside
/// the multiply/divide family (the dispatcher never sends one).
#[inline]
pub(crate) fn execute_rv32m(inst: Instruction, cpu: &mut Cpu, pc: u32) -> VmResult<u32> {
    let next_pc = pc.wrapping_add(4);

    match inst {
        // Low 32 bits of the product; signedness is irrelevant here.
        Instruction::Mul { rd, rs1, rs2 } => {
            cpu.write_reg(rd, cpu.read_reg(rs1).wrapping_mul(cpu.read_reg(rs2)));
            Ok(next_pc)
        }

        // High 32 bits of the signed product: widen both operands to 64
        // bits, multiply, shift down.
        Instruction::Mulh { rd, rs1, rs2 } => {
            let a = i64::from(cpu.read_reg(rs1) as i32);
            let b = i64::from(cpu.read_reg(rs2) as i32);
            cpu.write_reg(rd, ((a * b) >> 32) as u32);
            Ok(next_pc)
        }

        Instruction::Div { rd, rs1, rs2 } => {
            let dividend = cpu.read_reg(rs1) as i32;
            let divisor = cpu.read_reg(rs2) as i32;

            let quotient = if divisor == 0 {
                u32::MAX
            } else if dividend == i32::MIN && divisor == -1 {
                dividend as u32
            } else {
                (dividend / divisor) as u32
            };

            cpu.write_reg(rd, quotient);
            Ok(next_pc)
        }

        Instruction::Rem { rd, rs1, rs2 } => {
            let dividend = cpu.read_reg(rs1) as i32;
            let divisor = cpu.read_reg(rs2) as i32;

            let remainder = if divisor == 0 {
                dividend as u32
            } else if dividend == i32::MIN && divisor == -1 {
                0
            } else {
                (dividend % divisor) as u32
            };

            cpu.write_reg(rd, remainder);
            Ok(next_pc)
        }

        _ => Err(TrapCause::InvalidInstruction(0)),
    }
}
