//! RV32I base instruction execution.
//!
//! The cast warnings below are intentionally allowed because RV32I
//! semantics require deliberate signed/unsigned reinterpretation of 32-bit
//! values.

#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]

use crate::error::{TrapCause, VmResult};
use crate::isa::Instruction;
use crate::vm::cpu::Cpu;
use crate::vm::memory::{Memory, Width};

/// Validate a computed branch/jump target before it is committed.
///
/// The new PC is fully computed before this check fires; a misaligned
/// target faults without any register write having happened.
#[inline]
fn control_transfer(target: u32) -> VmResult<u32> {
    if target % 4 == 0 {
        Ok(target)
    } else {
        Err(TrapCause::InstructionMisaligned(target))
    }
}

/// Execute one RV32I instruction against processor state and memory.
///
/// Returns the next PC value; the caller commits it. `strict_align` is
/// forwarded to the memory subsystem's data accesses.
///
/// # Errors
///
/// Returns a [`TrapCause`] when the instruction faults (memory bounds or
/// alignment, misaligned control transfer) or reaches an `ecall`.
#[inline]
#[allow(clippy::too_many_lines)]
pub(crate) fn execute_rv32i(
    inst: Instruction,
    cpu: &mut Cpu,
    memory: &mut Memory,
    pc: u32,
    strict_align: bool,
) -> VmResult<u32> {
    let next_pc = pc.wrapping_add(4);

    match inst {
        // Register-register arithmetic and logic.
        Instruction::Add { rd, rs1, rs2 } => {
            cpu.write_reg(rd, cpu.read_reg(rs1).wrapping_add(cpu.read_reg(rs2)));
            Ok(next_pc)
        }
        Instruction::Sub { rd, rs1, rs2 } => {
            cpu.write_reg(rd, cpu.read_reg(rs1).wrapping_sub(cpu.read_reg(rs2)));
            Ok(next_pc)
        }
        Instruction::Xor { rd, rs1, rs2 } => {
            cpu.write_reg(rd, cpu.read_reg(rs1) ^ cpu.read_reg(rs2));
            Ok(next_pc)
        }
        Instruction::Or { rd, rs1, rs2 } => {
            cpu.write_reg(rd, cpu.read_reg(rs1) | cpu.read_reg(rs2));
            Ok(next_pc)
        }
        Instruction::And { rd, rs1, rs2 } => {
            cpu.write_reg(rd, cpu.read_reg(rs1) & cpu.read_reg(rs2));
            Ok(next_pc)
        }

        // Register-register shifts; only the low five bits of rs2 count.
        Instruction::Sll { rd, rs1, rs2 } => {
            let shamt = cpu.read_reg(rs2) & 0x1f;
            cpu.write_reg(rd, cpu.read_reg(rs1) << shamt);
            Ok(next_pc)
        }
        Instruction::Srl { rd, rs1, rs2 } => {
            let shamt = cpu.read_reg(rs2) & 0x1f;
            cpu.write_reg(rd, cpu.read_reg(rs1) >> shamt);
            Ok(next_pc)
        }
        Instruction::Sra { rd, rs1, rs2 } => {
            let shamt = cpu.read_reg(rs2) & 0x1f;
            cpu.write_reg(rd, ((cpu.read_reg(rs1) as i32) >> shamt) as u32);
            Ok(next_pc)
        }

        // Register-register comparisons.
        Instruction::Slt { rd, rs1, rs2 } => {
            let lt = (cpu.read_reg(rs1) as i32) < (cpu.read_reg(rs2) as i32);
            cpu.write_reg(rd, u32::from(lt));
            Ok(next_pc)
        }
        Instruction::Sltu { rd, rs1, rs2 } => {
            let lt = cpu.read_reg(rs1) < cpu.read_reg(rs2);
            cpu.write_reg(rd, u32::from(lt));
            Ok(next_pc)
        }

        // Register-immediate forms.
        Instruction::Addi { rd, rs1, imm } => {
            cpu.write_reg(rd, cpu.read_reg(rs1).wrapping_add(imm as u32));
            Ok(next_pc)
        }
        Instruction::Slti { rd, rs1, imm } => {
            let lt = (cpu.read_reg(rs1) as i32) < imm;
            cpu.write_reg(rd, u32::from(lt));
            Ok(next_pc)
        }
        Instruction::Sltiu { rd, rs1, imm } => {
            let lt = cpu.read_reg(rs1) < (imm as u32);
            cpu.write_reg(rd, u32::from(lt));
            Ok(next_pc)
        }
        Instruction::Xori { rd, rs1, imm } => {
            cpu.write_reg(rd, cpu.read_reg(rs1) ^ (imm as u32));
            Ok(next_pc)
        }
        Instruction::Ori { rd, rs1, imm } => {
            cpu.write_reg(rd, cpu.read_reg(rs1) | (imm as u32));
            Ok(next_pc)
        }
        Instruction::Andi { rd, rs1, imm } => {
            cpu.write_reg(rd, cpu.read_reg(rs1) & (imm as u32));
            Ok(next_pc)
        }
        Instruction::Slli { rd, rs1, shamt } => {
            cpu.write_reg(rd, cpu.read_reg(rs1) << (shamt & 0x1f));
            Ok(next_pc)
        }
        Instruction::Srli { rd, rs1, shamt } => {
            cpu.write_reg(rd, cpu.read_reg(rs1) >> (shamt & 0x1f));
            Ok(next_pc)
        }
        Instruction::Srai { rd, rs1, shamt } => {
            cpu.write_reg(rd, ((cpu.read_reg(rs1) as i32) >> (shamt & 0x1f)) as u32);
            Ok(next_pc)
        }

        // Loads: effective address is rs1 + sign-extended immediate. The
        // memory primitive zero-extends; signed sub-word loads re-extend
        // from the loaded width here.
        Instruction::Lb { rd, rs1, imm } => {
            let addr = cpu.read_reg(rs1).wrapping_add(imm as u32);
            let raw = memory.load(addr, Width::Byte, strict_align)?;
            cpu.write_reg(rd, (raw as u8 as i8) as i32 as u32);
            Ok(next_pc)
        }
        Instruction::Lh { rd, rs1, imm } => {
            let addr = cpu.read_reg(rs1).wrapping_add(imm as u32);
            let raw = memory.load(addr, Width::Half, strict_align)?;
            cpu.write_reg(rd, (raw as u16 as i16) as i32 as u32);
            Ok(next_pc)
        }
        Instruction::Lw { rd, rs1, imm } => {
            let addr = cpu.read_reg(rs1).wrapping_add(imm as u32);
            let raw = memory.load(addr, Width::Word, strict_align)?;
            cpu.write_reg(rd, raw);
            Ok(next_pc)
        }
        Instruction::Lbu { rd, rs1, imm } => {
            let addr = cpu.read_reg(rs1).wrapping_add(imm as u32);
            let raw = memory.load(addr, Width::Byte, strict_align)?;
            cpu.write_reg(rd, raw);
            Ok(next_pc)
        }
        Instruction::Lhu { rd, rs1, imm } => {
            let addr = cpu.read_reg(rs1).wrapping_add(imm as u32);
            let raw = memory.load(addr, Width::Half, strict_align)?;
            cpu.write_reg(rd, raw);
            Ok(next_pc)
        }

        // Stores write the low bytes of rs2.
        Instruction::Sb { rs1, rs2, imm } => {
            let addr = cpu.read_reg(rs1).wrapping_add(imm as u32);
            memory.store(addr, Width::Byte, cpu.read_reg(rs2), strict_align)?;
            Ok(next_pc)
        }
        Instruction::Sh { rs1, rs2, imm } => {
            let addr = cpu.read_reg(rs1).wrapping_add(imm as u32);
            memory.store(addr, Width::Half, cpu.read_reg(rs2), strict_align)?;
            Ok(next_pc)
        }
        Instruction::Sw { rs1, rs2, imm } => {
            let addr = cpu.read_reg(rs1).wrapping_add(imm as u32);
            memory.store(addr, Width::Word, cpu.read_reg(rs2), strict_align)?;
            Ok(next_pc)
        }

        // Conditional branches. A taken branch's target must be 4-byte
        // aligned; a not-taken branch just falls through.
        Instruction::Beq { rs1, rs2, imm } => {
            branch(cpu.read_reg(rs1) == cpu.read_reg(rs2), pc, imm)
        }
        Instruction::Bne { rs1, rs2, imm } => {
            branch(cpu.read_reg(rs1) != cpu.read_reg(rs2), pc, imm)
        }
        Instruction::Blt { rs1, rs2, imm } => branch(
            (cpu.read_reg(rs1) as i32) < (cpu.read_reg(rs2) as i32),
            pc,
            imm,
        ),
        Instruction::Bge { rs1, rs2, imm } => branch(
            (cpu.read_reg(rs1) as i32) >= (cpu.read_reg(rs2) as i32),
            pc,
            imm,
        ),
        Instruction::Bltu { rs1, rs2, imm } => {
            branch(cpu.read_reg(rs1) < cpu.read_reg(rs2), pc, imm)
        }
        Instruction::Bgeu { rs1, rs2, imm } => {
            branch(cpu.read_reg(rs1) >= cpu.read_reg(rs2), pc, imm)
        }

        // Jumps: link register receives PC + 4; the write commits only
        // after the target passes the alignment check.
        Instruction::Jal { rd, imm } => {
            let target = control_transfer(pc.wrapping_add(imm as u32))?;
            cpu.write_reg(rd, next_pc);
            Ok(target)
        }
        Instruction::Jalr { rd, rs1, imm } => {
            let target = control_transfer(cpu.read_reg(rs1).wrapping_add(imm as u32))?;
            cpu.write_reg(rd, next_pc);
            Ok(target)
        }

        // Upper immediates; the decoder already positioned imm << 12.
        Instruction::Lui { rd, imm } => {
            cpu.write_reg(rd, imm as u32);
            Ok(next_pc)
        }
        Instruction::Auipc { rd, imm } => {
            cpu.write_reg(rd, pc.wrapping_add(imm as u32));
            Ok(next_pc)
        }

        // Environment call: reported upward for syscall dispatch.
        Instruction::Ecall => Err(TrapCause::Ecall),

        // M-subset ops are routed to the rv32m executor by the dispatcher.
        _ => Err(TrapCause::InvalidInstruction(0)),
    }
}

#[inline]
fn branch(taken: bool, pc: u32, imm: i32) -> VmResult<u32> {
    if taken {
        control_transfer(pc.wrapping_add(imm as u32))
    } else {
        Ok(pc.wrapping_add(4))
    }
}
