//! Decoded instruction representation and the 32-bit word decoder.
//!
//! The cast warnings below are intentionally allowed because RISC-V
//! immediate extraction relies on deliberate signed/unsigned
//! reinterpretation of 32-bit values.

#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]

/// A decoded RV32IM instruction.
///
/// Field conventions: `rd`/`rs1`/`rs2` are register indices 0-31, `imm` is
/// the fully sign-extended immediate, and `shamt` is an explicit 0-31 shift
/// count. Branch and jump immediates are byte offsets: the encoding's
/// halfword pre-shift is resolved at decode time, so execution never
/// re-shifts them.
#[allow(missing_docs)] // Fields follow the RISC-V register/immediate naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // R-type register-register operations.
    Add { rd: u8, rs1: u8, rs2: u8 },
    Sub { rd: u8, rs1: u8, rs2: u8 },
    Sll { rd: u8, rs1: u8, rs2: u8 },
    Slt { rd: u8, rs1: u8, rs2: u8 },
    Sltu { rd: u8, rs1: u8, rs2: u8 },
    Xor { rd: u8, rs1: u8, rs2: u8 },
    Srl { rd: u8, rs1: u8, rs2: u8 },
    Sra { rd: u8, rs1: u8, rs2: u8 },
    Or { rd: u8, rs1: u8, rs2: u8 },
    And { rd: u8, rs1: u8, rs2: u8 },

    // M-subset multiply/divide (the four ops this core supports).
    Mul { rd: u8, rs1: u8, rs2: u8 },
    Mulh { rd: u8, rs1: u8, rs2: u8 },
    Div { rd: u8, rs1: u8, rs2: u8 },
    Rem { rd: u8, rs1: u8, rs2: u8 },

    // I-type register-immediate operations.
    Addi { rd: u8, rs1: u8, imm: i32 },
    Slti { rd: u8, rs1: u8, imm: i32 },
    Sltiu { rd: u8, rs1: u8, imm: i32 },
    Xori { rd: u8, rs1: u8, imm: i32 },
    Ori { rd: u8, rs1: u8, imm: i32 },
    Andi { rd: u8, rs1: u8, imm: i32 },
    Slli { rd: u8, rs1: u8, shamt: u8 },
    Srli { rd: u8, rs1: u8, shamt: u8 },
    Srai { rd: u8, rs1: u8, shamt: u8 },

    // Loads (I-type format).
    Lb { rd: u8, rs1: u8, imm: i32 },
    Lh { rd: u8, rs1: u8, imm: i32 },
    Lw { rd: u8, rs1: u8, imm: i32 },
    Lbu { rd: u8, rs1: u8, imm: i32 },
    Lhu { rd: u8, rs1: u8, imm: i32 },

    // S-type stores.
    Sb { rs1: u8, rs2: u8, imm: i32 },
    Sh { rs1: u8, rs2: u8, imm: i32 },
    Sw { rs1: u8, rs2: u8, imm: i32 },

    // B-type conditional branches.
    Beq { rs1: u8, rs2: u8, imm: i32 },
    Bne { rs1: u8, rs2: u8, imm: i32 },
    Blt { rs1: u8, rs2: u8, imm: i32 },
    Bge { rs1: u8, rs2: u8, imm: i32 },
    Bltu { rs1: u8, rs2: u8, imm: i32 },
    Bgeu { rs1: u8, rs2: u8, imm: i32 },

    // U-type upper immediates (imm already shifted left 12).
    Lui { rd: u8, imm: i32 },
    Auipc { rd: u8, imm: i32 },

    // Jumps.
    Jal { rd: u8, imm: i32 },
    Jalr { rd: u8, rs1: u8, imm: i32 },

    // Environment call (the syscall opcode).
    Ecall,
}

// Primary opcode values, as in the RV32I opcode map.
const OPC_OP: u32 = 0x33;
const OPC_LOAD: u32 = 0x03;
const OPC_OP_IMM: u32 = 0x13;
const OPC_JALR: u32 = 0x67;
const OPC_SYSTEM: u32 = 0x73;
const OPC_STORE: u32 = 0x23;
const OPC_BRANCH: u32 = 0x63;
const OPC_JAL: u32 = 0x6f;
const OPC_AUIPC: u32 = 0x17;
const OPC_LUI: u32 = 0x37;

/// Replicate bit `bits - 1` of `value` into all higher bits.
fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

/// Decode a raw 32-bit instruction word.
///
/// # Errors
///
/// Returns the offending word unchanged when the opcode is outside the
/// recognized set or a funct3/funct7 combination is invalid.
pub(super) fn decode(word: u32) -> Result<Instruction, u32> {
    let opcode = word & 0x7f;
    let rd = ((word >> 7) & 0x1f) as u8;
    let funct3 = (word >> 12) & 0x07;
    let rs1 = ((word >> 15) & 0x1f) as u8;
    let rs2 = ((word >> 20) & 0x1f) as u8;
    let funct7 = word >> 25;

    match opcode {
        OPC_OP => decode_register(rd, funct3, rs1, rs2, funct7).ok_or(word),
        OPC_OP_IMM => decode_immediate(rd, funct3, rs1, word).ok_or(word),
        OPC_LOAD => decode_load(rd, funct3, rs1, word).ok_or(word),
        OPC_STORE => decode_store(funct3, rs1, rs2, word).ok_or(word),
        OPC_BRANCH => decode_branch(funct3, rs1, rs2, word).ok_or(word),
        OPC_JAL => Ok(Instruction::Jal {
            rd,
            imm: jump_offset(word),
        }),
        OPC_JALR => {
            if funct3 != 0 {
                return Err(word);
            }
            Ok(Instruction::Jalr {
                rd,
                rs1,
                imm: i_immediate(word),
            })
        }
        OPC_LUI => Ok(Instruction::Lui {
            rd,
            imm: upper_immediate(word),
        }),
        OPC_AUIPC => Ok(Instruction::Auipc {
            rd,
            imm: upper_immediate(word),
        }),
        OPC_SYSTEM => {
            // Only the bare ecall encoding belongs to this core; ebreak,
            // fences, and CSR instructions are invalid here.
            if funct3 == 0 && rd == 0 && rs1 == 0 && (word >> 20) == 0 {
                Ok(Instruction::Ecall)
            } else {
                Err(word)
            }
        }
        _ => Err(word),
    }
}

fn decode_register(rd: u8, funct3: u32, rs1: u8, rs2: u8, funct7: u32) -> Option<Instruction> {
    let inst = match (funct3, funct7) {
        (0x0, 0x00) => Instruction::Add { rd, rs1, rs2 },
        (0x0, 0x20) => Instruction::Sub { rd, rs1, rs2 },
        (0x1, 0x00) => Instruction::Sll { rd, rs1, rs2 },
        (0x2, 0x00) => Instruction::Slt { rd, rs1, rs2 },
        (0x3, 0x00) => Instruction::Sltu { rd, rs1, rs2 },
        (0x4, 0x00) => Instruction::Xor { rd, rs1, rs2 },
        (0x5, 0x00) => Instruction::Srl { rd, rs1, rs2 },
        (0x5, 0x20) => Instruction::Sra { rd, rs1, rs2 },
        (0x6, 0x00) => Instruction::Or { rd, rs1, rs2 },
        (0x7, 0x00) => Instruction::And { rd, rs1, rs2 },
        // The supported M subset sits at funct7 = 1.
        (0x0, 0x01) => Instruction::Mul { rd, rs1, rs2 },
        (0x1, 0x01) => Instruction::Mulh { rd, rs1, rs2 },
        (0x4, 0x01) => Instruction::Div { rd, rs1, rs2 },
        (0x6, 0x01) => Instruction::Rem { rd, rs1, rs2 },
        _ => return None,
    };
    Some(inst)
}

fn decode_immediate(rd: u8, funct3: u32, rs1: u8, word: u32) -> Option<Instruction> {
    let imm = i_immediate(word);
    // The shift-amount field packs an arithmetic/logical selector in its
    // upper bits; decode it to an explicit (shamt, kind) pair here so
    // execution never infers the kind from the immediate's magnitude.
    let shamt = ((word >> 20) & 0x1f) as u8;
    let funct7 = word >> 25;

    let inst = match funct3 {
        0x0 => Instruction::Addi { rd, rs1, imm },
        0x2 => Instruction::Slti { rd, rs1, imm },
        0x3 => Instruction::Sltiu { rd, rs1, imm },
        0x4 => Instruction::Xori { rd, rs1, imm },
        0x6 => Instruction::Ori { rd, rs1, imm },
        0x7 => Instruction::Andi { rd, rs1, imm },
        0x1 if funct7 == 0x00 => Instruction::Slli { rd, rs1, shamt },
        0x5 if funct7 == 0x00 => Instruction::Srli { rd, rs1, shamt },
        0x5 if funct7 == 0x20 => Instruction::Srai { rd, rs1, shamt },
        _ => return None,
    };
    Some(inst)
}

fn decode_load(rd: u8, funct3: u32, rs1: u8, word: u32) -> Option<Instruction> {
    let imm = i_immediate(word);
    let inst = match funct3 {
        0x0 => Instruction::Lb { rd, rs1, imm },
        0x1 => Instruction::Lh { rd, rs1, imm },
        0x2 => Instruction::Lw { rd, rs1, imm },
        0x4 => Instruction::Lbu { rd, rs1, imm },
        0x5 => Instruction::Lhu { rd, rs1, imm },
        _ => return None,
    };
    Some(inst)
}

fn decode_store(funct3: u32, rs1: u8, rs2: u8, word: u32) -> Option<Instruction> {
    let imm = store_offset(word);
    let inst = match funct3 {
        0x0 => Instruction::Sb { rs1, rs2, imm },
        0x1 => Instruction::Sh { rs1, rs2, imm },
        0x2 => Instruction::Sw { rs1, rs2, imm },
        _ => return None,
    };
    Some(inst)
}

fn decode_branch(funct3: u32, rs1: u8, rs2: u8, word: u32) -> Option<Instruction> {
    let imm = branch_offset(word);
    let inst = match funct3 {
        0x0 => Instruction::Beq { rs1, rs2, imm },
        0x1 => Instruction::Bne { rs1, rs2, imm },
        0x4 => Instruction::Blt { rs1, rs2, imm },
        0x5 => Instruction::Bge { rs1, rs2, imm },
        0x6 => Instruction::Bltu { rs1, rs2, imm },
        0x7 => Instruction::Bgeu { rs1, rs2, imm },
        _ => return None,
    };
    Some(inst)
}

/// I-type immediate: inst[31:20], sign-extended from bit 11.
fn i_immediate(word: u32) -> i32 {
    sign_extend(word >> 20, 12)
}

/// S-type offset: inst[31:25] | inst[11:7], sign-extended from bit 11.
fn store_offset(word: u32) -> i32 {
    let imm = ((word >> 25) << 5) | ((word >> 7) & 0x1f);
    sign_extend(imm, 12)
}

/// B-type offset: 13 bits with bit 0 implied zero, sign-extended from
/// bit 12. Scattered as inst[31|7|30:25|11:8].
fn branch_offset(word: u32) -> i32 {
    let imm = ((word >> 31) << 12)
        | (((word >> 7) & 0x1) << 11)
        | (((word >> 25) & 0x3f) << 5)
        | (((word >> 8) & 0xf) << 1);
    sign_extend(imm, 13)
}

/// U-type immediate: inst[31:12] already positioned in the high 20 bits.
fn upper_immediate(word: u32) -> i32 {
    (word & 0xffff_f000) as i32
}

/// J-type offset: 21 bits with bit 0 implied zero, sign-extended from
/// bit 20. Scattered as inst[31|19:12|20|30:21].
fn jump_offset(word: u32) -> i32 {
    let imm = ((word >> 31) << 20)
        | (((word >> 12) & 0xff) << 12)
        | (((word >> 20) & 0x1) << 11)
        | (((word >> 21) & 0x3ff) << 1);
    sign_extend(imm, 21)
}
