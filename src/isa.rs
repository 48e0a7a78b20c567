//! RV32IM instruction set: decoded representation and execution.

mod instruction;
mod rv32i;
mod rv32m;

pub use instruction::Instruction;
pub(crate) use rv32i::execute_rv32i;
pub(crate) use rv32m::execute_rv32m;

/// Decode a 32-bit instruction word.
///
/// # Errors
///
/// Returns the original word if it does not encode an instruction this
/// core recognizes.
pub fn decode(word: u32) -> Result<Instruction, u32> {
    instruction::decode(word)
}
