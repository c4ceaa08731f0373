//! MSP430 CPU-side state and instruction decoding.

pub mod decoder;
pub mod encoding;
pub mod memory;
pub mod registers;

pub use decoder::{
    decode, AddressingMode, DecodedInstruction, Format, JumpTarget, Mnemonic, Operand,
    OperandValue,
};
pub use memory::{MemoryImage, MEMORY_SIZE, RESET_VECTOR};
pub use registers::{register_name, RegisterFile, StatusFlags, NUM_REGISTERS};
