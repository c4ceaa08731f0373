//! MSP430 instruction encoding tables and field extraction.
//!
//! MSP430 uses 16-bit instructions with optional extension words,
//! little-endian encoding. Three formats exist:
//!
//! - Single-operand: `[15:7]` opcode, `[6]` B/W, `[5:4]` As, `[3:0]` register
//! - Jump: `[15:13]=001`, `[12:10]` condition, `[9:0]` signed word offset
//! - Double-operand: `[15:12]` opcode, `[11:8]` src, `[7]` Ad, `[6]` B/W,
//!   `[5:4]` As, `[3:0]` dst

/// Top-level instruction classes (bits 15:12).
pub mod class {
    pub const SINGLE_OP: u8 = 0x1;
    pub const JUMP_LOW: u8 = 0x2;
    pub const JUMP_HIGH: u8 = 0x3;
}

/// Single-operand opcodes, compared against `instr & SINGLE_OP_MASK`.
pub mod single_op {
    pub const RRC: u16 = 0x1000;
    pub const SWPB: u16 = 0x1080;
    pub const RRA: u16 = 0x1100;
    pub const SXT: u16 = 0x1180;
    pub const PUSH: u16 = 0x1200;
    pub const CALL: u16 = 0x1280;
    pub const RETI: u16 = 0x1300;
}

/// Mask selecting the opcode bits of a single-operand instruction.
pub const SINGLE_OP_MASK: u16 = 0xFF80;

/// Double-operand opcodes (bits 15:12).
pub mod two_op {
    pub const MOV: u8 = 0x4;
    pub const ADD: u8 = 0x5;
    pub const ADDC: u8 = 0x6;
    pub const SUBC: u8 = 0x7;
    pub const SUB: u8 = 0x8;
    pub const CMP: u8 = 0x9;
    pub const DADD: u8 = 0xA;
    pub const BIT: u8 = 0xB;
    pub const BIC: u8 = 0xC;
    pub const BIS: u8 = 0xD;
    pub const XOR: u8 = 0xE;
    pub const AND: u8 = 0xF;
}

/// Jump conditions (bits 12:10).
pub mod jump_cond {
    pub const JNE: u8 = 0x0;
    pub const JEQ: u8 = 0x1;
    pub const JNC: u8 = 0x2;
    pub const JC: u8 = 0x3;
    pub const JN: u8 = 0x4;
    pub const JGE: u8 = 0x5;
    pub const JL: u8 = 0x6;
    pub const JMP: u8 = 0x7;
}

/// Addressing modes (As field; Ad uses only the first two).
pub mod addr_mode {
    pub const REGISTER: u8 = 0b00; // Rn
    pub const INDEXED: u8 = 0b01; // X(Rn), &ADDR, ADDR
    pub const INDIRECT: u8 = 0b10; // @Rn
    pub const INDIRECT_INC: u8 = 0b11; // @Rn+, #N
}

/// Register numbers with reserved roles.
pub mod reg {
    pub const PC: u8 = 0;
    pub const SP: u8 = 1;
    /// Status register, doubles as constant generator 1.
    pub const SR: u8 = 2;
    pub const CG1: u8 = 2;
    /// Constant generator 2, never holds addressable data.
    pub const CG2: u8 = 3;
}

/// Well-known encodings.
pub mod patterns {
    /// `MOV @SP+, PC`, reported as `RET`.
    pub const RET: u16 = 0x4130;
}

/// Extract top-level class / double-operand opcode (bits 15:12).
pub fn get_opcode(instr: u16) -> u8 {
    ((instr >> 12) & 0x0F) as u8
}

/// Extract B/W bit (bit 6). `true` means byte mode.
pub fn get_bw(instr: u16) -> bool {
    (instr & 0x0040) != 0
}

/// Extract As field (source addressing mode, bits 5:4).
pub fn get_as(instr: u16) -> u8 {
    ((instr >> 4) & 0x03) as u8
}

/// Extract Ad field (destination addressing mode, bit 7).
pub fn get_ad(instr: u16) -> u8 {
    ((instr >> 7) & 0x01) as u8
}

/// Extract source register (bits 11:8 for two-op).
pub fn get_src_reg(instr: u16) -> u8 {
    ((instr >> 8) & 0x0F) as u8
}

/// Extract destination register (bits 3:0), also the single-op register.
pub fn get_dst_reg(instr: u16) -> u8 {
    (instr & 0x0F) as u8
}

/// Extract jump condition (bits 12:10).
pub fn get_jump_cond(instr: u16) -> u8 {
    ((instr >> 10) & 0x07) as u8
}

/// Jump offset in bytes, relative to the address after the jump.
///
/// The 10-bit field is word granular. Values with bit 9 set are negative:
/// `-(2 * (0x200 - (field & 0x1FF)))`.
pub fn jump_offset_bytes(instr: u16) -> i16 {
    let field = (instr & 0x03FF) as i16;
    if field & 0x200 == 0 {
        2 * field
    } else {
        -(2 * (0x200 - (field & 0x1FF)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_condition_field() {
        assert_eq!(get_opcode(0x3C00), class::JUMP_HIGH);
        assert_eq!(get_opcode(0x2402), class::JUMP_LOW);
        assert_eq!(get_jump_cond(0x3C00), jump_cond::JMP);
        assert_eq!(get_jump_cond(0x2402), jump_cond::JEQ);
    }

    #[test]
    fn test_jump_offset() {
        assert_eq!(jump_offset_bytes(0x2000), 0);
        assert_eq!(jump_offset_bytes(0x2000 | 0x1FF), 0x3FE);
        assert_eq!(jump_offset_bytes(0x2000 | 0x200), -0x400);
        // JMP $ (offset -1 word)
        assert_eq!(jump_offset_bytes(0x3FFF), -2);
    }

    #[test]
    fn test_field_extraction() {
        // MOV R5, R4 = 0x4504
        assert_eq!(get_opcode(0x4504), two_op::MOV);
        assert_eq!(get_src_reg(0x4504), 5);
        assert_eq!(get_dst_reg(0x4504), 4);
        assert!(get_bw(0x4544));
        assert!(!get_bw(0x4504));
    }

    #[test]
    fn test_addressing_fields() {
        // MOV &0x0200, 2(R5)
        assert_eq!(get_as(0x4295), addr_mode::INDEXED);
        assert_eq!(get_src_reg(0x4295), reg::CG1);
        assert_eq!(get_ad(0x4295), 1);
        // MOV @SP+, PC
        assert_eq!(get_as(patterns::RET), addr_mode::INDIRECT_INC);
        assert_eq!(get_src_reg(patterns::RET), reg::SP);
        assert_eq!(get_dst_reg(patterns::RET), reg::PC);
    }
}
