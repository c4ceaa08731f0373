//! MSP430 instruction decoder.
//!
//! [`decode`] is a pure function of the memory image and register file: it
//! reads the opcode word and any extension words at the program counter,
//! resolves addressing modes (including the constant-generator encodings on
//! R2/R3) and reports the address of the following instruction.
//!
//! Bit patterns outside the format tables decode to
//! [`Mnemonic::Unimplemented`] with the size the format implies, so a
//! linear sweep stays aligned with the instruction stream.

use serde::Serialize;
use std::fmt;
use tracing::warn;

use super::encoding::{
    addr_mode, class, get_ad, get_as, get_bw, get_dst_reg, get_jump_cond, get_opcode,
    get_src_reg, jump_cond, jump_offset_bytes, patterns, reg, single_op, two_op, SINGLE_OP_MASK,
};
use super::memory::MemoryImage;
use super::registers::{register_name, RegisterFile};

/// Instruction format class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Format {
    SingleOperand,
    Jump,
    DoubleOperand,
    /// Top-level class 0x0, which no format defines.
    Unknown,
}

/// Instruction mnemonics, including the emulated `RET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Mnemonic {
    Rrc,
    Swpb,
    Rra,
    Sxt,
    Push,
    Call,
    Reti,
    Jne,
    Jeq,
    Jnc,
    Jc,
    Jn,
    Jge,
    Jl,
    Jmp,
    Mov,
    Add,
    Addc,
    Subc,
    Sub,
    Cmp,
    Dadd,
    Bit,
    Bic,
    Bis,
    Xor,
    And,
    /// `MOV @SP+, PC`
    Ret,
    /// Diagnostic placeholder for undefined encodings.
    Unimplemented,
}

impl Mnemonic {
    /// Assembler spelling without width suffix.
    pub fn name(self) -> &'static str {
        match self {
            Mnemonic::Rrc => "RRC",
            Mnemonic::Swpb => "SWPB",
            Mnemonic::Rra => "RRA",
            Mnemonic::Sxt => "SXT",
            Mnemonic::Push => "PUSH",
            Mnemonic::Call => "CALL",
            Mnemonic::Reti => "RETI",
            Mnemonic::Jne => "JNE",
            Mnemonic::Jeq => "JEQ",
            Mnemonic::Jnc => "JNC",
            Mnemonic::Jc => "JC",
            Mnemonic::Jn => "JN",
            Mnemonic::Jge => "JGE",
            Mnemonic::Jl => "JL",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Mov => "MOV",
            Mnemonic::Add => "ADD",
            Mnemonic::Addc => "ADDC",
            Mnemonic::Subc => "SUBC",
            Mnemonic::Sub => "SUB",
            Mnemonic::Cmp => "CMP",
            Mnemonic::Dadd => "DADD",
            Mnemonic::Bit => "BIT",
            Mnemonic::Bic => "BIC",
            Mnemonic::Bis => "BIS",
            Mnemonic::Xor => "XOR",
            Mnemonic::And => "AND",
            Mnemonic::Ret => "RET",
            Mnemonic::Unimplemented => "???",
        }
    }

    /// Whether the mnemonic carries a `.W`/`.B` suffix.
    pub fn has_width(self) -> bool {
        !matches!(
            self,
            Mnemonic::Call
                | Mnemonic::Reti
                | Mnemonic::Ret
                | Mnemonic::Unimplemented
                | Mnemonic::Jne
                | Mnemonic::Jeq
                | Mnemonic::Jnc
                | Mnemonic::Jc
                | Mnemonic::Jn
                | Mnemonic::Jge
                | Mnemonic::Jl
                | Mnemonic::Jmp
        )
    }

    fn single_operand(instr: u16) -> Self {
        match instr & SINGLE_OP_MASK {
            single_op::RRC => Mnemonic::Rrc,
            single_op::SWPB => Mnemonic::Swpb,
            single_op::RRA => Mnemonic::Rra,
            single_op::SXT => Mnemonic::Sxt,
            single_op::PUSH => Mnemonic::Push,
            single_op::CALL => Mnemonic::Call,
            single_op::RETI => Mnemonic::Reti,
            _ => Mnemonic::Unimplemented,
        }
    }

    fn jump(cond: u8) -> Self {
        match cond {
            jump_cond::JNE => Mnemonic::Jne,
            jump_cond::JEQ => Mnemonic::Jeq,
            jump_cond::JNC => Mnemonic::Jnc,
            jump_cond::JC => Mnemonic::Jc,
            jump_cond::JN => Mnemonic::Jn,
            jump_cond::JGE => Mnemonic::Jge,
            jump_cond::JL => Mnemonic::Jl,
            _ => Mnemonic::Jmp,
        }
    }

    fn double_operand(opcode: u8) -> Self {
        match opcode {
            two_op::MOV => Mnemonic::Mov,
            two_op::ADD => Mnemonic::Add,
            two_op::ADDC => Mnemonic::Addc,
            two_op::SUBC => Mnemonic::Subc,
            two_op::SUB => Mnemonic::Sub,
            two_op::CMP => Mnemonic::Cmp,
            two_op::DADD => Mnemonic::Dadd,
            two_op::BIT => Mnemonic::Bit,
            two_op::BIC => Mnemonic::Bic,
            two_op::BIS => Mnemonic::Bis,
            two_op::XOR => Mnemonic::Xor,
            two_op::AND => Mnemonic::And,
            _ => Mnemonic::Unimplemented,
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Operand addressing mode as encoded in As/Ad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AddressingMode {
    Register,
    Indexed,
    Indirect,
    IndirectAutoIncrement,
}

impl AddressingMode {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            addr_mode::REGISTER => AddressingMode::Register,
            addr_mode::INDEXED => AddressingMode::Indexed,
            addr_mode::INDIRECT => AddressingMode::Indirect,
            _ => AddressingMode::IndirectAutoIncrement,
        }
    }
}

/// What an operand resolved to at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperandValue {
    /// Register contents.
    Register,
    /// Constant synthesized by R2/R3; register storage is not read.
    Constant(u16),
    /// `#N`, the extension word following `@PC+`.
    Immediate(u16),
    /// `X(Rn)`: `base` is the register value (the extension word's own
    /// address for PC-relative operands).
    Indexed { base: u16, offset: u16, address: u16 },
    /// `&ADDR`, indexed through R2 which contributes 0.
    Absolute(u16),
    /// `@Rn`
    Indirect(u16),
    /// `@Rn+`, address before the increment.
    AutoIncrement(u16),
}

/// A decoded source or destination operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Operand {
    pub mode: AddressingMode,
    pub register: u8,
    pub value: OperandValue,
}

impl Operand {
    /// Memory address the operand refers to, if any.
    pub fn effective_address(&self) -> Option<u16> {
        match self.value {
            OperandValue::Indexed { address, .. } => Some(address),
            OperandValue::Absolute(address)
            | OperandValue::Indirect(address)
            | OperandValue::AutoIncrement(address) => Some(address),
            _ => None,
        }
    }

    /// Immediate value, either synthesized or read from an extension word.
    pub fn immediate(&self) -> Option<u16> {
        match self.value {
            OperandValue::Constant(v) | OperandValue::Immediate(v) => Some(v),
            _ => None,
        }
    }

    /// Register contribution to the effective address of an indexed operand.
    pub fn index_base(&self) -> Option<u16> {
        match self.value {
            OperandValue::Indexed { base, .. } => Some(base),
            OperandValue::Absolute(_) => Some(0),
            _ => None,
        }
    }

    pub fn is_constant_generated(&self) -> bool {
        matches!(self.value, OperandValue::Constant(_))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = register_name(self.register);
        match self.value {
            OperandValue::Register => write!(f, "{}", name),
            OperandValue::Constant(v) => write!(f, "#{}", v as i16),
            OperandValue::Immediate(v) => write!(f, "#0x{:04x}", v),
            OperandValue::Indexed { address, .. } if self.register == reg::PC => {
                write!(f, "0x{:04x}", address)
            }
            OperandValue::Indexed { offset, .. } => write!(f, "0x{:04x}({})", offset, name),
            OperandValue::Absolute(address) => write!(f, "&0x{:04x}", address),
            OperandValue::Indirect(_) => write!(f, "@{}", name),
            OperandValue::AutoIncrement(_) => write!(f, "@{}+", name),
        }
    }
}

/// Resolved jump displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JumpTarget {
    /// Byte offset relative to the address after the jump.
    pub offset: i16,
    pub target: u16,
}

/// A fully decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedInstruction {
    /// Address of the opcode word.
    pub address: u16,
    /// The opcode word.
    pub opcode: u16,
    pub format: Format,
    pub mnemonic: Mnemonic,
    /// Byte (`.B`) operation; always false where width does not apply.
    pub byte_mode: bool,
    pub src: Option<Operand>,
    pub dst: Option<Operand>,
    pub jump: Option<JumpTarget>,
    /// Encoded size in bytes: 2, 4 or 6.
    pub size: u8,
    /// Interrupt being serviced when decoded, 0 if none.
    pub interrupt: u8,
}

impl DecodedInstruction {
    /// Address of the instruction that follows in memory.
    pub fn next_address(&self) -> u16 {
        self.address.wrapping_add(u16::from(self.size))
    }

    pub fn is_implemented(&self) -> bool {
        self.mnemonic != Mnemonic::Unimplemented
    }

    /// Mnemonic with `.W`/`.B` suffix where it applies.
    pub fn opcode_text(&self) -> String {
        if self.mnemonic.has_width() {
            format!("{}{}", self.mnemonic, if self.byte_mode { ".B" } else { ".W" })
        } else {
            self.mnemonic.name().to_string()
        }
    }

    /// Mnemonic and operands, e.g. `MOV.W #0x1234, R5`.
    pub fn text(&self) -> String {
        let op = self.opcode_text();
        match self.mnemonic {
            Mnemonic::Ret | Mnemonic::Reti => op,
            Mnemonic::Unimplemented => format!("{} 0x{:04x}", op, self.opcode),
            _ => match (&self.src, &self.dst, &self.jump) {
                (_, _, Some(jump)) => format!("{} 0x{:04x}", op, jump.target),
                (Some(src), Some(dst), _) => format!("{} {}, {}", op, src, dst),
                (Some(src), None, _) => format!("{} {}", op, src),
                _ => op,
            },
        }
    }
}

impl fmt::Display for DecodedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// Sequential reader over extension words following the opcode.
struct WordCursor<'a> {
    memory: &'a MemoryImage,
    pos: u16,
}

impl<'a> WordCursor<'a> {
    /// Returns the address of the word and its value.
    fn next(&mut self) -> (u16, u16) {
        let addr = self.pos;
        self.pos = self.pos.wrapping_add(2);
        (addr, self.memory.read_word(addr))
    }
}

/// Resolve an As-encoded operand, honouring the constant generators.
fn resolve_source(
    mode: u8,
    register: u8,
    regs: &RegisterFile,
    words: &mut WordCursor<'_>,
) -> Operand {
    let value = match (mode, register) {
        (addr_mode::REGISTER, reg::CG2) => OperandValue::Constant(0),
        (addr_mode::REGISTER, _) => OperandValue::Register,

        (addr_mode::INDEXED, reg::CG2) => OperandValue::Constant(1),
        (addr_mode::INDEXED, reg::CG1) => OperandValue::Absolute(words.next().1),
        (addr_mode::INDEXED, reg::PC) => {
            let (base, offset) = words.next();
            OperandValue::Indexed {
                base,
                offset,
                address: base.wrapping_add(offset),
            }
        }
        (addr_mode::INDEXED, _) => {
            let base = regs.get(register);
            let offset = words.next().1;
            OperandValue::Indexed {
                base,
                offset,
                address: base.wrapping_add(offset),
            }
        }

        (addr_mode::INDIRECT, reg::CG2) => OperandValue::Constant(2),
        (addr_mode::INDIRECT, reg::CG1) => OperandValue::Constant(4),
        (addr_mode::INDIRECT, _) => OperandValue::Indirect(regs.get(register)),

        (_, reg::CG2) => OperandValue::Constant(0xFFFF),
        (_, reg::CG1) => OperandValue::Constant(8),
        (_, reg::PC) => OperandValue::Immediate(words.next().1),
        (_, _) => OperandValue::AutoIncrement(regs.get(register)),
    };

    Operand {
        mode: AddressingMode::from_bits(mode),
        register,
        value,
    }
}

/// Resolve an Ad-encoded destination. Ad=1 on R2 is absolute.
fn resolve_destination(
    ad: u8,
    register: u8,
    regs: &RegisterFile,
    words: &mut WordCursor<'_>,
) -> Operand {
    if ad == 0 {
        return Operand {
            mode: AddressingMode::Register,
            register,
            value: OperandValue::Register,
        };
    }

    let (ext_addr, offset) = words.next();
    let value = match register {
        reg::SR => OperandValue::Absolute(offset),
        reg::PC => OperandValue::Indexed {
            base: ext_addr,
            offset,
            address: ext_addr.wrapping_add(offset),
        },
        _ => {
            let base = regs.get(register);
            OperandValue::Indexed {
                base,
                offset,
                address: base.wrapping_add(offset),
            }
        }
    };

    Operand {
        mode: AddressingMode::Indexed,
        register,
        value,
    }
}

/// Decode the instruction at `pc`.
///
/// Returns the decoded instruction and the address of the next one. Neither
/// `memory` nor `regs` is modified.
pub fn decode(
    pc: u16,
    memory: &MemoryImage,
    regs: &RegisterFile,
    interrupt: u8,
) -> (DecodedInstruction, u16) {
    let instr = memory.read_word(pc);
    let mut words = WordCursor {
        memory,
        pos: pc.wrapping_add(2),
    };

    let mut insn = DecodedInstruction {
        address: pc,
        opcode: instr,
        format: Format::Unknown,
        mnemonic: Mnemonic::Unimplemented,
        byte_mode: false,
        src: None,
        dst: None,
        jump: None,
        size: 2,
        interrupt,
    };

    match get_opcode(instr) {
        class::SINGLE_OP => {
            insn.format = Format::SingleOperand;
            insn.mnemonic = Mnemonic::single_operand(instr);
            insn.byte_mode = get_bw(instr) && insn.mnemonic.has_width();
            insn.src = Some(resolve_source(
                get_as(instr),
                get_dst_reg(instr),
                regs,
                &mut words,
            ));
        }
        class::JUMP_LOW | class::JUMP_HIGH => {
            let offset = jump_offset_bytes(instr);
            insn.format = Format::Jump;
            insn.mnemonic = Mnemonic::jump(get_jump_cond(instr));
            insn.jump = Some(JumpTarget {
                offset,
                target: pc.wrapping_add(2).wrapping_add(offset as u16),
            });
        }
        op if op >= two_op::MOV => {
            insn.format = Format::DoubleOperand;
            insn.mnemonic = if instr == patterns::RET {
                Mnemonic::Ret
            } else {
                Mnemonic::double_operand(op)
            };
            insn.byte_mode = get_bw(instr) && insn.mnemonic.has_width();
            // Source extension word precedes the destination's.
            insn.src = Some(resolve_source(
                get_as(instr),
                get_src_reg(instr),
                regs,
                &mut words,
            ));
            insn.dst = Some(resolve_destination(
                get_ad(instr),
                get_dst_reg(instr),
                regs,
                &mut words,
            ));
        }
        _ => {}
    }

    insn.size = words.pos.wrapping_sub(pc) as u8;

    if !insn.is_implemented() {
        warn!(
            "Not implemented instruction at 0x{:04x}: 0x{:04x} ({:016b})",
            pc, instr, instr
        );
    }

    let next = insn.next_address();
    (insn, next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(at: u16, words: &[u16]) -> MemoryImage {
        let mut mem = MemoryImage::new();
        for (i, w) in words.iter().enumerate() {
            mem.write_word(at.wrapping_add(2 * i as u16), *w);
        }
        mem
    }

    fn decode_words(words: &[u16]) -> DecodedInstruction {
        let mem = image(0x4000, words);
        decode(0x4000, &mem, &RegisterFile::new(), 0).0
    }

    #[test]
    fn test_single_operand_table() {
        let cases = [
            (single_op::RRC, Mnemonic::Rrc),
            (single_op::SWPB, Mnemonic::Swpb),
            (single_op::RRA, Mnemonic::Rra),
            (single_op::SXT, Mnemonic::Sxt),
            (single_op::PUSH, Mnemonic::Push),
            (single_op::CALL, Mnemonic::Call),
            (single_op::RETI, Mnemonic::Reti),
        ];
        for (base, mnemonic) in cases {
            for mode in 0u16..4 {
                for byte in [false, true] {
                    let width = if byte { 0x40 } else { 0 };
                    let instr = base | (mode << 4) | width | 5;
                    let insn = decode_words(&[instr, 0x0010]);
                    assert_eq!(insn.mnemonic, mnemonic);
                    assert_eq!(insn.format, Format::SingleOperand);
                    let expected_size = if mode == 1 { 4 } else { 2 };
                    assert_eq!(insn.size, expected_size, "instr 0x{:04x}", instr);
                    let width_applies = !matches!(mnemonic, Mnemonic::Call | Mnemonic::Reti);
                    assert_eq!(insn.byte_mode, byte && width_applies);
                    if width_applies {
                        let suffix = if byte { ".B" } else { ".W" };
                        assert_eq!(insn.opcode_text(), format!("{}{}", mnemonic, suffix));
                    } else {
                        assert_eq!(insn.opcode_text(), mnemonic.name());
                    }
                }
            }
        }
    }

    #[test]
    fn test_single_operand_immediate_via_pc() {
        // CALL #0x4400
        let insn = decode_words(&[0x12B0, 0x4400]);
        assert_eq!(insn.mnemonic, Mnemonic::Call);
        assert_eq!(insn.size, 4);
        assert_eq!(insn.src.unwrap().value, OperandValue::Immediate(0x4400));
        assert_eq!(insn.text(), "CALL #0x4400");
    }

    #[test]
    fn test_single_operand_absolute() {
        // PUSH &0x0200
        let insn = decode_words(&[0x1212, 0x0200]);
        assert_eq!(insn.size, 4);
        assert_eq!(insn.src.unwrap().value, OperandValue::Absolute(0x0200));
    }

    #[test]
    fn test_unimplemented_single_operand_keeps_size() {
        let insn = decode_words(&[0x1395, 0x0004]);
        assert_eq!(insn.mnemonic, Mnemonic::Unimplemented);
        assert_eq!(insn.size, 4);
    }

    #[test]
    fn test_unknown_class_zero() {
        let (insn, next) = decode(0x4000, &image(0x4000, &[0x0123]), &RegisterFile::new(), 0);
        assert_eq!(insn.format, Format::Unknown);
        assert!(!insn.is_implemented());
        assert_eq!(next, 0x4002);
    }

    #[test]
    fn test_jump_offsets() {
        let insn = decode_words(&[0x2000]);
        assert_eq!(insn.mnemonic, Mnemonic::Jne);
        assert_eq!(insn.jump.unwrap().offset, 0);
        assert_eq!(insn.jump.unwrap().target, 0x4002);

        let insn = decode_words(&[0x2000 | 0x1FF]);
        assert_eq!(insn.jump.unwrap().offset, 0x3FE);

        let insn = decode_words(&[0x2000 | 0x200]);
        assert_eq!(insn.jump.unwrap().offset, -0x400);
        assert_eq!(insn.jump.unwrap().target, 0x4002u16.wrapping_sub(0x400));
    }

    #[test]
    fn test_jump_conditions() {
        let expected = [
            Mnemonic::Jne,
            Mnemonic::Jeq,
            Mnemonic::Jnc,
            Mnemonic::Jc,
            Mnemonic::Jn,
            Mnemonic::Jge,
            Mnemonic::Jl,
            Mnemonic::Jmp,
        ];
        for (cond, mnemonic) in expected.iter().enumerate() {
            let insn = decode_words(&[0x2000 | ((cond as u16) << 10)]);
            assert_eq!(insn.mnemonic, *mnemonic);
            assert_eq!(insn.size, 2);
            assert!(!insn.byte_mode);
        }
    }

    #[test]
    fn test_constant_generators() {
        let mut regs = RegisterFile::new();
        regs.set(2, 0x1234);
        regs.set(3, 0x5555);
        let cases: [(u16, u16); 6] = [
            // (instr, constant), all with dst R5
            (0x4305, 0),      // MOV R3, R5
            (0x4315, 1),      // MOV 0(R3), R5
            (0x4325, 2),      // MOV @R3, R5
            (0x4335, 0xFFFF), // MOV @R3+, R5
            (0x4225, 4),      // MOV @R2, R5
            (0x4235, 8),      // MOV @R2+, R5
        ];
        for (instr, constant) in cases {
            let mem = image(0x4000, &[instr]);
            let (insn, next) = decode(0x4000, &mem, &regs, 0);
            let src = insn.src.unwrap();
            assert!(src.is_constant_generated());
            assert_eq!(src.immediate(), Some(constant), "instr 0x{:04x}", instr);
            assert_eq!(insn.size, 2);
            assert_eq!(next, 0x4002);
        }
    }

    #[test]
    fn test_cg1_indexed_is_absolute() {
        let mut regs = RegisterFile::new();
        regs.set(2, 0x1234);
        // MOV &0x0200, R5
        let mem = image(0x4000, &[0x4215, 0x0200]);
        let (insn, _) = decode(0x4000, &mem, &regs, 0);
        let src = insn.src.unwrap();
        assert_eq!(src.value, OperandValue::Absolute(0x0200));
        assert_eq!(src.index_base(), Some(0));
        assert_eq!(src.effective_address(), Some(0x0200));
        assert_eq!(insn.size, 4);
    }

    #[test]
    fn test_sr_register_direct() {
        let insn = decode_words(&[0x4205]);
        assert_eq!(insn.src.unwrap().value, OperandValue::Register);
        assert_eq!(insn.text(), "MOV.W SR, R5");
    }

    #[test]
    fn test_double_operand_sizes() {
        // MOV #0x1234, R5
        let insn = decode_words(&[0x4035, 0x1234]);
        assert_eq!(insn.size, 4);
        assert_eq!(insn.src.unwrap().immediate(), Some(0x1234));

        // MOV 4(R6), 2(R7)
        let insn = decode_words(&[0x4697, 0x0004, 0x0002]);
        assert_eq!(insn.size, 6);
        assert_eq!(insn.text(), "MOV.W 0x0004(R6), 0x0002(R7)");

        // MOV.B R4, &0x0021
        let insn = decode_words(&[0x44C2, 0x0021]);
        assert_eq!(insn.size, 4);
        assert!(insn.byte_mode);
        assert_eq!(insn.text(), "MOV.B R4, &0x0021");

        // MOV &0x0200, 2(R5): absolute source and indexed destination
        let insn = decode_words(&[0x4295, 0x0200, 0x0002]);
        assert_eq!(insn.size, 6);

        // MOV #1, R5 through R3 takes no extension word
        assert_eq!(decode_words(&[0x4315]).size, 2);
    }

    #[test]
    fn test_indexed_uses_register_value() {
        let mut regs = RegisterFile::new();
        regs.set(6, 0x0200);
        let mem = image(0x4000, &[0x5695, 0x0010, 0x0000]);
        let (insn, _) = decode(0x4000, &mem, &regs, 0);
        assert_eq!(insn.mnemonic, Mnemonic::Add);
        assert_eq!(insn.src.unwrap().effective_address(), Some(0x0210));
    }

    #[test]
    fn test_ret_is_recognized() {
        let mut mem = MemoryImage::new();
        mem.load(0x4000, &[0x30, 0x41]).unwrap();
        let (insn, next) = decode(0x4000, &mem, &RegisterFile::new(), 0);
        assert_eq!(insn.mnemonic, Mnemonic::Ret);
        assert_eq!(insn.opcode_text(), "RET");
        assert_eq!(next, 0x4002);
    }

    #[test]
    fn test_decode_is_pure() {
        let mem = image(0x4000, &[0x4035, 0x1234]);
        let regs = RegisterFile::from_values([7; 16]);
        let before = mem.clone();
        let _ = decode(0x4000, &mem, &regs, 3);
        assert_eq!(mem.as_slice(), before.as_slice());
        assert_eq!(regs, RegisterFile::from_values([7; 16]));
    }
}
