//! The MSP430 register file and status flags.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::encoding::reg;

/// Number of CPU registers.
pub const NUM_REGISTERS: usize = 16;

bitflags! {
    /// Bits of the status register (R2).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct StatusFlags: u16 {
        const CARRY = 0x0001;
        const ZERO = 0x0002;
        const NEGATIVE = 0x0004;
        const GIE = 0x0008;
        const CPUOFF = 0x0010;
        const OSCOFF = 0x0020;
        const SCG0 = 0x0040;
        const SCG1 = 0x0080;
        const OVERFLOW = 0x0100;
    }
}

impl StatusFlags {
    /// Render the arithmetic flags as `VNZC`, with `-` for clear bits.
    pub fn letters(self) -> String {
        [
            (Self::OVERFLOW, 'V'),
            (Self::NEGATIVE, 'N'),
            (Self::ZERO, 'Z'),
            (Self::CARRY, 'C'),
        ]
        .iter()
        .map(|&(flag, c)| if self.contains(flag) { c } else { '-' })
        .collect()
    }
}

/// Sixteen 16-bit registers. R0-R3 are PC, SP, SR/CG1 and CG2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterFile {
    regs: [u16; NUM_REGISTERS],
}

impl RegisterFile {
    /// A register file with every register zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw register values.
    pub fn from_values(regs: [u16; NUM_REGISTERS]) -> Self {
        Self { regs }
    }

    pub fn get(&self, index: u8) -> u16 {
        self.regs[usize::from(index & 0x0F)]
    }

    pub fn set(&mut self, index: u8, value: u16) {
        self.regs[usize::from(index & 0x0F)] = value;
    }

    pub fn pc(&self) -> u16 {
        self.get(reg::PC)
    }

    pub fn sp(&self) -> u16 {
        self.get(reg::SP)
    }

    pub fn sr(&self) -> u16 {
        self.get(reg::SR)
    }

    /// Status register decoded as flags; unknown bits are dropped.
    pub fn status(&self) -> StatusFlags {
        StatusFlags::from_bits_truncate(self.sr())
    }

    pub fn values(&self) -> &[u16; NUM_REGISTERS] {
        &self.regs
    }
}

impl Index<usize> for RegisterFile {
    type Output = u16;

    fn index(&self, index: usize) -> &u16 {
        &self.regs[index]
    }
}

impl IndexMut<usize> for RegisterFile {
    fn index_mut(&mut self, index: usize) -> &mut u16 {
        &mut self.regs[index]
    }
}

/// Assembler name of a register: `PC`, `SP`, `SR`, otherwise `Rn`.
pub fn register_name(index: u8) -> String {
    match index {
        reg::PC => "PC".to_string(),
        reg::SP => "SP".to_string(),
        reg::SR => "SR".to_string(),
        n => format!("R{}", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_letters() {
        let flags = StatusFlags::NEGATIVE | StatusFlags::CARRY;
        assert_eq!(flags.letters(), "-N-C");
        assert_eq!(StatusFlags::empty().letters(), "----");
        assert_eq!(StatusFlags::all().letters(), "VNZC");
    }

    #[test]
    fn test_named_accessors() {
        let mut regs = RegisterFile::new();
        regs.set(0, 0x4000);
        regs.set(1, 0x0A00);
        regs[2] = 0x0103;
        assert_eq!(regs.pc(), 0x4000);
        assert_eq!(regs.sp(), 0x0A00);
        assert_eq!(
            regs.status(),
            StatusFlags::OVERFLOW | StatusFlags::ZERO | StatusFlags::CARRY
        );
    }

    #[test]
    fn test_register_names() {
        assert_eq!(register_name(0), "PC");
        assert_eq!(register_name(2), "SR");
        assert_eq!(register_name(3), "R3");
        assert_eq!(register_name(15), "R15");
    }
}
