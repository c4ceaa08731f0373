//! Flat 64 KiB memory image shared by firmware loading and decoding.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, SimError};

/// Size of the MSP430 16-bit address space.
pub const MEMORY_SIZE: usize = 0x10000;

/// Address of the reset vector.
pub const RESET_VECTOR: u16 = 0xFFFE;

/// Byte-addressed memory image.
#[derive(Clone)]
pub struct MemoryImage {
    bytes: Box<[u8]>,
}

impl Default for MemoryImage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.bytes.iter().filter(|&&b| b != 0).count();
        f.debug_struct("MemoryImage").field("nonzero_bytes", &used).finish()
    }
}

impl MemoryImage {
    /// A zero-filled image.
    pub fn new() -> Self {
        Self {
            bytes: vec![0u8; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    pub fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[usize::from(addr)]
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.bytes[usize::from(addr)] = value;
    }

    /// Little-endian word at `addr`; the high byte wraps to 0x0000 at the top.
    pub fn read_word(&self, addr: u16) -> u16 {
        let start = usize::from(addr);
        if start + 1 < MEMORY_SIZE {
            LittleEndian::read_u16(&self.bytes[start..start + 2])
        } else {
            u16::from_le_bytes([self.bytes[start], self.bytes[0]])
        }
    }

    pub fn write_word(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write_byte(addr, lo);
        self.write_byte(addr.wrapping_add(1), hi);
    }

    /// Copy `data` into the image starting at `addr`.
    pub fn load(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        let start = addr as usize;
        let end = start + data.len();
        if end > MEMORY_SIZE {
            return Err(SimError::out_of_range("memory image", end - 1, MEMORY_SIZE - 1));
        }
        self.bytes[start..end].copy_from_slice(data);
        Ok(())
    }

    /// Up to `len` bytes starting at `addr`, wrapping at the top.
    pub fn slice_wrapping(&self, addr: u16, len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| self.read_byte(addr.wrapping_add(i as u16)))
            .collect()
    }

    /// The word stored in the reset vector.
    pub fn reset_vector(&self) -> u16 {
        self.read_word(RESET_VECTOR)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_little_endian() {
        let mut mem = MemoryImage::new();
        mem.load(0x4000, &[0x30, 0x41]).unwrap();
        assert_eq!(mem.read_word(0x4000), 0x4130);
        mem.write_word(0x4002, 0xBEEF);
        assert_eq!(mem.read_byte(0x4002), 0xEF);
        assert_eq!(mem.read_byte(0x4003), 0xBE);
    }

    #[test]
    fn test_word_wraps_at_top() {
        let mut mem = MemoryImage::new();
        mem.write_byte(0xFFFF, 0x34);
        mem.write_byte(0x0000, 0x12);
        assert_eq!(mem.read_word(0xFFFF), 0x1234);
    }

    #[test]
    fn test_load_out_of_range() {
        let mut mem = MemoryImage::new();
        let err = mem.load(0xFFFF, &[1, 2]).unwrap_err();
        assert!(matches!(err, SimError::OutOfRange { .. }));
        assert!(mem.load(0xFFFE, &[0x00, 0x40]).is_ok());
        assert_eq!(mem.reset_vector(), 0x4000);
    }
}
