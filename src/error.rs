//! Error types for the simulator.
//!
//! Decoding and symbol-map parsing never fail: they degrade to placeholder
//! instructions or skipped lines. The variants here cover contract
//! violations against the chip models and problems loading external files.

use thiserror::Error;

/// Primary error type for the simulator.
#[derive(Debug, Error)]
pub enum SimError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A byte was exchanged with a chip whose chip-select is deasserted.
    #[error("{chip}: byte exchanged while chip-select is deasserted")]
    ChipNotSelected { chip: &'static str },

    /// Access outside the storage of a register bank, RAM or memory image.
    #[error("{what} address 0x{address:X} out of range (limit 0x{limit:X})")]
    OutOfRange {
        what: &'static str,
        address: u32,
        limit: u32,
    },

    /// An injected packet does not fit the receive FIFO.
    #[error("Packet of {len} bytes does not fit the RX FIFO (max {max})")]
    PacketTooLarge { len: usize, max: usize },

    /// Malformed record in a firmware image.
    #[error("Invalid hex record at line {line}: {message}")]
    InvalidHexRecord { line: usize, message: String },

    /// Intel HEX record checksum did not match.
    #[error("Checksum mismatch at line {line}: expected 0x{expected:02X}, got 0x{actual:02X}")]
    ChecksumMismatch { line: usize, expected: u8, actual: u8 },

    /// Platform name not in the supported set.
    #[error("Unsupported platform '{name}'")]
    UnknownPlatform { name: String },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for simulator operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    pub(crate) fn out_of_range(what: &'static str, address: usize, limit: usize) -> Self {
        SimError::OutOfRange {
            what,
            address: address as u32,
            limit: limit as u32,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Config {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::PacketTooLarge { len: 200, max: 125 };
        assert!(err.to_string().contains("200"));
        assert!(err.to_string().contains("125"));
    }

    #[test]
    fn test_out_of_range_display() {
        let err = SimError::out_of_range("CC2420 RAM", 0x200, 0x1FF);
        let msg = err.to_string();
        assert!(msg.contains("0x200"));
        assert!(msg.contains("CC2420 RAM"));
    }

    #[test]
    fn test_json_error_maps_to_config() {
        let err: SimError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, SimError::Config { .. }));
    }
}
