//! Text-based firmware image loaders.
//!
//! This module handles:
//! - Intel HEX (.hex, .ihex)
//! - TI-TXT (.txt)
//!
//! Both write straight into a [`MemoryImage`]. Intel HEX records are
//! checksum-verified.

use byteorder::{BigEndian, ByteOrder};
use tracing::{debug, trace};

use super::{ImageFormat, LoadSummary};
use crate::cpu::MemoryImage;
use crate::error::{Result, SimError};

/// Intel HEX record types.
pub mod intel_hex {
    pub const DATA: u8 = 0x00;
    pub const EOF: u8 = 0x01;
    pub const EXT_SEGMENT: u8 = 0x02;
    pub const START_SEGMENT: u8 = 0x03;
    pub const EXT_LINEAR: u8 = 0x04;
    pub const START_LINEAR: u8 = 0x05;
}

/// Whether the text opens with a TI-TXT `@ADDR` line.
pub fn is_ti_txt(data: &[u8]) -> bool {
    if data.first() != Some(&b'@') {
        return false;
    }
    let text = String::from_utf8_lossy(data);
    text.lines().next().map_or(false, |first| {
        let digits = first.trim()[1..].trim();
        !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit())
    })
}

fn invalid(line: usize, message: impl Into<String>) -> SimError {
    SimError::InvalidHexRecord {
        line,
        message: message.into(),
    }
}

/// Two's complement of the byte sum, as stored in the last byte of a record.
fn record_checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b))
        .wrapping_neg()
}

fn be_u16(bytes: &[u8]) -> u32 {
    u32::from(BigEndian::read_u16(bytes))
}

/// Load Intel HEX text into `memory`.
pub fn load_intel_hex(text: &str, memory: &mut MemoryImage) -> Result<LoadSummary> {
    let mut summary = LoadSummary::new(ImageFormat::IntelHex);
    let mut base: u32 = 0;
    let mut saw_eof = false;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let body = line
            .strip_prefix(':')
            .ok_or_else(|| invalid(line_no, "record does not start with ':'"))?;
        let bytes = ::hex::decode(body).map_err(|e| invalid(line_no, e.to_string()))?;
        if bytes.len() < 5 {
            return Err(invalid(line_no, "record too short"));
        }

        let count = usize::from(bytes[0]);
        if bytes.len() != count + 5 {
            return Err(invalid(
                line_no,
                format!("byte count {} does not match record length", count),
            ));
        }

        let (record, checksum) = bytes.split_at(bytes.len() - 1);
        let expected = record_checksum(record);
        if expected != checksum[0] {
            return Err(SimError::ChecksumMismatch {
                line: line_no,
                expected,
                actual: checksum[0],
            });
        }

        let address = be_u16(&record[1..3]);
        let rec_type = record[3];
        let data = &record[4..];
        summary.records += 1;

        match rec_type {
            intel_hex::DATA => {
                let full = base + address;
                trace!("ihex: {} bytes at 0x{:05x}", data.len(), full);
                memory.load(full, data)?;
                summary.note_data(full, data.len());
            }
            intel_hex::EOF => {
                saw_eof = true;
                break;
            }
            intel_hex::EXT_SEGMENT if data.len() == 2 => {
                base = be_u16(data) << 4;
            }
            intel_hex::START_SEGMENT if data.len() == 4 => {
                summary.entry_point = Some((be_u16(&data[0..2]) << 4) + be_u16(&data[2..4]));
            }
            intel_hex::EXT_LINEAR if data.len() == 2 => {
                base = be_u16(data) << 16;
            }
            intel_hex::START_LINEAR if data.len() == 4 => {
                summary.entry_point = Some((be_u16(&data[0..2]) << 16) | be_u16(&data[2..4]));
            }
            intel_hex::EXT_SEGMENT
            | intel_hex::START_SEGMENT
            | intel_hex::EXT_LINEAR
            | intel_hex::START_LINEAR => {
                return Err(invalid(line_no, format!("bad length for record type {:02X}", rec_type)));
            }
            other => {
                return Err(invalid(line_no, format!("unknown record type {:02X}", other)));
            }
        }
    }

    if !saw_eof {
        debug!("ihex: no EOF record");
    }
    Ok(summary)
}

/// Load TI-TXT text into `memory`.
pub fn load_ti_txt(text: &str, memory: &mut MemoryImage) -> Result<LoadSummary> {
    let mut summary = LoadSummary::new(ImageFormat::TiTxt);
    let mut current: Option<u32> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        if let Some(addr) = line.strip_prefix('@') {
            let addr = u32::from_str_radix(addr.trim(), 16)
                .map_err(|e| invalid(line_no, format!("bad section address: {}", e)))?;
            trace!("ti-txt: section at 0x{:04x}", addr);
            current = Some(addr);
            summary.records += 1;
        } else if line.eq_ignore_ascii_case("q") {
            break;
        } else if !line.is_empty() {
            let addr = current.ok_or_else(|| invalid(line_no, "data before first '@' section"))?;
            let data = line
                .split_whitespace()
                .map(|tok| u8::from_str_radix(tok, 16))
                .collect::<std::result::Result<Vec<u8>, _>>()
                .map_err(|e| invalid(line_no, e.to_string()))?;
            memory.load(addr, &data)?;
            summary.note_data(addr, data.len());
            current = Some(addr + data.len() as u32);
        }
    }

    Ok(summary)
}
