//! Firmware image loading.
//!
//! Supported images:
//! - Intel HEX
//! - TI-TXT
//! - Raw binary, placed at a caller-chosen base address

pub mod hex;

use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::cpu::MemoryImage;
use crate::error::Result;

/// Image encodings the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImageFormat {
    IntelHex,
    TiTxt,
    Raw,
}

impl ImageFormat {
    pub fn name(self) -> &'static str {
        match self {
            ImageFormat::IntelHex => "Intel HEX",
            ImageFormat::TiTxt => "TI-TXT",
            ImageFormat::Raw => "raw binary",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What a load wrote into the memory image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub format: ImageFormat,
    /// Records (Intel HEX) or sections (TI-TXT) consumed
    pub records: usize,
    /// Data bytes written
    pub bytes: usize,
    /// Lowest address written
    pub low: Option<u16>,
    /// Highest address written
    pub high: Option<u16>,
    /// Start address record, if the image carried one
    pub entry_point: Option<u32>,
}

impl LoadSummary {
    pub fn new(format: ImageFormat) -> Self {
        Self {
            format,
            records: 0,
            bytes: 0,
            low: None,
            high: None,
            entry_point: None,
        }
    }

    /// Account for `len` bytes written at `addr`. Callers have already
    /// checked the range against the memory image.
    pub(crate) fn note_data(&mut self, addr: u32, len: usize) {
        if len == 0 {
            return;
        }
        let first = addr as u16;
        let last = (addr + len as u32 - 1) as u16;
        self.bytes += len;
        self.low = Some(self.low.map_or(first, |l| l.min(first)));
        self.high = Some(self.high.map_or(last, |h| h.max(last)));
    }
}

/// Detect the image encoding from its first bytes.
pub fn detect(data: &[u8]) -> ImageFormat {
    match data.first() {
        Some(b':') => ImageFormat::IntelHex,
        Some(b'@') if hex::is_ti_txt(data) => ImageFormat::TiTxt,
        _ => ImageFormat::Raw,
    }
}

/// Copy a raw binary to `base`.
pub fn load_raw(data: &[u8], base: u16, memory: &mut MemoryImage) -> Result<LoadSummary> {
    let mut summary = LoadSummary::new(ImageFormat::Raw);
    memory.load(u32::from(base), data)?;
    summary.records = 1;
    summary.note_data(u32::from(base), data.len());
    Ok(summary)
}

/// Detect and load an image held in memory.
pub fn load_bytes(data: &[u8], raw_base: u16, memory: &mut MemoryImage) -> Result<LoadSummary> {
    let format = detect(data);
    debug!("Loading {} image ({} bytes)", format, data.len());
    match format {
        ImageFormat::IntelHex => hex::load_intel_hex(&String::from_utf8_lossy(data), memory),
        ImageFormat::TiTxt => hex::load_ti_txt(&String::from_utf8_lossy(data), memory),
        ImageFormat::Raw => load_raw(data, raw_base, memory),
    }
}

/// Read and load an image from disk.
pub fn load_file<P: AsRef<Path>>(
    path: P,
    raw_base: u16,
    memory: &mut MemoryImage,
) -> Result<LoadSummary> {
    let data = std::fs::read(path.as_ref())?;
    let summary = load_bytes(&data, raw_base, memory)?;
    debug!(
        "Loaded {} bytes from {} ({} records)",
        summary.bytes,
        path.as_ref().display(),
        summary.records
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use std::io::Write;

    #[test]
    fn test_detect() {
        assert_eq!(detect(b":00000001FF\n"), ImageFormat::IntelHex);
        assert_eq!(detect(b"@4000\n00\nq\n"), ImageFormat::TiTxt);
        assert_eq!(detect(&[0x31, 0x40, 0x00, 0x39]), ImageFormat::Raw);
        assert_eq!(detect(b""), ImageFormat::Raw);
    }

    #[test]
    fn test_load_raw() {
        let mut mem = MemoryImage::new();
        let summary = load_raw(&[0x30, 0x41], 0x4000, &mut mem).unwrap();
        assert_eq!(summary.bytes, 2);
        assert_eq!(summary.low, Some(0x4000));
        assert_eq!(summary.high, Some(0x4001));
        assert_eq!(mem.read_word(0x4000), 0x4130);
    }

    #[test]
    fn test_raw_past_top_of_memory() {
        let mut mem = MemoryImage::new();
        let err = load_raw(&[0; 4], 0xFFFE, &mut mem).unwrap_err();
        assert!(matches!(err, SimError::OutOfRange { .. }));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"@4000\n30 41\nq\n").unwrap();
        let mut mem = MemoryImage::new();
        let summary = load_file(file.path(), 0, &mut mem).unwrap();
        assert_eq!(summary.format, ImageFormat::TiTxt);
        assert_eq!(mem.read_word(0x4000), 0x4130);
    }
}
