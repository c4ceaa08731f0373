//! Shared option and configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, SimError};

/// Supported node platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Tmote Sky / TelosB: MSP430F1611 with a CC2420 transceiver.
    #[default]
    Sky,
    /// Scatterweb ESB: MSP430F149, no CC2420.
    Esb,
}

impl Platform {
    /// All platforms, in the order they are listed to users.
    pub const ALL: [Platform; 2] = [Platform::Sky, Platform::Esb];

    pub fn name(self) -> &'static str {
        match self {
            Platform::Sky => "sky",
            Platform::Esb => "esb",
        }
    }

    /// Whether the node carries a CC2420 radio.
    pub fn has_cc2420(self) -> bool {
        matches!(self, Platform::Sky)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Platform {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.name() == lower)
            .ok_or_else(|| SimError::UnknownPlatform {
                name: s.to_string(),
            })
    }
}

/// What the trace formatter renders for each instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceOptions {
    /// Emit the register line under each instruction
    pub show_registers: bool,
    /// Emit `//// name` headers at known symbols
    pub show_symbols: bool,
    /// Emit the raw instruction bytes
    pub show_bytes: bool,
    /// Consult the debugger hook after every instruction
    pub step: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self {
            show_registers: false,
            show_symbols: true,
            show_bytes: true,
            step: false,
        }
    }

    /// Everything, including register lines.
    pub fn verbose() -> Self {
        Self {
            show_registers: true,
            ..Self::new()
        }
    }

    /// Mnemonics only.
    pub fn quiet() -> Self {
        Self {
            show_registers: false,
            show_symbols: false,
            show_bytes: false,
            step: false,
        }
    }
}

/// Node configuration, usually read from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub platform: Platform,
    /// Firmware image (Intel HEX, TI-TXT or raw binary)
    pub firmware: Option<PathBuf>,
    /// Linker map for symbol annotation
    pub map_file: Option<PathBuf>,
    /// Load address used for raw binaries
    pub load_address: u16,
    /// First address to trace; the reset vector when unset
    pub start: Option<u16>,
    /// Number of instructions to trace
    pub count: usize,
    pub trace: TraceOptions,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            firmware: None,
            map_file: None,
            load_address: 0x4000,
            start: None,
            count: 32,
            trace: TraceOptions::new(),
        }
    }
}

impl SimConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_from_str() {
        assert_eq!("sky".parse::<Platform>().unwrap(), Platform::Sky);
        assert_eq!("ESB".parse::<Platform>().unwrap(), Platform::Esb);
        let err = "telos".parse::<Platform>().unwrap_err();
        assert!(matches!(err, SimError::UnknownPlatform { .. }));
    }

    #[test]
    fn test_trace_options() {
        let default = TraceOptions::new();
        assert!(!default.show_registers);
        assert!(default.show_symbols);

        let verbose = TraceOptions::verbose();
        assert!(verbose.show_registers);

        let quiet = TraceOptions::quiet();
        assert!(!quiet.show_bytes);
        assert!(!quiet.show_symbols);
    }

    #[test]
    fn test_config_json_defaults() {
        let config = SimConfig::from_json_str(r#"{"platform": "esb", "count": 4}"#).unwrap();
        assert_eq!(config.platform, Platform::Esb);
        assert_eq!(config.count, 4);
        assert_eq!(config.load_address, 0x4000);
        assert_eq!(config.trace, TraceOptions::new());
    }

    #[test]
    fn test_config_rejects_bad_platform() {
        let err = SimConfig::from_json_str(r#"{"platform": "pdp11"}"#).unwrap_err();
        assert!(matches!(err, SimError::Config { .. }));
    }
}
