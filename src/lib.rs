//! MSP430 Sim - Instruction Decoding and Peripheral Protocol Models
//!
//! This library provides the pieces of an MSP430 sensor-node simulator
//! that need bit-exact behavior: the instruction decoder behind the trace
//! disassembler, and the SPI protocol engine of the CC2420 radio.
//!
//! # Features
//!
//! - **Decoder**: All three MSP430 instruction formats, every addressing
//!   mode and the constant generators on R2/R3
//! - **Trace Disassembler**: Human, short and JSON trace lines with symbol
//!   annotation from a linker map and a pluggable single-step hook
//! - **Firmware Loading**: Intel HEX, TI-TXT and raw images
//! - **CC2420**: Register, RAM and FIFO access over a byte-wise SPI
//!   protocol, with FIFO/FIFOP/CCA pins driven into the I/O ports
//! - **Nodes**: Sky (with CC2420) and ESB platform wiring
//!
//! # Quick Start
//!
//! ```rust
//! use msp430_sim::disassemble_bytes;
//!
//! // MOV #0x1234, R5 ; RET
//! let trace = disassemble_bytes(&[0x35, 0x40, 0x34, 0x12, 0x30, 0x41], 0x4000, 2)?;
//! assert_eq!(trace[0].instruction.text(), "MOV.W #0x1234, R5");
//! assert_eq!(trace[1].instruction.text(), "RET");
//! # Ok::<(), msp430_sim::SimError>(())
//! ```
//!
//! Driving the radio from a node:
//!
//! ```rust
//! use msp430_sim::{Node, Platform};
//!
//! let mut node = Node::new(Platform::Sky)?;
//! node.radio_mut().unwrap().inject_incoming_packet(&[0xAA])?;
//! let reply = node.spi_transaction(&[0x3F, 0, 0])?;
//! assert_eq!(reply, vec![0x40, 3, 0xAA]);
//! # Ok::<(), msp430_sim::SimError>(())
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]

pub mod chip;
pub mod cpu;
pub mod debugger;
pub mod error;
pub mod formats;
pub mod formatter;
pub mod platform;
pub mod symbols;
pub mod types;

pub use chip::{Cc2420, IoPort, PinEvent, PinOut, PinState, PortReg};
pub use cpu::{decode, DecodedInstruction, Format, MemoryImage, Mnemonic, RegisterFile};
pub use debugger::{DebugAction, DebuggerPort, LineDebugger, NoopDebugger, ScriptedDebugger};
pub use error::{Result, SimError};
pub use formats::{ImageFormat, LoadSummary};
pub use formatter::{
    Disassembler, HumanFormatter, JsonFormatter, ShortFormatter, TraceEntry, TraceFormatter,
};
pub use platform::Node;
pub use symbols::SymbolTable;
pub use types::{Platform, SimConfig, TraceOptions};

use std::path::Path;

/// Disassemble `count` instructions of a raw code blob placed at `base`.
pub fn disassemble_bytes(data: &[u8], base: u16, count: usize) -> Result<Vec<TraceEntry>> {
    let mut memory = MemoryImage::new();
    formats::load_raw(data, base, &mut memory)?;
    let mut disassembler = Disassembler::default();
    Ok(disassembler.sweep(base, count, &memory, &RegisterFile::new()))
}

/// Load a firmware image and disassemble `count` instructions from
/// `start`, or from the reset vector.
///
/// # Example
///
/// ```rust,no_run
/// use msp430_sim::disassemble_file;
///
/// for entry in disassemble_file("blink.ihex", None, 16)? {
///     println!("{}", entry.instruction);
/// }
/// # Ok::<(), msp430_sim::SimError>(())
/// ```
pub fn disassemble_file<P: AsRef<Path>>(
    path: P,
    start: Option<u16>,
    count: usize,
) -> Result<Vec<TraceEntry>> {
    let mut memory = MemoryImage::new();
    formats::load_file(path, 0x4000, &mut memory)?;
    let start = start.unwrap_or_else(|| memory.reset_vector());
    let mut disassembler = Disassembler::default();
    Ok(disassembler.sweep(start, count, &memory, &RegisterFile::new()))
}

/// Get version information for this library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
