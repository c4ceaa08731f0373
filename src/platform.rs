//! Node assembly: memory, registers, ports and the chips of a platform.
//!
//! On the Sky platform the CC2420 is wired as follows:
//!
//! | Signal | Pin  |
//! |--------|------|
//! | FIFOP  | P1.0 |
//! | FIFO   | P1.3 |
//! | CCA    | P1.4 |
//! | CSn    | P4.2 (active low) |

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info};

use crate::chip::{Cc2420, IoPort, PinOut, PortReg, SharedPort};
use crate::cpu::{MemoryImage, RegisterFile};
use crate::error::{Result, SimError};
use crate::formats::{self, LoadSummary};
use crate::formatter::{Disassembler, TraceEntry};
use crate::symbols::SymbolTable;
use crate::types::{Platform, SimConfig};

/// Number of digital I/O ports (P1..P6).
pub const PORT_COUNT: u8 = 6;

/// Sky CC2420 wiring as (port, pin).
pub mod sky {
    pub const FIFOP: (u8, u8) = (1, 0);
    pub const FIFO: (u8, u8) = (1, 3);
    pub const CCA: (u8, u8) = (1, 4);
    pub const CSN: (u8, u8) = (4, 2);
}

/// A simulated sensor node.
#[derive(Debug)]
pub struct Node {
    platform: Platform,
    memory: MemoryImage,
    registers: RegisterFile,
    ports: Vec<SharedPort>,
    radio: Option<Cc2420>,
    disassembler: Disassembler,
}

impl Node {
    pub fn new(platform: Platform) -> Result<Self> {
        let ports: Vec<SharedPort> = (1..=PORT_COUNT)
            .map(|n| Rc::new(RefCell::new(IoPort::new(n))))
            .collect();

        let radio = if platform.has_cc2420() {
            let mut radio = Cc2420::new();
            let wire = |(port, pin): (u8, u8)| PinOut::new(ports[usize::from(port - 1)].clone(), pin);
            radio.bind_fifop(wire(sky::FIFOP)?)?;
            radio.bind_fifo(wire(sky::FIFO)?)?;
            radio.bind_cca(wire(sky::CCA)?)?;
            Some(radio)
        } else {
            None
        };

        debug!("Assembled {} node", platform);
        Ok(Self {
            platform,
            memory: MemoryImage::new(),
            registers: RegisterFile::new(),
            ports,
            radio,
            disassembler: Disassembler::default(),
        })
    }

    /// Build a node and load the firmware and map named in `config`.
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        let mut node = Self::new(config.platform)?;
        node.disassembler.set_options(config.trace);
        if let Some(path) = &config.firmware {
            node.load_firmware(path, config.load_address)?;
        }
        if let Some(path) = &config.map_file {
            node.set_map(SymbolTable::load(path)?);
        }
        Ok(node)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn memory(&self) -> &MemoryImage {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut MemoryImage {
        &mut self.memory
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.registers
    }

    /// Port `P<number>`, numbered from 1.
    pub fn port(&self, number: u8) -> Option<SharedPort> {
        let idx = usize::from(number.checked_sub(1)?);
        self.ports.get(idx).cloned()
    }

    pub fn radio(&self) -> Option<&Cc2420> {
        self.radio.as_ref()
    }

    pub fn radio_mut(&mut self) -> Option<&mut Cc2420> {
        self.radio.as_mut()
    }

    pub fn disassembler(&self) -> &Disassembler {
        &self.disassembler
    }

    pub fn disassembler_mut(&mut self) -> &mut Disassembler {
        &mut self.disassembler
    }

    /// Load a firmware image and point PC at its reset vector.
    pub fn load_firmware<P: AsRef<Path>>(&mut self, path: P, raw_base: u16) -> Result<LoadSummary> {
        let summary = formats::load_file(path.as_ref(), raw_base, &mut self.memory)?;
        let reset = self.memory.reset_vector();
        self.registers.set(0, reset);
        info!(
            "Loaded {} ({}, {} bytes), reset vector 0x{:04x}",
            path.as_ref().display(),
            summary.format,
            summary.bytes,
            reset
        );
        Ok(summary)
    }

    pub fn set_map(&mut self, symbols: SymbolTable) {
        self.disassembler.set_symbols(symbols);
    }

    fn radio_or_err(&mut self) -> Result<&mut Cc2420> {
        let platform = self.platform;
        self.radio.as_mut().ok_or_else(|| SimError::Config {
            message: format!("platform {} has no SPI radio", platform),
        })
    }

    /// Drive the radio's chip-select line the way firmware does: CSn is
    /// an active-low output on P4.2.
    pub fn spi_select(&mut self, selected: bool) -> Result<()> {
        let (port_no, pin) = sky::CSN;
        let port = self.port(port_no).ok_or_else(|| SimError::Config {
            message: format!("port P{} missing", port_no),
        })?;
        {
            let mut port = port.borrow_mut();
            let mask = 1u8 << pin;
            let dir = port.register(PortReg::Dir) | mask;
            port.set_register(PortReg::Dir, dir);
            let out = port.register(PortReg::Out);
            let out = if selected { out & !mask } else { out | mask };
            port.set_register(PortReg::Out, out);
        }
        let level = port.borrow().logical_level(pin)?;
        self.radio_or_err()?.set_chip_select(!level.is_high());
        Ok(())
    }

    /// Exchange one byte with the radio.
    pub fn spi_transfer(&mut self, byte: u8) -> Result<u8> {
        self.radio_or_err()?.exchange_byte(byte)
    }

    /// Exchange a sequence of bytes in one selected transaction.
    pub fn spi_transaction(&mut self, bytes: &[u8]) -> Result<Vec<u8>> {
        self.spi_select(true)?;
        let reply = bytes
            .iter()
            .map(|&b| self.spi_transfer(b))
            .collect::<Result<Vec<u8>>>();
        self.spi_select(false)?;
        reply
    }

    /// Disassemble the instruction at `pc`.
    pub fn trace_one(&mut self, pc: u16) -> TraceEntry {
        self.disassembler
            .disassemble(pc, &self.memory, &self.registers, 0)
    }

    /// Disassemble `count` instructions from `start`, or from the reset
    /// vector when no start is given.
    pub fn trace(&mut self, start: Option<u16>, count: usize) -> Vec<TraceEntry> {
        let start = start.unwrap_or_else(|| self.memory.reset_vector());
        self.disassembler
            .sweep(start, count, &self.memory, &self.registers)
    }
}
