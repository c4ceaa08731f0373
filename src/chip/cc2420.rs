//! CC2420 transceiver SPI protocol engine.
//!
//! The host's SPI controller hands the chip one byte at a time while the
//! chip-select line is asserted and gets one byte back. The first byte of a
//! transaction is a header selecting a register, a RAM address, one of the
//! FIFO ports or a command strobe. Received packets are placed in the RX
//! FIFO with [`Cc2420::inject_incoming_packet`]; the FIFO, FIFOP and CCA
//! outputs are forwarded to whatever port pins they are bound to.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

use super::cc2420_const::*;
use super::io_port::{PinOut, PinState};
use crate::error::{Result, SimError};

const CHIP: &str = "CC2420";

bitflags! {
    /// Status byte returned for every header byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Status: u8 {
        const RSSI_VALID = 1 << 1;
        const LOCK = 1 << 2;
        const TX_ACTIVE = 1 << 3;
        const ENC_BUSY = 1 << 4;
        const TX_UNDERFLOW = 1 << 5;
        const XOSC16M_STABLE = 1 << 6;
    }
}

/// Command strobes, header bytes 0x00..=0x0E.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Strobe {
    Snop,
    Sxoscon,
    Stxcal,
    Srxon,
    Stxon,
    Stxoncca,
    Srfoff,
    Sxoscoff,
    Sflushrx,
    Sflushtx,
    Sack,
    Sackpend,
    Srxdec,
    Stxenc,
    Saes,
}

impl Strobe {
    pub fn from_u8(value: u8) -> Option<Self> {
        let strobe = match value {
            SNOP => Strobe::Snop,
            SXOSCON => Strobe::Sxoscon,
            STXCAL => Strobe::Stxcal,
            SRXON => Strobe::Srxon,
            STXON => Strobe::Stxon,
            STXONCCA => Strobe::Stxoncca,
            SRFOFF => Strobe::Srfoff,
            SXOSCOFF => Strobe::Sxoscoff,
            SFLUSHRX => Strobe::Sflushrx,
            SFLUSHTX => Strobe::Sflushtx,
            SACK => Strobe::Sack,
            SACKPEND => Strobe::Sackpend,
            SRXDEC => Strobe::Srxdec,
            STXENC => Strobe::Stxenc,
            SAES => Strobe::Saes,
            _ => return None,
        };
        Some(strobe)
    }

    pub fn name(self) -> &'static str {
        match self {
            Strobe::Snop => "SNOP",
            Strobe::Sxoscon => "SXOSCON",
            Strobe::Stxcal => "STXCAL",
            Strobe::Srxon => "SRXON",
            Strobe::Stxon => "STXON",
            Strobe::Stxoncca => "STXONCCA",
            Strobe::Srfoff => "SRFOFF",
            Strobe::Sxoscoff => "SXOSCOFF",
            Strobe::Sflushrx => "SFLUSHRX",
            Strobe::Sflushtx => "SFLUSHTX",
            Strobe::Sack => "SACK",
            Strobe::Sackpend => "SACKPEND",
            Strobe::Srxdec => "SRXDEC",
            Strobe::Stxenc => "STXENC",
            Strobe::Saes => "SAES",
        }
    }
}

impl fmt::Display for Strobe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Transaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum State {
    /// Waiting for a header byte.
    #[default]
    Idle,
    WriteRegister,
    ReadRegister,
    RamAccess,
    ReadRxFifo,
    WriteTxFifo,
}

/// Levels of the chip's output pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PinLevels {
    pub cca: PinState,
    /// High while unread RX data is in the FIFO.
    pub fifo: PinState,
    /// High while a received packet is pending.
    pub fifop: PinState,
}

impl Default for PinLevels {
    fn default() -> Self {
        Self {
            cca: PinState::Low,
            fifo: PinState::Low,
            fifop: PinState::Low,
        }
    }
}

/// CC2420 model.
pub struct Cc2420 {
    state: State,
    pos: u8,
    address: u16,
    ram_read: bool,
    status: Status,

    registers: [u16; REGISTER_COUNT],
    memory: [u8; RAM_SIZE],

    chip_select: bool,

    rx_packet: bool,
    rx_cursor: usize,
    rx_len: usize,
    rx_remaining: usize,
    tx_cursor: usize,

    pins: PinLevels,
    cca_out: Option<PinOut>,
    fifo_out: Option<PinOut>,
    fifop_out: Option<PinOut>,
}

impl Default for Cc2420 {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Cc2420 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cc2420")
            .field("state", &self.state)
            .field("address", &format_args!("0x{:03x}", self.address))
            .field("chip_select", &self.chip_select)
            .field("rx_packet", &self.rx_packet)
            .field("rx_cursor", &self.rx_cursor)
            .field("rx_len", &self.rx_len)
            .field("tx_cursor", &self.tx_cursor)
            .field("pins", &self.pins)
            .finish()
    }
}

impl Cc2420 {
    /// A deselected chip in `Idle` with cleared registers and RAM.
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            pos: 0,
            address: 0,
            ram_read: false,
            status: Status::XOSC16M_STABLE,
            registers: [0; REGISTER_COUNT],
            memory: [0; RAM_SIZE],
            chip_select: false,
            rx_packet: false,
            rx_cursor: 0,
            rx_len: 0,
            rx_remaining: 0,
            tx_cursor: 0,
            pins: PinLevels::default(),
            cca_out: None,
            fifo_out: None,
            fifop_out: None,
        }
    }

    /// Wire the CCA output to a port pin and drive its current level.
    pub fn bind_cca(&mut self, out: PinOut) -> Result<()> {
        out.set(self.pins.cca)?;
        self.cca_out = Some(out);
        Ok(())
    }

    /// Wire the FIFO output, high while RX bytes are unread.
    pub fn bind_fifo(&mut self, out: PinOut) -> Result<()> {
        out.set(self.pins.fifo)?;
        self.fifo_out = Some(out);
        Ok(())
    }

    /// Wire the FIFOP output, high while a packet is pending.
    pub fn bind_fifop(&mut self, out: PinOut) -> Result<()> {
        out.set(self.pins.fifop)?;
        self.fifop_out = Some(out);
        Ok(())
    }

    /// Current protocol state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Status byte replied to every header.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Cached output pin levels.
    pub fn pins(&self) -> PinLevels {
        self.pins
    }

    /// Whether CSn is currently asserted.
    pub fn chip_selected(&self) -> bool {
        self.chip_select
    }

    /// A received packet has framed bytes left to read.
    pub fn packet_pending(&self) -> bool {
        self.rx_packet
    }

    /// Offset of the next RX FIFO read.
    pub fn rx_cursor(&self) -> usize {
        self.rx_cursor
    }

    /// Offset of the next TX FIFO write.
    pub fn tx_cursor(&self) -> usize {
        self.tx_cursor
    }

    /// Drive chip-select. Deselecting ends the current transaction.
    pub fn set_chip_select(&mut self, selected: bool) {
        if self.chip_select != selected {
            debug!("{}: chip select {}", CHIP, selected);
        }
        self.chip_select = selected;
        if !selected {
            self.state = State::Idle;
            self.pos = 0;
        }
    }

    /// Exchange one byte over SPI.
    pub fn exchange_byte(&mut self, data: u8) -> Result<u8> {
        if !self.chip_select {
            return Err(SimError::ChipNotSelected { chip: CHIP });
        }
        trace!("{}: byte {:02x} in state {:?}", CHIP, data, self.state);

        match self.state {
            State::Idle => self.header(data),
            State::WriteRegister => Ok(self.write_register_byte(data)),
            State::ReadRegister => Ok(self.read_register_byte()),
            State::RamAccess => self.ram_byte(data),
            State::ReadRxFifo => self.read_rx_fifo(),
            State::WriteTxFifo => Ok(self.write_tx_fifo(data)),
        }
    }

    fn header(&mut self, data: u8) -> Result<u8> {
        self.pos = 0;
        if data & FLAG_RAM != 0 {
            self.state = State::RamAccess;
            self.address = u16::from(data & RAM_ADDR_LOW_MASK);
        } else {
            self.address = u16::from(data & REGISTER_MASK);
            self.state = match data & REGISTER_MASK {
                RXFIFO => State::ReadRxFifo,
                TXFIFO => State::WriteTxFifo,
                _ if data & FLAG_READ != 0 => State::ReadRegister,
                _ => State::WriteRegister,
            };
        }

        // Low addresses are strobes and registers at once: the command runs
        // and the following bytes still address the register.
        if data < STROBE_LIMIT {
            self.strobe(data)?;
        }
        Ok(self.status.bits())
    }

    fn strobe(&mut self, data: u8) -> Result<()> {
        let Some(strobe) = Strobe::from_u8(data) else {
            return Ok(());
        };
        debug!("{}: strobe {}", CHIP, strobe);
        match strobe {
            Strobe::Sflushrx => self.flush_rx(),
            Strobe::Sflushtx => {
                self.tx_cursor = 0;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn register_index(&self) -> usize {
        usize::from(self.address) & (REGISTER_COUNT - 1)
    }

    fn write_register_byte(&mut self, data: u8) -> u8 {
        let idx = self.register_index();
        let old = self.registers[idx];
        let reply = match self.pos {
            0 => {
                self.registers[idx] = (old & 0x00FF) | (u16::from(data) << 8);
                (old >> 8) as u8
            }
            1 => {
                self.registers[idx] = (old & 0xFF00) | u16::from(data);
                debug!("{}: wrote register 0x{:02x} = 0x{:04x}", CHIP, idx, self.registers[idx]);
                old as u8
            }
            _ => {
                warn!("{}: extra byte {:02x} after register write ignored", CHIP, data);
                0
            }
        };
        self.pos = self.pos.saturating_add(1);
        reply
    }

    fn read_register_byte(&mut self) -> u8 {
        let idx = self.register_index();
        let value = self.registers[idx];
        let reply = match self.pos {
            0 => (value >> 8) as u8,
            1 => {
                debug!("{}: read register 0x{:02x} = 0x{:04x}", CHIP, idx, value);
                value as u8
            }
            _ => {
                warn!("{}: extra byte after register read ignored", CHIP);
                0
            }
        };
        self.pos = self.pos.saturating_add(1);
        reply
    }

    fn ram_byte(&mut self, data: u8) -> Result<u8> {
        if self.pos == 0 {
            self.address |= (u16::from(data) << 1) & RAM_ADDR_HIGH_MASK;
            self.ram_read = data & FLAG_RAM_READ != 0;
            self.pos = 1;
            debug!("{}: RAM address 0x{:03x} read={}", CHIP, self.address, self.ram_read);
            return Ok(0);
        }

        if self.ram_read {
            warn!("{}: RAM read at 0x{:03x} not modeled", CHIP, self.address);
            return Ok(0);
        }

        let addr = usize::from(self.address);
        if addr >= RAM_SIZE {
            return Err(SimError::out_of_range("CC2420 RAM", addr, RAM_SIZE - 1));
        }
        let old = self.memory[addr];
        self.memory[addr] = data;
        self.address += 1;
        if self.address == RAM_PANID + 2 {
            debug!(
                "{}: PAN ID set to 0x{:02x}{:02x}",
                CHIP,
                self.memory[usize::from(RAM_PANID)],
                self.memory[usize::from(RAM_PANID) + 1]
            );
        }
        Ok(old)
    }

    fn read_rx_fifo(&mut self) -> Result<u8> {
        let value = self.memory[usize::from(RAM_RXFIFO) + self.rx_cursor];
        trace!("{}: RXFIFO[{}] => {:02x}", CHIP, self.rx_cursor, value);
        self.rx_cursor = (self.rx_cursor + 1) % FIFO_SIZE;

        if self.rx_remaining > 0 {
            self.rx_remaining -= 1;
            if self.rx_remaining == 0 {
                debug!("{}: RX packet drained", CHIP);
                self.rx_packet = false;
            }
            self.update_rx_pins()?;
        }
        Ok(value)
    }

    fn write_tx_fifo(&mut self, data: u8) -> u8 {
        self.memory[usize::from(RAM_TXFIFO) + self.tx_cursor] = data;
        trace!("{}: TXFIFO[{}] <= {:02x}", CHIP, self.tx_cursor, data);
        self.tx_cursor = (self.tx_cursor + 1) % FIFO_SIZE;
        self.status.bits()
    }

    fn flush_rx(&mut self) -> Result<()> {
        debug!("{}: flushing RX (pending={}, len={})", CHIP, self.rx_packet, self.rx_len);
        self.rx_packet = false;
        self.rx_cursor = 0;
        self.rx_len = 0;
        self.rx_remaining = 0;
        self.update_rx_pins()
    }

    fn update_rx_pins(&mut self) -> Result<()> {
        self.pins.fifop = PinState::from_bool(self.rx_packet);
        self.pins.fifo = PinState::from_bool(self.rx_remaining > 0);
        if let Some(out) = &self.fifop_out {
            out.set(self.pins.fifop)?;
        }
        if let Some(out) = &self.fifo_out {
            out.set(self.pins.fifo)?;
        }
        Ok(())
    }

    /// Place a received frame in the RX FIFO: length byte, payload, RSSI
    /// and a CRC-OK correlation byte.
    pub fn inject_incoming_packet(&mut self, payload: &[u8]) -> Result<()> {
        let framed = payload.len() + RX_FRAMING;
        if framed > FIFO_SIZE {
            return Err(SimError::PacketTooLarge {
                len: payload.len(),
                max: FIFO_SIZE - RX_FRAMING,
            });
        }

        let base = usize::from(RAM_RXFIFO);
        // Length counts the payload and the two trailer bytes.
        self.memory[base] = (payload.len() + 2) as u8;
        self.memory[base + 1..base + 1 + payload.len()].copy_from_slice(payload);
        self.memory[base + 1 + payload.len()] = RX_RSSI;
        self.memory[base + 2 + payload.len()] = RX_CORRELATION | RX_CRC_OK;

        self.rx_packet = true;
        self.rx_cursor = 0;
        self.rx_len = framed;
        self.rx_remaining = framed;
        debug!("{}: injected {} byte packet", CHIP, payload.len());
        self.update_rx_pins()
    }

    /// Drive the clear-channel-assessment output.
    pub fn set_cca(&mut self, clear: bool) -> Result<()> {
        self.pins.cca = PinState::from_bool(clear);
        if let Some(out) = &self.cca_out {
            out.set(self.pins.cca)?;
        }
        Ok(())
    }

    /// Register value without going through the SPI protocol.
    pub fn read_register(&self, address: u8) -> Result<u16> {
        let idx = usize::from(address);
        self.registers
            .get(idx)
            .copied()
            .ok_or_else(|| SimError::out_of_range("CC2420 register", idx, REGISTER_COUNT - 1))
    }

    pub fn write_register(&mut self, address: u8, value: u16) -> Result<()> {
        let idx = usize::from(address);
        let slot = self
            .registers
            .get_mut(idx)
            .ok_or_else(|| SimError::out_of_range("CC2420 register", idx, REGISTER_COUNT - 1))?;
        *slot = value;
        Ok(())
    }

    /// One byte of the 512-byte RAM, FIFOs included.
    pub fn read_ram(&self, address: u16) -> Result<u8> {
        let idx = usize::from(address);
        self.memory
            .get(idx)
            .copied()
            .ok_or_else(|| SimError::out_of_range("CC2420 RAM", idx, RAM_SIZE - 1))
    }

    pub fn write_ram(&mut self, address: u16, value: u8) -> Result<()> {
        let idx = usize::from(address);
        let slot = self
            .memory
            .get_mut(idx)
            .ok_or_else(|| SimError::out_of_range("CC2420 RAM", idx, RAM_SIZE - 1))?;
        *slot = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn selected() -> Cc2420 {
        let mut chip = Cc2420::new();
        chip.set_chip_select(true);
        chip
    }

    fn transfer(chip: &mut Cc2420, bytes: &[u8]) -> Vec<u8> {
        bytes.iter().map(|&b| chip.exchange_byte(b).unwrap()).collect()
    }

    #[test]
    fn test_header_returns_status() {
        let mut chip = selected();
        assert_eq!(chip.exchange_byte(MAIN).unwrap(), 0x40);
        assert_eq!(chip.state(), State::WriteRegister);
    }

    #[test]
    fn test_write_then_read_register() {
        let mut chip = selected();
        transfer(&mut chip, &[MDMCTRL0, 0x0A, 0xE2]);
        chip.set_chip_select(false);
        chip.set_chip_select(true);
        let reply = transfer(&mut chip, &[MDMCTRL0 | FLAG_READ, 0, 0]);
        assert_eq!(reply, vec![0x40, 0x0A, 0xE2]);
        assert_eq!(chip.read_register(MDMCTRL0).unwrap(), 0x0AE2);
    }

    #[test]
    fn test_write_replies_with_previous_value() {
        let mut chip = selected();
        chip.write_register(TXCTRL, 0xA0FF).unwrap();
        let reply = transfer(&mut chip, &[TXCTRL, 0x12, 0x34]);
        assert_eq!(reply, vec![0x40, 0xA0, 0xFF]);
        assert_eq!(chip.read_register(TXCTRL).unwrap(), 0x1234);
    }

    #[test]
    fn test_extra_register_bytes_ignored() {
        let mut chip = selected();
        let reply = transfer(&mut chip, &[IOCFG0, 0x01, 0x02, 0x03]);
        assert_eq!(reply[3], 0);
        assert_eq!(chip.read_register(IOCFG0).unwrap(), 0x0102);
    }

    #[test]
    fn test_deselect_resets_state() {
        let mut chip = selected();
        chip.exchange_byte(MAIN | FLAG_READ).unwrap();
        assert_eq!(chip.state(), State::ReadRegister);
        chip.set_chip_select(false);
        assert_eq!(chip.state(), State::Idle);
    }

    #[test]
    fn test_exchange_while_deselected() {
        let mut chip = Cc2420::new();
        assert!(matches!(
            chip.exchange_byte(SNOP),
            Err(SimError::ChipNotSelected { .. })
        ));
    }

    #[test]
    fn test_rx_fifo_packet() {
        let mut chip = selected();
        chip.inject_incoming_packet(&[0xAA, 0xBB, 0xCC]).unwrap();
        assert!(chip.packet_pending());
        assert_eq!(chip.rx_cursor(), 0);
        assert_eq!(chip.pins().fifop, PinState::High);

        assert_eq!(chip.exchange_byte(RXFIFO | FLAG_READ).unwrap(), 0x40);
        let mut read = Vec::new();
        for _ in 0..5 {
            read.push(chip.exchange_byte(0).unwrap());
            assert!(chip.packet_pending());
        }
        assert_eq!(read, vec![5, 0xAA, 0xBB, 0xCC, 0xCA]);
        assert_eq!(chip.exchange_byte(0).unwrap(), 0xA5);
        assert!(!chip.packet_pending());
        assert_eq!(chip.pins().fifop, PinState::Low);
        assert_eq!(chip.pins().fifo, PinState::Low);
    }

    #[test]
    fn test_flush_rx_strobe() {
        let mut chip = selected();
        chip.inject_incoming_packet(&[1, 2, 3]).unwrap();
        transfer(&mut chip, &[RXFIFO, 0, 0]);
        chip.set_chip_select(false);
        chip.set_chip_select(true);

        assert_eq!(chip.exchange_byte(SFLUSHRX).unwrap(), 0x40);
        assert!(!chip.packet_pending());
        assert_eq!(chip.rx_cursor(), 0);
        assert_eq!(chip.state(), State::WriteRegister);
        assert_eq!(chip.pins().fifop, PinState::Low);
    }

    #[test]
    fn test_strobe_address_is_also_a_register() {
        let mut chip = selected();
        chip.write_register(MDMCTRL1, 0x0500).unwrap();

        let reply = transfer(&mut chip, &[SRXON, 0x12, 0x34]);
        assert_eq!(reply, vec![0x40, 0x00, 0x00]);
        chip.set_chip_select(false);
        chip.set_chip_select(true);

        let reply = transfer(&mut chip, &[SRXON | FLAG_READ, 0, 0]);
        assert_eq!(reply, vec![0x40, 0x12, 0x34]);
        assert_eq!(chip.read_register(MDMCTRL1).unwrap(), 0x0500);
    }

    #[test]
    fn test_flush_tx_strobe_keeps_register_data() {
        let mut chip = selected();
        transfer(&mut chip, &[TXFIFO, 1, 2, 3]);
        chip.set_chip_select(false);
        chip.set_chip_select(true);
        assert_eq!(chip.tx_cursor(), 3);

        transfer(&mut chip, &[SFLUSHTX, 0xAB, 0xCD]);
        assert_eq!(chip.tx_cursor(), 0);
        assert_eq!(chip.read_register(SFLUSHTX).unwrap(), 0xABCD);
    }

    #[test]
    fn test_rx_cursor_wraps() {
        let mut chip = selected();
        chip.exchange_byte(RXFIFO).unwrap();
        for _ in 0..FIFO_SIZE {
            chip.exchange_byte(0).unwrap();
        }
        assert_eq!(chip.rx_cursor(), 0);
    }

    #[test]
    fn test_tx_fifo_write() {
        let mut chip = selected();
        let reply = transfer(&mut chip, &[TXFIFO, 3, 0x11, 0x22]);
        assert_eq!(reply, vec![0x40; 4]);
        assert_eq!(chip.tx_cursor(), 3);
        assert_eq!(chip.read_ram(RAM_TXFIFO + 1).unwrap(), 0x11);

        chip.set_chip_select(false);
        chip.set_chip_select(true);
        chip.exchange_byte(SFLUSHTX).unwrap();
        assert_eq!(chip.tx_cursor(), 0);
    }

    #[test]
    fn test_ram_write() {
        let mut chip = selected();
        // PANID at 0x168: low 7 bits 0x68, bank 0x100 >> 1 = 0x80 in byte two.
        let reply = transfer(&mut chip, &[0x80 | 0x68, 0x80, 0x34, 0x12]);
        assert_eq!(reply[0], 0x40);
        assert_eq!(chip.read_ram(RAM_PANID).unwrap(), 0x34);
        assert_eq!(chip.read_ram(RAM_PANID + 1).unwrap(), 0x12);
    }

    #[test]
    fn test_ram_read_is_not_modeled() {
        let mut chip = selected();
        chip.write_ram(0x010, 0x77).unwrap();
        let reply = transfer(&mut chip, &[0x80 | 0x10, FLAG_RAM_READ, 0, 0]);
        assert_eq!(&reply[2..], &[0, 0]);
        assert_eq!(chip.read_ram(0x010).unwrap(), 0x77);
    }

    #[test]
    fn test_ram_write_past_end() {
        let mut chip = selected();
        // Address 0x1FF: low bits 0x7F, high bits 0x180 from byte 0xC0.
        transfer(&mut chip, &[0xFF, 0xC0, 0x01]);
        assert!(matches!(
            chip.exchange_byte(0x02),
            Err(SimError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_direct_accessors_bounds() {
        let mut chip = Cc2420::new();
        assert!(chip.read_register(0x40).is_err());
        assert!(chip.write_register(0x40, 1).is_err());
        assert!(chip.read_ram(0x200).is_err());
        assert!(chip.write_ram(0x200, 1).is_err());
    }

    #[test]
    fn test_packet_too_large() {
        let mut chip = Cc2420::new();
        assert!(chip.inject_incoming_packet(&[0; 125]).is_ok());
        assert!(matches!(
            chip.inject_incoming_packet(&[0; 126]),
            Err(SimError::PacketTooLarge { len: 126, max: 125 })
        ));
    }

    #[test]
    fn test_cca_pin() {
        let mut chip = Cc2420::new();
        chip.set_cca(true).unwrap();
        assert_eq!(chip.pins().cca, PinState::High);
        chip.set_cca(false).unwrap();
        assert_eq!(chip.pins().cca, PinState::Low);
    }
}
