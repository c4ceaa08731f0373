//! Eight-pin digital I/O port.
//!
//! Chips drive input pins through a [`PinOut`] binding. Every level change
//! is published as a [`PinEvent`] on the port's subscriber channels so that
//! observers outside the simulation loop never read the port's registers
//! directly.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace, warn};

use crate::error::{Result, SimError};

/// Number of pins on a port.
pub const PINS: u8 = 8;

/// Port registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PortReg {
    In,
    Out,
    Dir,
    Sel,
    Ren,
    Ie,
    Ies,
    Ifg,
}

impl PortReg {
    pub const ALL: [PortReg; 8] = [
        PortReg::In,
        PortReg::Out,
        PortReg::Dir,
        PortReg::Sel,
        PortReg::Ren,
        PortReg::Ie,
        PortReg::Ies,
        PortReg::Ifg,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PortReg::In => "IN",
            PortReg::Out => "OUT",
            PortReg::Dir => "DIR",
            PortReg::Sel => "SEL",
            PortReg::Ren => "REN",
            PortReg::Ie => "IE",
            PortReg::Ies => "IES",
            PortReg::Ifg => "IFG",
        }
    }
}

/// Logic level of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PinState {
    Low,
    High,
}

impl PinState {
    pub fn from_bool(high: bool) -> Self {
        if high {
            PinState::High
        } else {
            PinState::Low
        }
    }

    pub fn is_high(self) -> bool {
        self == PinState::High
    }
}

impl fmt::Display for PinState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinState::Low => write!(f, "low"),
            PinState::High => write!(f, "high"),
        }
    }
}

/// A pin changed level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PinEvent {
    pub port: u8,
    pub pin: u8,
    pub state: PinState,
}

/// Pin events a subscriber may leave unread. Further events are dropped
/// for that subscriber until it drains its channel.
pub const EVENT_BACKLOG: usize = 256;

fn check_pin(pin: u8) -> Result<u8> {
    if pin < PINS {
        Ok(pin)
    } else {
        Err(SimError::out_of_range("port pin", usize::from(pin), usize::from(PINS - 1)))
    }
}

/// One MSP430 digital I/O port.
pub struct IoPort {
    number: u8,
    regs: [u8; 8],
    subscribers: Vec<Sender<PinEvent>>,
}

impl fmt::Debug for IoPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("IoPort");
        s.field("number", &self.number);
        for reg in PortReg::ALL {
            s.field(reg.name(), &format_args!("{:08b}", self.regs[reg.index()]));
        }
        s.field("subscribers", &self.subscribers.len()).finish()
    }
}

impl IoPort {
    /// A port with every register cleared and no subscribers.
    pub fn new(number: u8) -> Self {
        Self {
            number,
            regs: [0; 8],
            subscribers: Vec::new(),
        }
    }

    /// Port number, as in `P<n>`.
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Raw value of one port register.
    pub fn register(&self, reg: PortReg) -> u8 {
        self.regs[reg.index()]
    }

    /// Overwrite a port register as firmware would.
    pub fn set_register(&mut self, reg: PortReg, value: u8) {
        trace!("P{}{} <- {:02x}", self.number, reg.name(), value);
        self.regs[reg.index()] = value;
    }

    fn bit(&self, reg: PortReg, pin: u8) -> bool {
        self.regs[reg.index()] & (1 << pin) != 0
    }

    fn set_bit(&mut self, reg: PortReg, pin: u8, on: bool) {
        let mask = 1u8 << pin;
        if on {
            self.regs[reg.index()] |= mask;
        } else {
            self.regs[reg.index()] &= !mask;
        }
    }

    /// Drive an input pin from outside the CPU.
    ///
    /// Updates IN, latches IFG when the pin's interrupt is enabled and the
    /// edge matches IES (0 = rising, 1 = falling), and publishes the change.
    pub fn set_pin_state(&mut self, pin: u8, state: PinState) -> Result<()> {
        let pin = check_pin(pin)?;
        let was_high = self.bit(PortReg::In, pin);
        let high = state.is_high();
        if was_high == high {
            return Ok(());
        }
        self.set_bit(PortReg::In, pin, high);

        let falling_edge_select = self.bit(PortReg::Ies, pin);
        if self.bit(PortReg::Ie, pin) && high != falling_edge_select {
            debug!("P{}.{} interrupt flag raised", self.number, pin);
            self.set_bit(PortReg::Ifg, pin, true);
        }

        let event = PinEvent {
            port: self.number,
            pin,
            state,
        };
        let number = self.number;
        self.subscribers.retain(|tx| match tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("P{}.{} event dropped, subscriber backlog full", number, pin);
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
        Ok(())
    }

    /// Level latched in IN for `pin`.
    pub fn pin_state(&self, pin: u8) -> Result<PinState> {
        let pin = check_pin(pin)?;
        Ok(PinState::from_bool(self.bit(PortReg::In, pin)))
    }

    /// Resistor enabled on an input pin with OUT selecting pull-up.
    pub fn is_pull_up(&self, pin: u8) -> Result<bool> {
        let pin = check_pin(pin)?;
        Ok(self.bit(PortReg::Ren, pin) && !self.bit(PortReg::Dir, pin) && self.bit(PortReg::Out, pin))
    }

    /// Resistor enabled on an input pin with OUT selecting pull-down.
    pub fn is_pull_down(&self, pin: u8) -> Result<bool> {
        let pin = check_pin(pin)?;
        Ok(self.bit(PortReg::Ren, pin) && !self.bit(PortReg::Dir, pin) && !self.bit(PortReg::Out, pin))
    }

    /// Level seen on the pin: OUT for outputs, IN for inputs.
    pub fn logical_level(&self, pin: u8) -> Result<PinState> {
        let pin = check_pin(pin)?;
        let reg = if self.bit(PortReg::Dir, pin) {
            PortReg::Out
        } else {
            PortReg::In
        };
        Ok(PinState::from_bool(self.bit(reg, pin)))
    }

    /// Any pin with both IE and IFG set.
    pub fn interrupt_pending(&self) -> bool {
        self.register(PortReg::Ie) & self.register(PortReg::Ifg) != 0
    }

    /// Acknowledge the interrupt flag of `pin`.
    pub fn clear_interrupt(&mut self, pin: u8) -> Result<()> {
        let pin = check_pin(pin)?;
        self.set_bit(PortReg::Ifg, pin, false);
        Ok(())
    }

    /// Receive future pin changes on this port, up to [`EVENT_BACKLOG`]
    /// of them unread at a time.
    pub fn subscribe(&mut self) -> Receiver<PinEvent> {
        let (tx, rx) = bounded(EVENT_BACKLOG);
        self.subscribers.push(tx);
        rx
    }
}

/// A port shared between the node and the chips wired to it.
pub type SharedPort = Rc<RefCell<IoPort>>;

/// A chip output wired to one pin of a port.
#[derive(Debug, Clone)]
pub struct PinOut {
    port: SharedPort,
    pin: u8,
}

impl PinOut {
    /// Bind to `pin` of `port`. Fails for pins beyond 7.
    pub fn new(port: SharedPort, pin: u8) -> Result<Self> {
        let pin = check_pin(pin)?;
        Ok(Self { port, pin })
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Number of the port the pin belongs to.
    pub fn port_number(&self) -> u8 {
        self.port.borrow().number()
    }

    /// Drive the bound pin.
    pub fn set(&self, state: PinState) -> Result<()> {
        self.port.borrow_mut().set_pin_state(self.pin, state)
    }
}
