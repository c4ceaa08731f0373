//! Peripheral chips and the I/O ports they are wired to.

pub mod cc2420;
pub mod cc2420_const;
pub mod io_port;

pub use cc2420::{Cc2420, PinLevels, State as Cc2420State, Status as Cc2420Status, Strobe};
pub use io_port::{IoPort, PinEvent, PinOut, PinState, PortReg, SharedPort};
