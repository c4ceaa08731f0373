//! CC2420 register map, RAM layout and SPI header flags.

/*---------------------------[command strobes]----------------------------*/
pub const SNOP: u8 = 0x00; // No operation
pub const SXOSCON: u8 = 0x01; // Turn on the crystal oscillator
pub const STXCAL: u8 = 0x02; // Enable and calibrate frequency synthesizer for TX
pub const SRXON: u8 = 0x03; // Enable RX
pub const STXON: u8 = 0x04; // Enable TX after calibration
pub const STXONCCA: u8 = 0x05; // Enable TX if the channel is clear
pub const SRFOFF: u8 = 0x06; // Disable RX/TX and frequency synthesizer
pub const SXOSCOFF: u8 = 0x07; // Turn off the crystal oscillator and RF
pub const SFLUSHRX: u8 = 0x08; // Flush the RX FIFO
pub const SFLUSHTX: u8 = 0x09; // Flush the TX FIFO
pub const SACK: u8 = 0x0A; // Send acknowledge frame, pending field cleared
pub const SACKPEND: u8 = 0x0B; // Send acknowledge frame, pending field set
pub const SRXDEC: u8 = 0x0C; // Start RXFIFO in-line decryption
pub const STXENC: u8 = 0x0D; // Start TXFIFO in-line encryption
pub const SAES: u8 = 0x0E; // AES stand alone encryption

/// Header bytes below this value are strobes.
pub const STROBE_LIMIT: u8 = 0x0F;

/*---------------------------[config/status registers]--------------------*/
pub const MAIN: u8 = 0x10; // Main control
pub const MDMCTRL0: u8 = 0x11; // Modem control 0
pub const MDMCTRL1: u8 = 0x12; // Modem control 1
pub const RSSI: u8 = 0x13; // RSSI and CCA status and control
pub const SYNCWORD: u8 = 0x14; // Synchronisation word control
pub const TXCTRL: u8 = 0x15; // Transmit control
pub const RXCTRL0: u8 = 0x16; // Receive control 0
pub const RXCTRL1: u8 = 0x17; // Receive control 1
pub const FSCTRL: u8 = 0x18; // Frequency synthesizer control and status
pub const SECCTRL0: u8 = 0x19; // Security control 0
pub const SECCTRL1: u8 = 0x1A; // Security control 1
pub const BATTMON: u8 = 0x1B; // Battery monitor control and status
pub const IOCFG0: u8 = 0x1C; // Input/output control 0
pub const IOCFG1: u8 = 0x1D; // Input/output control 1
pub const MANFIDL: u8 = 0x1E; // Manufacturer ID, low
pub const MANFIDH: u8 = 0x1F; // Manufacturer ID, high
pub const FSMTC: u8 = 0x20; // Finite state machine time constants
pub const MANAND: u8 = 0x21; // Manual signal AND override
pub const MANOR: u8 = 0x22; // Manual signal OR override
pub const AGCCTRL: u8 = 0x23; // AGC control
pub const AGCTST0: u8 = 0x24; // AGC test 0
pub const AGCTST1: u8 = 0x25; // AGC test 1
pub const AGCTST2: u8 = 0x26; // AGC test 2
pub const FSTST0: u8 = 0x27; // Frequency synthesizer test 0
pub const FSTST1: u8 = 0x28; // Frequency synthesizer test 1
pub const FSTST2: u8 = 0x29; // Frequency synthesizer test 2
pub const FSTST3: u8 = 0x2A; // Frequency synthesizer test 3
pub const RXBPFTST: u8 = 0x2B; // Receiver bandpass filter test
pub const FSMSTATE: u8 = 0x2C; // Finite state machine state
pub const ADCTST: u8 = 0x2D; // ADC test
pub const DACTST: u8 = 0x2E; // DAC test
pub const TOPTST: u8 = 0x2F; // Top level test
pub const RESERVED: u8 = 0x30;
/* 0x31 - 0x3D not used */
pub const TXFIFO: u8 = 0x3E; // Transmit FIFO port
pub const RXFIFO: u8 = 0x3F; // Receive FIFO port

/// Register bank size.
pub const REGISTER_COUNT: usize = 64;

/*---------------------------[RAM layout]---------------------------------*/
pub const RAM_TXFIFO: u16 = 0x000;
pub const RAM_RXFIFO: u16 = 0x080;
pub const RAM_KEY0: u16 = 0x100;
pub const RAM_RXNONCE: u16 = 0x110;
pub const RAM_SABUF: u16 = 0x120;
pub const RAM_KEY1: u16 = 0x130;
pub const RAM_TXNONCE: u16 = 0x140;
pub const RAM_CBCSTATE: u16 = 0x150;
pub const RAM_IEEEADDR: u16 = 0x160;
pub const RAM_PANID: u16 = 0x168;
pub const RAM_SHORTADDR: u16 = 0x16A;

/// RAM size in bytes.
pub const RAM_SIZE: usize = 512;

/// Size of each FIFO.
pub const FIFO_SIZE: usize = 128;

/*---------------------------[SPI header]---------------------------------*/
pub const FLAG_RAM: u8 = 0x80;
pub const FLAG_READ: u8 = 0x40;
/// Read bit in the second byte of a RAM access.
pub const FLAG_RAM_READ: u8 = 0x20;
pub const REGISTER_MASK: u8 = 0x3F;
pub const RAM_ADDR_LOW_MASK: u8 = 0x7F;
pub const RAM_ADDR_HIGH_MASK: u16 = 0x180;

/*---------------------------[received frame trailer]---------------------*/
/// RSSI byte appended to injected packets.
pub const RX_RSSI: u8 = 202;
/// Correlation value appended to injected packets.
pub const RX_CORRELATION: u8 = 37;
/// CRC-OK bit in the final byte of a received frame.
pub const RX_CRC_OK: u8 = 0x80;
/// Length byte, RSSI and LQI/CRC around the payload.
pub const RX_FRAMING: usize = 3;
