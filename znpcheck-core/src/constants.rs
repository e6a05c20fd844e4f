//! Protocol constants

/// Default serial baud rate for Z-Stack coordinator firmware
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default time to wait for a response (seconds)
pub const DEFAULT_TIMEOUT: u64 = 1;

/// Upper bound on a single transport read while waiting (milliseconds)
pub const DEFAULT_READ_SLICE_MS: u64 = 100;

/// Size of the frame check sequence trailer
pub const FCS_SIZE: usize = 1;

/// MT subsystem identifiers (low 5 bits of CMD0)
pub mod subsystem {
    pub const RPC_ERROR: u8 = 0x00;
    pub const SYS: u8 = 0x01;
    pub const MAC: u8 = 0x02;
    pub const NWK: u8 = 0x03;
    pub const AF: u8 = 0x04;
    pub const ZDO: u8 = 0x05;
    pub const SAPI: u8 = 0x06;
    pub const UTIL: u8 = 0x07;
    pub const DEBUG: u8 = 0x08;
    pub const APP: u8 = 0x09;
    pub const APP_CNF: u8 = 0x0F;
    pub const GREENPOWER: u8 = 0x15;
}

/// SYS subsystem command ids (CMD1)
pub mod sys {
    pub const RESET_REQ: u8 = 0x00;
    pub const PING: u8 = 0x01;
    pub const VERSION: u8 = 0x02;
    pub const RESET_IND: u8 = 0x80;
}
