//! # znpcheck-core
//!
//! Core protocol implementation for TI Z-Stack modules (MT serial protocol).
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding with resynchronization
//! - FCS calculation
//! - Command identifiers
//! - SYS version response decoding
//! - Protocol constants

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod version;

pub use command::{CommandId, MessageType, ResetType};
pub use error::{Error, Result};
pub use frame::{Frame, RawFrameResult};

/// Start-of-frame sentinel
pub const SOF: u8 = 0xFE;

/// Maximum payload size (MT_RPC_DATA_MAX)
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// SOF + LEN + CMD0 + CMD1
pub const HEADER_SIZE: usize = 4;
