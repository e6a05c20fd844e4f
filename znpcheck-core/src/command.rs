//! MT command identifiers

use std::fmt;

use crate::constants::{subsystem, sys};

/// Frame type, encoded in the top 3 bits of CMD0
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MessageType {
    Poll,
    /// Synchronous request
    Sreq,
    /// Asynchronous request / indication
    Areq,
    /// Synchronous response
    Srsp,
    Reserved(u8),
}

impl MessageType {
    pub fn from_cmd0(cmd0: u8) -> Self {
        match cmd0 >> 5 {
            0 => Self::Poll,
            1 => Self::Sreq,
            2 => Self::Areq,
            3 => Self::Srsp,
            other => Self::Reserved(other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Poll => "POLL",
            Self::Sreq => "SREQ",
            Self::Areq => "AREQ",
            Self::Srsp => "SRSP",
            Self::Reserved(_) => "RESERVED",
        }
    }
}

/// Command identifier (CMD0, CMD1)
///
/// Only the commands this tool issues or parses get a named variant;
/// everything else is carried through as [`CommandId::Custom`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CommandId {
    /// SYS_RESET_REQ (AREQ, no reply)
    ResetRequest,

    /// SYS_VERSION request (SREQ)
    VersionRequest,

    /// SYS_VERSION response (SRSP)
    VersionResponse,

    /// Any other command, passed through unparsed
    Custom { cmd0: u8, cmd1: u8 },
}

impl CommandId {
    const RESET_REQUEST: [u8; 2] = [0x40 | subsystem::SYS, sys::RESET_REQ];
    const VERSION_REQUEST: [u8; 2] = [0x20 | subsystem::SYS, sys::VERSION];
    const VERSION_RESPONSE: [u8; 2] = [0x60 | subsystem::SYS, sys::VERSION];

    pub fn from_bytes(cmd0: u8, cmd1: u8) -> Self {
        match [cmd0, cmd1] {
            Self::RESET_REQUEST => Self::ResetRequest,
            Self::VERSION_REQUEST => Self::VersionRequest,
            Self::VERSION_RESPONSE => Self::VersionResponse,
            _ => Self::Custom { cmd0, cmd1 },
        }
    }

    pub fn to_bytes(self) -> [u8; 2] {
        match self {
            Self::ResetRequest => Self::RESET_REQUEST,
            Self::VersionRequest => Self::VERSION_REQUEST,
            Self::VersionResponse => Self::VERSION_RESPONSE,
            Self::Custom { cmd0, cmd1 } => [cmd0, cmd1],
        }
    }

    pub fn message_type(self) -> MessageType {
        MessageType::from_cmd0(self.to_bytes()[0])
    }

    /// Check if the module answers this command with a frame
    ///
    /// SYS_RESET_REQ is an AREQ; the module reboots instead of replying.
    pub fn expects_response(self) -> bool {
        self.message_type() == MessageType::Sreq
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::ResetRequest => "SYS_RESET_REQ",
            Self::VersionRequest => "SYS_VERSION",
            Self::VersionResponse => "SYS_VERSION_SRSP",
            Self::Custom { cmd0, .. } => match cmd0 & 0x1F {
                subsystem::RPC_ERROR => "RPC_ERROR",
                subsystem::SYS => "SYS",
                subsystem::MAC => "MAC",
                subsystem::NWK => "NWK",
                subsystem::AF => "AF",
                subsystem::ZDO => "ZDO",
                subsystem::SAPI => "SAPI",
                subsystem::UTIL => "UTIL",
                subsystem::DEBUG => "DEBUG",
                subsystem::APP => "APP",
                subsystem::APP_CNF => "APP_CNF",
                subsystem::GREENPOWER => "GREENPOWER",
                _ => "UNKNOWN",
            },
        }
    }
}

impl From<CommandId> for u16 {
    fn from(cmd: CommandId) -> u16 {
        u16::from_be_bytes(cmd.to_bytes())
    }
}

impl From<u16> for CommandId {
    fn from(value: u16) -> Self {
        let [cmd0, cmd1] = value.to_be_bytes();
        Self::from_bytes(cmd0, cmd1)
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}(0x{:04X})",
            self.message_type().name(),
            self.name(),
            u16::from(*self)
        )
    }
}

/// SYS_RESET_REQ reset type byte
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum ResetType {
    /// Full device reset through the watchdog
    #[default]
    Hard = 0,

    /// Restart of the Z-Stack only
    Soft = 1,
}

impl From<ResetType> for u8 {
    fn from(kind: ResetType) -> u8 {
        kind as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_conversion() {
        assert_eq!(u16::from(CommandId::VersionRequest), 0x2102);
        assert_eq!(CommandId::from(0x6102u16), CommandId::VersionResponse);
        assert_eq!(CommandId::from_bytes(0x41, 0x00), CommandId::ResetRequest);
    }

    #[test]
    fn test_custom_passthrough() {
        let cmd = CommandId::from_bytes(0x25, 0x45);
        assert_eq!(cmd, CommandId::Custom { cmd0: 0x25, cmd1: 0x45 });
        assert_eq!(cmd.to_bytes(), [0x25, 0x45]);
        assert_eq!(cmd.name(), "ZDO");
    }

    #[test]
    fn test_message_types() {
        assert_eq!(CommandId::VersionRequest.message_type(), MessageType::Sreq);
        assert_eq!(CommandId::VersionResponse.message_type(), MessageType::Srsp);
        assert_eq!(CommandId::ResetRequest.message_type(), MessageType::Areq);
    }

    #[test]
    fn test_expects_response() {
        assert!(CommandId::VersionRequest.expects_response());
        assert!(!CommandId::ResetRequest.expects_response());

        // SYS_RESET_IND is module-originated
        assert!(!CommandId::from_bytes(0x41, sys::RESET_IND).expects_response());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            CommandId::VersionResponse.to_string(),
            "SRSP SYS_VERSION_SRSP(0x6102)"
        );
    }
}
