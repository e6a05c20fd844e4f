//! Caller-supplied frames for passthrough mode

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

use crate::error::{Error, Result};

/// Raw bytes to be written to the module verbatim
///
/// Parsed from a hex string such as `fe00210223`. The bytes are not
/// interpreted; they are usually a complete MT frame but nothing enforces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommand {
    bytes: Bytes,
}

impl RawCommand {
    /// Parse a hex string
    ///
    /// Surrounding whitespace is ignored. The digit count must be even.
    ///
    /// # Examples
    ///
    /// ```
    /// use znpcheck_types::RawCommand;
    ///
    /// let cmd = RawCommand::from_hex("fe00210223").unwrap();
    /// assert_eq!(cmd.as_bytes(), &[0xFE, 0x00, 0x21, 0x02, 0x23]);
    ///
    /// assert!(RawCommand::from_hex("abc").is_err());
    /// ```
    pub fn from_hex(input: &str) -> Result<Self> {
        let digits = input.trim();

        if digits.is_empty() {
            return Err(Error::EmptyHex);
        }

        let bytes = hex::decode(digits).map_err(|e| match e {
            hex::FromHexError::InvalidHexCharacter { c, index } => {
                Error::InvalidHexDigit { digit: c, index }
            }
            _ => Error::OddLength(digits.len()),
        })?;

        Ok(Self {
            bytes: Bytes::from(bytes),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl FromStr for RawCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for RawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_valid() {
        let cmd: RawCommand = "FE0121010020".parse().unwrap();
        assert_eq!(cmd.as_bytes(), &[0xFE, 0x01, 0x21, 0x01, 0x00, 0x20]);
        assert_eq!(cmd.to_string(), "fe0121010020");
    }

    #[test]
    fn test_trims_whitespace() {
        let cmd = RawCommand::from_hex("  fe00210223\n").unwrap();
        assert_eq!(cmd.as_bytes().len(), 5);
    }

    #[test]
    fn test_odd_length() {
        assert_eq!(RawCommand::from_hex("abc"), Err(Error::OddLength(3)));
    }

    #[test]
    fn test_invalid_digit() {
        assert_eq!(
            RawCommand::from_hex("fe0g"),
            Err(Error::InvalidHexDigit { digit: 'g', index: 3 })
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(RawCommand::from_hex("   "), Err(Error::EmptyHex));
    }
}
