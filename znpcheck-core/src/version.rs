//! SYS_VERSION response decoding
//!
//! # Payload layout
//!
//! ```text
//! offset  size  field
//! 0       1     transport protocol revision
//! 1       1     product identifier
//! 2       1     major release
//! 3       1     minor release
//! 4       1     maintenance release
//! 5       2     build revision (LE u16)
//! 7..           ignored
//! ```

use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, trace};

use znpcheck_types::{SoftwareVersion, VersionInfo};

use crate::error::{Error, Result};

/// Shortest payload accepted as a version response
pub const MIN_PAYLOAD_SIZE: usize = 9;

/// Decode a SYS_VERSION response payload
///
/// Unknown product identifiers and unexpected releases still decode; they
/// surface as [`znpcheck_types::Chip::Unknown`] and
/// [`znpcheck_types::StackCompatibility::Unrecognized`].
///
/// # Errors
///
/// Returns [`Error::MalformedVersionPayload`] if the payload is shorter
/// than [`MIN_PAYLOAD_SIZE`].
///
/// # Examples
///
/// ```
/// use znpcheck_core::version;
///
/// let info = version::decode(&[2, 1, 2, 7, 1, 0x34, 0x12, 0, 0]).unwrap();
/// assert_eq!(info.version.to_string(), "2.7.1");
/// assert_eq!(info.build_revision, 0x1234);
/// ```
pub fn decode(payload: &[u8]) -> Result<VersionInfo> {
    if payload.len() < MIN_PAYLOAD_SIZE {
        return Err(Error::MalformedVersionPayload {
            expected: MIN_PAYLOAD_SIZE,
            actual: payload.len(),
        });
    }

    let version = SoftwareVersion::new(payload[2], payload[3], payload[4]);
    let build_revision = LittleEndian::read_u16(&payload[5..7]);
    let info = VersionInfo::new(payload[0], payload[1], version, build_revision);

    trace!(extra = payload.len() - 7, "Ignoring trailing version fields");
    debug!("Decoded version: {}", info);

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use znpcheck_types::{Chip, StackCompatibility};

    #[test]
    fn test_decode_fields() {
        let payload = [0x02, 0x02, 0x01, 0x02, 0x03, 0x04, 0x00, 0x00, 0x00];
        let info = decode(&payload).unwrap();

        assert_eq!(info.transport_revision, 2);
        assert_eq!(info.product_id, 2);
        assert_eq!(info.chip, Chip::Cc2538);
        assert_eq!(info.version, SoftwareVersion::new(1, 2, 3));
        assert_eq!(info.build_revision, 4);
        assert_eq!(info.compatibility, StackCompatibility::Unrecognized);
    }

    #[test]
    fn test_decode_deterministic() {
        let payload = [0x02, 0x01, 0x02, 0x07, 0x01, 0x9C, 0x5E, 0x01, 0x00, 0xFF];
        assert_eq!(decode(&payload).unwrap(), decode(&payload).unwrap());
    }

    #[test]
    fn test_decode_zstack3() {
        let payload = [0x02, 0x01, 0x02, 0x07, 0x01, 0x9C, 0x5E, 0x01, 0x00];
        let info = decode(&payload).unwrap();

        assert_eq!(info.chip, Chip::Cc2652);
        assert_eq!(info.build_revision, 0x5E9C);
        assert_eq!(info.compatibility, StackCompatibility::ZStack3x0);
    }

    #[test]
    fn test_decode_too_short() {
        let payload = [0u8; 8];
        assert_eq!(
            decode(&payload),
            Err(Error::MalformedVersionPayload {
                expected: 9,
                actual: 8,
            })
        );
    }

    #[test]
    fn test_decode_unknown_product() {
        let payload = [0x02, 0xA5, 0x02, 0x07, 0x01, 0x00, 0x00, 0x00, 0x00];
        let info = decode(&payload).unwrap();

        assert_eq!(info.chip, Chip::Unknown(0xA5));
        assert_eq!(info.compatibility, StackCompatibility::Unrecognized);
    }

    #[test]
    fn test_decode_ignores_extra_bytes() {
        let short = [0x02, 0x00, 0x02, 0x06, 0x03, 0x10, 0x00, 0x00, 0x00];
        let mut long = short.to_vec();
        long.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

        assert_eq!(decode(&short).unwrap(), decode(&long).unwrap());
    }
}
