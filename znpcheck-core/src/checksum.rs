//! MT frame check sequence
//!
//! The FCS is a plain XOR over every byte that follows the SOF sentinel:
//! LEN, CMD0, CMD1 and the payload. Because XOR is its own inverse, a valid
//! frame XORs to zero when the received FCS byte is folded in as well.

use tracing::trace;

/// Calculate the FCS over `LEN, CMD0, CMD1, payload...`
///
/// # Examples
///
/// ```
/// use znpcheck_core::checksum;
///
/// // SYS_VERSION request: LEN=0, CMD=0x21 0x02
/// assert_eq!(checksum::calculate(&[0x00, 0x21, 0x02]), 0x23);
/// ```
pub fn calculate(data: &[u8]) -> u8 {
    let fcs = data.iter().fold(0u8, |acc, b| acc ^ b);

    trace!(
        len = data.len(),
        fcs = format!("0x{:02X}", fcs),
        "Calculated FCS"
    );

    fcs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fcs_empty() {
        assert_eq!(calculate(&[]), 0);
    }

    #[test]
    fn test_fcs_version_request() {
        assert_eq!(calculate(&[0x00, 0x21, 0x02]), 0x23);
    }

    #[test]
    fn test_fcs_reset_request() {
        // SYS_RESET_REQ, hard reset
        assert_eq!(calculate(&[0x01, 0x41, 0x00, 0x00]), 0x40);
    }

    #[test]
    fn test_fcs_folds_to_zero() {
        let mut data = vec![0x05, 0x61, 0x02, 1, 2, 3, 4, 5];
        data.push(calculate(&data));

        assert_eq!(calculate(&data), 0);
    }
}
