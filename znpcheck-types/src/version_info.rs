//! Firmware version information reported by Z-Stack modules

use std::fmt;

/// Radio chip family, derived from the product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chip {
    Cc2652,
    Cc2530,
    Cc2538,

    /// Product identifier not present in [`PRODUCT_TABLE`]
    Unknown(u8),
}

/// Product identifier to chip mapping
///
/// Z-Stack encodes the stack build flavour in the product byte. Each
/// flavour ships on one chip family in practice.
pub const PRODUCT_TABLE: &[(u8, Chip)] = &[
    (0x00, Chip::Cc2530), // Z-Stack 1.2 HA
    (0x01, Chip::Cc2652), // Z-Stack 3.x.0
    (0x02, Chip::Cc2538), // Z-Stack 3.0.x
];

impl Chip {
    /// Look up the chip family for a product identifier
    pub fn from_product_id(product_id: u8) -> Self {
        PRODUCT_TABLE
            .iter()
            .find(|(id, _)| *id == product_id)
            .map(|(_, chip)| *chip)
            .unwrap_or(Self::Unknown(product_id))
    }

    /// Check if the chip family is known
    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Get chip name
    pub fn name(self) -> &'static str {
        match self {
            Self::Cc2652 => "CC2652",
            Self::Cc2530 => "CC2530",
            Self::Cc2538 => "CC2538",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(id) => write!(f, "unknown (product 0x{:02X})", id),
            known => f.write_str(known.name()),
        }
    }
}

/// Firmware release triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SoftwareVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl SoftwareVersion {
    pub fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for SoftwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Zigbee stack generation the firmware is compatible with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackCompatibility {
    /// Z-Stack 3.x.0 (CC26x2 / CC13x2 firmware)
    ZStack3x0,

    /// Z-Stack 3.0.x
    ZStack30x,

    /// Z-Stack 1.2 Home Automation
    Legacy,

    /// Product/major combination not present in [`COMPATIBILITY_TABLE`]
    Unrecognized,
}

/// (product identifier, major release) to stack generation mapping
pub const COMPATIBILITY_TABLE: &[(u8, u8, StackCompatibility)] = &[
    (0x00, 2, StackCompatibility::Legacy),
    (0x01, 2, StackCompatibility::ZStack3x0),
    (0x02, 2, StackCompatibility::ZStack30x),
];

impl StackCompatibility {
    /// Classify a product identifier and major release
    ///
    /// Never fails: combinations missing from the table are
    /// [`StackCompatibility::Unrecognized`].
    pub fn classify(product_id: u8, major: u8) -> Self {
        COMPATIBILITY_TABLE
            .iter()
            .find(|(id, maj, _)| *id == product_id && *maj == major)
            .map(|(_, _, compat)| *compat)
            .unwrap_or(Self::Unrecognized)
    }

    /// Human readable description
    pub fn description(self) -> &'static str {
        match self {
            Self::ZStack3x0 => "Z-Stack 3.x.0 compatible",
            Self::ZStack30x => "Z-Stack 3.0.x compatible",
            Self::Legacy => "legacy (Z-Stack 1.2)",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for StackCompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Decoded SYS version response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// MT transport protocol revision
    pub transport_revision: u8,

    /// Raw product identifier byte
    pub product_id: u8,

    /// Chip family looked up from `product_id`
    pub chip: Chip,

    /// Firmware release
    pub version: SoftwareVersion,

    /// Firmware build revision
    pub build_revision: u16,

    /// Stack generation derived from `product_id` and the major release
    pub compatibility: StackCompatibility,
}

impl VersionInfo {
    pub fn new(
        transport_revision: u8,
        product_id: u8,
        version: SoftwareVersion,
        build_revision: u16,
    ) -> Self {
        Self {
            transport_revision,
            product_id,
            chip: Chip::from_product_id(product_id),
            version,
            build_revision,
            compatibility: StackCompatibility::classify(product_id, version.major),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[FW: {}, rev: {}, transport: {}, {}]",
            self.chip, self.version, self.build_revision, self.transport_revision, self.compatibility
        )
    }
}
