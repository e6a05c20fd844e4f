//! Type definitions for znpcheck

pub mod error;
pub mod raw_command;
pub mod version_info;

pub use error::{Error, Result};
pub use raw_command::RawCommand;
pub use version_info::{Chip, SoftwareVersion, StackCompatibility, VersionInfo};
