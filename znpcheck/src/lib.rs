//! # znpcheck
//!
//! Diagnostics for Texas Instruments Zigbee modules (CC2652, CC2530, CC2538)
//! running Z-Stack firmware, over the MT serial protocol.
//!
//! ## Features
//!
//! - Firmware version query with chip and stack classification
//! - Module reset
//! - Raw frame passthrough for ad-hoc commands
//! - Frame resynchronization after line noise and corrupt frames
//!
//! ## Quick Start
//!
//! ```no_run
//! use znpcheck::{Action, Config, ConsoleReporter, Session};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let config = Config::new("/dev/ttyUSB0");
//!     let mut session = Session::from_config(&config);
//!
//!     let code = session
//!         .run(&Action::Version, &mut ConsoleReporter::stdout())
//!         .await;
//!     std::process::exit(code.into());
//! }
//! ```

pub mod config;
pub mod error;
pub mod report;
pub mod session;
pub mod transceiver;

// Re-exports
pub use config::{Action, Config};
pub use error::{Error, Result};
pub use report::{ConsoleReporter, Reporter};
pub use session::{Outcome, Session};
pub use transceiver::{Response, State, Transceiver};

// Re-export types
pub use znpcheck_core::{CommandId, Frame, ResetType};
pub use znpcheck_types::{Chip, SoftwareVersion, StackCompatibility, VersionInfo};
