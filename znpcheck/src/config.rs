//! Invocation configuration

use std::time::Duration;

use znpcheck_core::constants::{DEFAULT_BAUD_RATE, DEFAULT_READ_SLICE_MS, DEFAULT_TIMEOUT};
use znpcheck_core::ResetType;

use crate::error::{Error, Result};

/// The single action performed by one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Action {
    /// Send SYS_RESET_REQ; the module does not reply
    Reset(ResetType),

    /// Query SYS_VERSION and decode the response
    #[default]
    Version,

    /// Send caller-supplied hex bytes verbatim and dump the reply
    Custom(String),
}

impl Action {
    /// Build the action from independent CLI-style flags
    ///
    /// Selecting nothing means [`Action::Version`]. Selecting more than one
    /// action is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use znpcheck::Action;
    ///
    /// assert_eq!(Action::from_flags(false, false, None, false).unwrap(), Action::Version);
    /// assert!(Action::from_flags(true, true, None, false).is_err());
    /// ```
    pub fn from_flags(
        reset: bool,
        version: bool,
        custom_command: Option<String>,
        soft_reset: bool,
    ) -> Result<Self> {
        let selected = [reset, version, custom_command.is_some()]
            .iter()
            .filter(|&&flag| flag)
            .count();

        if selected > 1 {
            return Err(Error::ConflictingActions);
        }

        let action = match custom_command {
            Some(hex) => Self::Custom(hex),
            None if reset => Self::Reset(if soft_reset {
                ResetType::Soft
            } else {
                ResetType::Hard
            }),
            None => Self::Version,
        };

        Ok(action)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Reset(_) => "reset",
            Self::Version => "version",
            Self::Custom(_) => "custom-command",
        }
    }
}

/// Settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Serial port path
    pub port: String,

    /// Baud rate
    pub baud_rate: u32,

    /// Total time allowed for the response
    pub timeout: Duration,

    /// Upper bound on a single transport read
    pub read_slice: Duration,

    /// Action to perform
    pub action: Action,

    /// Verbose diagnostics
    pub debug: bool,
}

impl Config {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            read_slice: Duration::from_millis(DEFAULT_READ_SLICE_MS),
            action: Action::default(),
            debug: false,
        }
    }

    /// Set baud rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set response timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set read slice
    pub fn with_read_slice(mut self, read_slice: Duration) -> Self {
        self.read_slice = read_slice;
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::new("/dev/ttyUSB0");

        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.read_slice, Duration::from_millis(100));
        assert_eq!(config.action, Action::Version);
        assert!(!config.debug);
    }

    #[test]
    fn test_builder() {
        let config = Config::new("/dev/ttyACM0")
            .with_baud_rate(57_600)
            .with_timeout(Duration::from_secs(3))
            .with_action(Action::Reset(ResetType::Soft))
            .with_debug(true);

        assert_eq!(config.baud_rate, 57_600);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.action, Action::Reset(ResetType::Soft));
        assert!(config.debug);
    }

    #[test]
    fn test_action_from_flags() {
        assert_eq!(
            Action::from_flags(true, false, None, false).unwrap(),
            Action::Reset(ResetType::Hard)
        );
        assert_eq!(
            Action::from_flags(true, false, None, true).unwrap(),
            Action::Reset(ResetType::Soft)
        );
        assert_eq!(
            Action::from_flags(false, true, None, false).unwrap(),
            Action::Version
        );
        assert_eq!(
            Action::from_flags(false, false, Some("fe00210223".into()), false).unwrap(),
            Action::Custom("fe00210223".into())
        );
    }

    #[test]
    fn test_action_conflicts() {
        assert!(matches!(
            Action::from_flags(true, true, None, false),
            Err(Error::ConflictingActions)
        ));
        assert!(matches!(
            Action::from_flags(false, true, Some("00".into()), false),
            Err(Error::ConflictingActions)
        ));
    }
}
