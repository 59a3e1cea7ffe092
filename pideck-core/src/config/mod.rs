//! Link configuration
//!
//! Every field has a default, so a configuration file only needs the keys it
//! changes:
//!
//! ```toml
//! role = "host"
//! port = "/dev/ttyACM0"
//! handshake_budget = 20
//!
//! [serial]
//! baudrate = 115200
//! ```

use alloc::string::String;
use core::fmt;

use pideck_hal::SerialConfig;
use pideck_protocol::DEFAULT_MAX_LINE_LEN;
use serde::Deserialize;

use crate::state::Role;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Not valid TOML, or a value of the wrong type
    Parse,
    /// A value outside its allowed range
    InvalidValue { field: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse => f.write_str("invalid link configuration"),
            ConfigError::InvalidValue { field } => write!(f, "invalid value for `{}`", field),
        }
    }
}

/// Settings for one link
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Which end of the link this process is
    pub role: Role,
    /// Serial device path, opened by the application
    pub port: String,
    /// Period between two polls
    pub poll_interval_ms: u32,
    /// Sleep between two attempts of the blocking host handshake
    pub handshake_delay_ms: u32,
    /// Attempts of the blocking host handshake; `None` waits forever
    pub handshake_budget: Option<u32>,
    /// Longest line the framer buffers before dropping it
    pub max_line_len: usize,
    /// Serial line settings
    pub serial: SerialConfig,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            role: Role::Device,
            port: String::from("/dev/ttyS0"),
            poll_interval_ms: 200,
            handshake_delay_ms: 500,
            handshake_budget: None,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            serial: SerialConfig::default(),
        }
    }
}

impl LinkConfig {
    /// Parse and validate a TOML configuration
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms",
            });
        }
        if self.max_line_len == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_line_len",
            });
        }
        if self.serial.baudrate == 0 {
            return Err(ConfigError::InvalidValue {
                field: "serial.baudrate",
            });
        }
        Ok(())
    }
}
