//! Dispatcher configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest chunk size the help splitter can honour with code fences.
pub const MIN_MESSAGE_LENGTH: usize = 16;

/// Where help replies are delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpDelivery {
    /// Private channel between the bot and the author.
    #[default]
    Private,
    /// The channel the command was invoked in.
    Channel,
}

/// Tunables of [`CommandDispatcher`](super::CommandDispatcher).
///
/// ```
/// use herald::command::services::{DispatcherConfig, HelpDelivery};
///
/// let config = DispatcherConfig::from_toml_str(
///     "max_concurrent_dispatches = 8\nhelp_delivery = \"channel\"",
/// )
/// .expect("valid configuration");
/// assert_eq!(config.max_concurrent_dispatches, 8);
/// assert_eq!(config.help_delivery, HelpDelivery::Channel);
/// assert_eq!(config.max_message_length, 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    /// Upper bound on dispatches running at the same time.
    pub max_concurrent_dispatches: usize,
    /// Destination of help replies.
    pub help_delivery: HelpDelivery,
    /// Maximum characters per outbound help chunk.
    pub max_message_length: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_concurrent_dispatches: 64,
            help_delivery: HelpDelivery::Private,
            max_message_length: 2000,
        }
    }
}

impl DispatcherConfig {
    /// Parses and validates a TOML document. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::InvalidValue`] when a value is out of range.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_dispatches == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_concurrent_dispatches",
                reason: "must be at least 1".to_owned(),
            });
        }
        if self.max_message_length < MIN_MESSAGE_LENGTH {
            return Err(ConfigError::InvalidValue {
                key: "max_message_length",
                reason: format!("must be at least {MIN_MESSAGE_LENGTH}"),
            });
        }
        Ok(())
    }
}

/// Errors raised while loading [`DispatcherConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML for the configuration.
    #[error("invalid dispatcher configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is outside its accepted range.
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue {
        /// Offending key.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
