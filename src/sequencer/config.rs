/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Sequencer configuration.

use super::error::SequencerError;
use serde::{Deserialize, Serialize};

/// Default sequencer name.
pub const DEFAULT_NAME: &str = "sequencer";

/// Settings applied when a [`Sequencer`](super::Sequencer) is built.
///
/// # Examples
///
/// ```
/// use effect_sequencer::SequencerConfig;
///
/// let config = SequencerConfig::from_json(r#"{ "name": "show" }"#).unwrap();
/// assert_eq!(config.name, "show");
/// assert_eq!(SequencerConfig::from_json("{}").unwrap(), SequencerConfig::default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SequencerConfig {
    /// Prefix of the worker thread names (`{name}-processor`, `{name}-timer`)
    /// and value of the `name` field on the sequencer's tracing span.
    pub name: String,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
        }
    }
}

impl SequencerConfig {
    /// Creates a configuration with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Parses and validates a JSON configuration.
    ///
    /// Missing fields take their default value.
    ///
    /// # Errors
    ///
    /// - [`SequencerError::ConfigParse`] if `json` is malformed or has unknown fields
    /// - [`SequencerError::InvalidConfig`] if a value is unusable
    pub fn from_json(json: &str) -> Result<Self, SequencerError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can be used to build a sequencer.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::InvalidConfig`] for an empty name or one
    /// containing a NUL byte (not allowed in thread names).
    pub fn validate(&self) -> Result<(), SequencerError> {
        if self.name.trim().is_empty() {
            return Err(SequencerError::InvalidConfig(
                "name must not be empty".to_string(),
            ));
        }
        if self.name.contains('\0') {
            return Err(SequencerError::InvalidConfig(
                "name must not contain NUL bytes".to_string(),
            ));
        }
        Ok(())
    }
}
