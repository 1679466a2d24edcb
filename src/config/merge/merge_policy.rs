//! Merge policy: built-in defaults applied beneath every source.

use crate::config::DEFAULT_TIMEOUT_SECS;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with defaults; later sources override earlier ones.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder().set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)
}
