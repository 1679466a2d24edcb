//! Environment variable source: SIA_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// `SIA_SERVER_URL` maps to `server_url`; `SIA_LOGGING__LEVEL` to `logging.level`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("SIA")
            .prefix_separator("_")
            .separator("__"),
    );
    Ok(builder)
}
