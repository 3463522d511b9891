//! Player configuration loading

use crate::error::{PlayerError, Result};
use crate::types::PlayerConfig;
use std::path::Path;
use tracing::debug;

impl PlayerConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing file yields the defaults. Keys absent from the file keep
    /// their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut settings = config::Config::builder();
        if path.exists() {
            debug!(path = %path.display(), "Loading player configuration");
            settings = settings.add_source(config::File::from(path));
        } else {
            debug!(path = %path.display(), "No player configuration file, using defaults");
        }

        let config = settings
            .build()
            .map_err(|e| PlayerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| PlayerError::Config(e.to_string()))
    }
}
