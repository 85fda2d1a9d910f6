/// Shell configuration
use ample_audio::ClockConfig;
use ample_playback::PlaybackConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
const DEFAULT_CONFIG_FILE: &str = "ample.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub playback: PlaybackConfig,
    pub clock: ClockConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default `ample.toml` is optional.
    /// Environment variables override the file, e.g.
    /// `AMPLE_PLAYBACK__REPEAT=true` or `AMPLE_CLOCK__TICK_INTERVAL_MS=50`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with AMPLE_)
        settings = settings.add_source(
            config::Environment::with_prefix("AMPLE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        settings
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }
}
