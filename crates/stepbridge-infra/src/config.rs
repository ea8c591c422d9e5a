//! Bridge configuration loader.
//!
//! Reads `stepbridge.toml` from the config directory (`~/.stepbridge/` in
//! production) and deserializes it into [`BridgeConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use stepbridge_types::config::BridgeConfig;

/// File name of the bridge configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "stepbridge.toml";

/// Resolve the config directory.
///
/// Priority:
/// 1. `STEPBRIDGE_CONFIG_DIR` environment variable
/// 2. `~/.stepbridge`
/// 3. `.stepbridge` in the current directory
pub fn default_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("STEPBRIDGE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".stepbridge");
    }
    PathBuf::from(".stepbridge")
}

/// Load bridge configuration from `{config_dir}/stepbridge.toml`.
///
/// - If the file does not exist, returns [`BridgeConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_bridge_config(config_dir: &Path) -> BridgeConfig {
    let config_path = config_dir.join(CONFIG_FILE_NAME);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No {CONFIG_FILE_NAME} found at {}, using defaults", config_path.display());
            return BridgeConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return BridgeConfig::default();
        }
    };

    match toml::from_str::<BridgeConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            BridgeConfig::default()
        }
    }
}
