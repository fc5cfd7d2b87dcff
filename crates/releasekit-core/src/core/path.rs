use crate::core::error::{ReleaseError, ReleaseResult};
use std::path::PathBuf;

/// Get the Releasekit home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\releasekit
/// - Linux: ~/.config/releasekit
/// - macOS: ~/Library/Application Support/releasekit
pub fn releasekit_home() -> ReleaseResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ReleaseError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("releasekit"))
}

/// Get the config file path
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\releasekit\config.yaml
/// - Linux: ~/.config/releasekit/config.yaml
/// - macOS: ~/Library/Application Support/releasekit/config.yaml
pub fn config_file() -> ReleaseResult<PathBuf> {
    Ok(releasekit_home()?.join("config.yaml"))
}
