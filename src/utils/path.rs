use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable that relocates the config directory (used by tests
/// and by people running several backends side by side).
pub const CONFIG_DIR_ENV: &str = "FRONTDESK_CONFIG_DIR";

/// Get the home directory, with fallback to "/"
pub fn get_home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// Get the config directory path (~/.config/frontdesk unless overridden)
pub fn get_config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    get_home_dir().join(".config").join("frontdesk")
}

/// Get the config file path
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Get the file holding the session's bearer token
pub fn get_token_path() -> PathBuf {
    get_config_dir().join("session.token")
}

/// Get the directory for log files
pub fn get_log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(get_home_dir)
        .join("frontdesk")
}

/// Write `content` to `path`, creating parent directories, owner read/write only.
pub fn write_private_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    std::fs::write(path, content).with_context(|| format!("Failed to write file: {:?}", path))?;

    // 600: owner read/write only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)
            .with_context(|| format!("Failed to get file metadata: {:?}", path))?
            .permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("Failed to set file permissions: {:?}", path))?;
    }

    Ok(())
}
