//! Credentials file (`strato-auth.json`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use strato_certbot_provider::Credentials;

const CONFIG_FILE_NAME: &str = "strato-auth.json";
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

/// Contents of `strato-auth.json`.
#[derive(Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub totp_secret: Option<String>,
    #[serde(default)]
    pub totp_devicename: Option<String>,
    /// Portal endpoint override.
    #[serde(default)]
    pub api_url: Option<String>,
}

impl AuthConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to read credentials file {}", path.display()))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            anyhow::bail!(
                "Credentials file too large: {} bytes (max: {MAX_CONFIG_FILE_SIZE} bytes)",
                metadata.len()
            );
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid credentials file {}", path.display()))
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
            totp_secret: self.totp_secret.clone(),
            totp_devicename: self.totp_devicename.clone(),
        }
    }
}

/// Location of the credentials file.
///
/// An explicit file wins over a configured directory, which wins over the
/// directory the executable lives in.
pub fn resolve_config_path(
    config: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = config {
        return Ok(path);
    }
    if let Some(dir) = config_dir {
        return Ok(dir.join(CONFIG_FILE_NAME));
    }

    let exe = std::env::current_exe().context("Failed to determine executable path")?;
    let dir = exe
        .parent()
        .context("Executable path has no parent directory")?;
    Ok(dir.join(CONFIG_FILE_NAME))
}
