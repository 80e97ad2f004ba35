use anyhow::{Result, anyhow};
use std::path::PathBuf;

pub fn get_ofx_mcp_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".ofx-mcp"))
}

pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_ofx_mcp_dir()?;
    Ok(app_dir.join("config.toml"))
}
