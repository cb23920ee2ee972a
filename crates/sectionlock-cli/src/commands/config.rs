use anyhow::{bail, Result};

use sectionlock_core::AppConfig;

/// Print the effective configuration (file, preset and flags applied)
pub async fn show(config: &AppConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

pub async fn init(force: bool) -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() && !force {
        bail!(
            "Config file already exists at {}\nUse --force to overwrite it.",
            path.display()
        );
    }

    AppConfig::default().save()?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

pub async fn path() -> Result<()> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}
