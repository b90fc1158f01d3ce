use anyhow::Result;
use harvest::config::Config;
use std::path::Path;

/// Write a default configuration file into `path`.
pub fn init_config(path: &Path) -> Result<()> {
    let config_path = path.join("harvest.toml");
    if config_path.exists() {
        anyhow::bail!("Refusing to overwrite existing {}", config_path.display());
    }

    std::fs::write(&config_path, Config::default_toml()?)?;
    println!("Created configuration file: {}", config_path.display());

    Ok(())
}
