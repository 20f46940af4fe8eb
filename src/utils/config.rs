use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Which firewall and which of its inbound rules a run rewrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdaterConfig {
    pub firewall_name: String,
    pub rule_label: String,
}

impl UpdaterConfig {
    pub fn load(path: &Path) -> Result<UpdaterConfig> {
        let file = File::open(path).map_err(|e| Error::config(path, e))?;
        let reader = BufReader::new(file);
        let config: UpdaterConfig =
            serde_json::from_reader(reader).map_err(|e| Error::config(path, e))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.firewall_name.trim().is_empty() {
            return Err(Error::config(path, "firewall_name is empty"));
        }
        if self.rule_label.trim().is_empty() {
            return Err(Error::config(path, "rule_label is empty"));
        }
        Ok(())
    }
}

/// `config.json` in the directory holding the running executable.
pub fn default_config_path() -> Result<PathBuf> {
    let exe = env::current_exe()
        .map_err(|e| Error::config(Path::new(CONFIG_FILE_NAME), e))?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(CONFIG_FILE_NAME))
}
