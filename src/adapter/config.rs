use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub project_url: String,
    pub api_key: String,
    pub bucket_name: String,
    pub folder_base_name: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let content = fs::read_to_string(expanded.as_ref())?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
