pub mod schema;

use crate::error::Result;
use schema::OutlineConfig;

pub fn load_from_yaml_str(s: &str) -> Result<OutlineConfig> {
    let cfg: OutlineConfig = serde_yaml::from_str(s)?;
    Ok(cfg)
}

pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<OutlineConfig> {
    let data = std::fs::read_to_string(path)?;
    load_from_yaml_str(&data)
}
