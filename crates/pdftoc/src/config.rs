use std::path::Path;

use log::debug;
use pdftoc_core::DetectConfig;

use crate::prelude::*;

/// Detection settings from an optional TOML file, with `--max-level` on top.
pub fn load(path: Option<&Path>, max_level: Option<u8>) -> Result<DetectConfig> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .wrap_err_with(|| f!("cannot read config file {}", path.display()))?;
            let config = DetectConfig::from_toml_str(&text)
                .wrap_err_with(|| f!("invalid config file {}", path.display()))?;
            debug!("loaded detection config from {}", path.display());
            config
        }
        None => DetectConfig::default(),
    };

    Ok(match max_level {
        Some(level) => config.with_max_level(usize::from(level)),
        None => config,
    })
}
