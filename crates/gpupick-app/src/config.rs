// SPDX-License-Identifier: CEPL-1.0
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use gpupick_vk::{RequirementSet, ScoreWeights};
use serde::Deserialize;
use tracing::info;

pub const DEFAULT_PATH: &str = "gpupick.toml";

#[derive(Debug, Deserialize, Default)]
pub struct AppCfg {
    #[serde(default)]
    pub requirements: RequirementSet,
    #[serde(default)]
    pub scoring: ScoreWeights,
}

/// Reads `path`, or `gpupick.toml` when none is given. A missing default file
/// means defaults; a missing explicit file or a malformed one is an error.
pub fn load_cfg(path: Option<&Path>) -> Result<AppCfg> {
    let (path, explicit) = match path {
        Some(p) => (p, true),
        None => (Path::new(DEFAULT_PATH), false),
    };
    match fs::read_to_string(path) {
        Ok(s) => {
            let cfg = toml::from_str::<AppCfg>(&s)
                .with_context(|| format!("parse {}", path.display()))?;
            info!("config loaded from {}", path.display());
            Ok(cfg)
        }
        Err(e) if e.kind() == ErrorKind::NotFound && !explicit => Ok(AppCfg::default()),
        Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
    }
}
