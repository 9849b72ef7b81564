use crate::error::Error;
use dfagen_template::{Layout, Overlay};
use eyre::WrapErr;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Overlays to apply to the template, in the order they are applied
///
/// JSON by default, TOML when the file has a `.toml` extension:
///
/// ```json
/// {
///   "Manager": {"CustomTags": {"team": "core"}},
///   "Workers": [{"Name": "Infra", "Labels": ["role=infra"]}]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct Config {
    /// Applied to the manager pool, before any worker
    pub(crate) manager: Option<Overlay>,

    /// Every worker is a new pool, cloned from the base node pool
    pub(crate) workers: Vec<Overlay>,

    /// Names of the base resources, defaults to Docker for AWS naming
    pub(crate) layout: Layout,
}

impl Config {
    pub(crate) fn from_path(path: &Path) -> eyre::Result<Self> {
        let string = fs::read_to_string(path).wrap_err(Error::new(
            &format!("Failed to read config at {}", path.display()),
            Some("Check the path passed with -c"),
        ))?;

        let config: Config = if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&string).wrap_err(Error::new(
                &format!("Couldn't parse config file at {}", path.display()),
                Some("The config must be valid TOML"),
            ))?
        } else {
            serde_json::from_str(&string).wrap_err(Error::new(
                &format!("Couldn't parse config file at {}", path.display()),
                Some("The config must be valid JSON"),
            ))?
        };

        log::debug!(
            "Loaded config with {} worker(s) and {} manager overlay",
            config.workers.len(),
            if config.manager.is_some() { "a" } else { "no" }
        );

        Ok(config)
    }
}
