// Endpoint configuration for the prediction client.
//
// The configuration is a plain value handed to `PredictClient`; nothing here
// is global. Values are layered from lowest to highest precedence:
// built-in defaults, the JSON config file, environment variables, CLI flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";
pub const DEFAULT_PREDICT_PATH: &str = "/predict";
pub const DEFAULT_FIELD_NAME: &str = "my_file";

const CONFIG_FILE_NAME: &str = ".emotion_predict.json";

pub const ENV_URL: &str = "EMOTION_API_URL";
pub const ENV_PATH: &str = "EMOTION_API_PATH";
pub const ENV_FIELD: &str = "EMOTION_API_FIELD";
pub const ENV_TIMEOUT: &str = "EMOTION_API_TIMEOUT_SECS";

/// Fully resolved settings used to build requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub predict_path: String,
    /// Name of the multipart field the service reads the file from.
    pub field_name: String,
    /// `None` means wait for the service as long as it takes.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.into(),
            predict_path: DEFAULT_PREDICT_PATH.into(),
            field_name: DEFAULT_FIELD_NAME.into(),
            timeout: None,
        }
    }
}

/// One layer of partial settings. The config file, the environment and the
/// command line each produce one of these; unset keys leave the lower layer
/// untouched.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predict_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Read the `EMOTION_API_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a layer from any key lookup. Blank values count as unset and an
    /// unparsable timeout is ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let timeout_secs = get(ENV_TIMEOUT).and_then(|raw| match raw.parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(e) => {
                log::warn!("ignoring {}={:?}: {}", ENV_TIMEOUT, raw, e);
                None
            }
        });
        ConfigOverrides {
            base_url: get(ENV_URL),
            predict_path: get(ENV_PATH),
            field_name: get(ENV_FIELD),
            timeout_secs,
        }
    }

    /// Load a layer from a JSON file. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            log::debug!("no config file at {}", path.display());
            return Ok(None);
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let layer: ConfigOverrides = serde_json::from_str(&data)
            .with_context(|| format!("Parsing config file {}", path.display()))?;
        log::debug!("loaded config file {}", path.display());
        Ok(Some(layer))
    }
}

impl ClientConfig {
    /// Resolve the final configuration: defaults, then the config file
    /// (`config_file` or the default location), then env, then `cli`.
    pub fn resolve(config_file: Option<&Path>, cli: &ConfigOverrides) -> Result<Self> {
        let path = config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(default_config_path);
        let mut cfg = ClientConfig::default();
        if let Some(file_layer) = ConfigOverrides::load(&path)? {
            cfg = cfg.apply(&file_layer);
        }
        Ok(cfg.apply(&ConfigOverrides::from_env()).apply(cli))
    }

    /// Overlay the keys set in `layer`.
    pub fn apply(mut self, layer: &ConfigOverrides) -> Self {
        if let Some(url) = &layer.base_url {
            self.base_url = url.clone();
        }
        if let Some(path) = &layer.predict_path {
            self.predict_path = path.clone();
        }
        if let Some(field) = &layer.field_name {
            self.field_name = field.clone();
        }
        if let Some(secs) = layer.timeout_secs {
            // 0 disables the timeout
            self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        self
    }

    /// Full URL of the predict endpoint. The path keeps its trailing slash
    /// (some deployments serve `/predict/` only).
    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.predict_path.trim();
        if path.is_empty() {
            return base.to_string();
        }
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    /// Every key set, ready to be written as a config file.
    pub fn to_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: Some(self.base_url.clone()),
            predict_path: Some(self.predict_path.clone()),
            field_name: Some(self.field_name.clone()),
            timeout_secs: Some(self.timeout.map(|t| t.as_secs()).unwrap_or(0)),
        }
    }

    /// Persist the settings as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.to_overrides())
            .context("Serializing config")?;
        std::fs::write(path, data)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        log::info!("saved config to {}", path.display());
        Ok(())
    }
}

/// `~/.emotion_predict.json`, or the current directory when there is no home.
pub fn default_config_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(CONFIG_FILE_NAME)
}
