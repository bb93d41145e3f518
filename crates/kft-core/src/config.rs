use crate::error::{KftError, Result};
use crate::io::{atomic_write, read_optional};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// KubectlConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KubectlConfig {
    /// Explicit kubectl binary; looked up on PATH when unset.
    #[serde(default)]
    pub binary: Option<PathBuf>,
    #[serde(default)]
    pub kubeconfig: Option<PathBuf>,
    /// Passed as `--request-timeout` to `get` and `config` calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Option<String>,
}

fn default_request_timeout() -> Option<String> {
    Some("20s".to_string())
}

impl Default for KubectlConfig {
    fn default() -> Self {
        Self {
            binary: None,
            kubeconfig: None,
            request_timeout: default_request_timeout(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Defaults {
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default = "default_pod_path")]
    pub pod_path: String,
}

pub fn default_pod_path() -> String {
    "/tmp".to_string()
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            context: None,
            namespace: None,
            container: None,
            pod_path: default_pod_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// HistoryConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_true() -> bool {
    true
}

fn default_max_entries() -> usize {
    50
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_max_entries(),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    7461
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub kubectl: KubectlConfig,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Keys accepted by [`Config::set`].
pub const SETTABLE_KEYS: &[&str] = &[
    "kubectl.binary",
    "kubectl.kubeconfig",
    "kubectl.request_timeout",
    "defaults.context",
    "defaults.namespace",
    "defaults.container",
    "defaults.pod_path",
    "history.enabled",
    "history.max_entries",
    "server.port",
];

impl Config {
    /// Load `<home>/config.yaml`, falling back to defaults when it is absent.
    pub fn load(home: &Path) -> Result<Self> {
        match read_optional(&paths::config_path(home))? {
            Some(data) if !data.trim().is_empty() => Ok(serde_yaml::from_str(&data)?),
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, home: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        atomic_write(&paths::config_path(home), data.as_bytes())
    }

    /// Set a single dotted key from its string form. An empty value or
    /// `none` clears optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let optional = |v: &str| -> Option<String> {
            if v.is_empty() || v.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(v.to_string())
            }
        };
        let invalid = || KftError::InvalidConfigKey(format!("{key}={value}"));

        match key {
            "kubectl.binary" => self.kubectl.binary = optional(value).map(PathBuf::from),
            "kubectl.kubeconfig" => self.kubectl.kubeconfig = optional(value).map(PathBuf::from),
            "kubectl.request_timeout" => self.kubectl.request_timeout = optional(value),
            "defaults.context" => self.defaults.context = optional(value),
            "defaults.namespace" => self.defaults.namespace = optional(value),
            "defaults.container" => self.defaults.container = optional(value),
            "defaults.pod_path" => {
                self.defaults.pod_path = optional(value).unwrap_or_else(default_pod_path)
            }
            "history.enabled" => self.history.enabled = value.parse().map_err(|_| invalid())?,
            "history.max_entries" => {
                self.history.max_entries = value.parse().map_err(|_| invalid())?
            }
            "server.port" => self.server.port = value.parse().map_err(|_| invalid())?,
            _ => return Err(KftError::InvalidConfigKey(key.to_string())),
        }
        Ok(())
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.history.enabled && self.history.max_entries == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "history.max_entries is 0 while history is enabled".to_string(),
            });
        }

        if let Some(ns) = &self.defaults.namespace {
            if paths::validate_name("namespace", ns).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("defaults.namespace '{ns}' is not a valid namespace name"),
                });
            }
        }

        if let Some(container) = &self.defaults.container {
            if paths::validate_name("container", container).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "defaults.container '{container}' is not a valid container name"
                    ),
                });
            }
        }

        if let Some(bin) = &self.kubectl.binary {
            if !bin.exists() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("kubectl.binary '{}' does not exist", bin.display()),
                });
            }
        }

        if !self.defaults.pod_path.starts_with('/') {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "defaults.pod_path '{}' is not absolute; kubectl resolves it against the container working directory",
                    self.defaults.pod_path
                ),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
