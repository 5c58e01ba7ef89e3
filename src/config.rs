use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{HelmReleaseError, Result};

/// File name looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = "helm-release.toml";

/// File name looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".helm-release.toml";

/// Default dotted path of the image tag inside the values file
pub const DEFAULT_TAG_PATH: &str = "image.tag";

/// Represents the complete configuration for helm-release.
///
/// Contains the chart layout and runtime behavior. Command-line flags take
/// precedence over every value here.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_chart_file() -> String {
    "Chart.yaml".to_string()
}

fn default_values_file() -> String {
    "values.yaml".to_string()
}

fn default_tag_path() -> String {
    DEFAULT_TAG_PATH.to_string()
}

/// Names of the chart files and the image tag location
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChartConfig {
    #[serde(default = "default_chart_file")]
    pub chart_file: String,

    #[serde(default = "default_values_file")]
    pub values_file: String,

    #[serde(default = "default_tag_path")]
    pub tag_path: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            chart_file: default_chart_file(),
            values_file: default_values_file(),
            tag_path: default_tag_path(),
        }
    }
}

/// Where the current version is read from
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Tags, branch and commit distance of the repository
    #[default]
    Git,
    /// The `version` field of the chart file
    Helm,
}

impl std::str::FromStr for SourceKind {
    type Err = HelmReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "git" => Ok(SourceKind::Git),
            "helm" => Ok(SourceKind::Helm),
            other => Err(HelmReleaseError::config(format!(
                "invalid source '{}', expected git or helm",
                other
            ))),
        }
    }
}

fn default_strict() -> bool {
    true
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BehaviorConfig {
    /// Abort on repository-state errors instead of falling back to 0.0.1
    #[serde(default = "default_strict")]
    pub strict: bool,

    #[serde(default)]
    pub source: SourceKind,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            strict: default_strict(),
            source: SourceKind::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `helm-release.toml` in current directory
/// 3. `.helm-release.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        read_config_file(path)?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        read_config_file(Path::new(LOCAL_CONFIG_FILE))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join(USER_CONFIG_FILE);
        if user_path.exists() {
            read_config_file(&user_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse configuration from TOML text
pub fn parse_config(source: &str) -> Result<Config> {
    toml::from_str(source).map_err(|e| HelmReleaseError::config(e.to_string()))
}

fn read_config_file(path: &Path) -> Result<String> {
    tracing::debug!(path = %path.display(), "using config file");
    fs::read_to_string(path).map_err(|e| {
        HelmReleaseError::config(format!("cannot read {}: {}", path.display(), e))
    })
}
